//! Replayable request descriptions.
//!
//! An `ApiRequest` is plain data: it can be sent, rejected with a 401, and
//! sent again after a token refresh without being rebuilt by the caller.

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;

/// One file of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<FilePart>),
}

impl RequestBody {
    /// Attach this body to a request builder. Multipart forms are rebuilt on
    /// every call since `Form` cannot be cloned.
    pub(crate) fn apply(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self {
            RequestBody::Empty => Ok(builder),
            RequestBody::Json(value) => Ok(builder.json(value)),
            RequestBody::Multipart(files) => {
                let mut form = Form::new();
                for file in files {
                    let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
                    if let Some(ref mime) = file.mime {
                        part = part
                            .mime_str(mime)
                            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                    }
                    form = form.part(file.field.clone(), part);
                }
                Ok(builder.multipart(form))
            }
        }
    }
}

/// An outbound call: method, path relative to the base URL, query and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, files: Vec<FilePart>) -> Self {
        self.body = RequestBody::Multipart(files);
        self
    }
}

/// Retry marker threaded through the send loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attempt {
    pub retried: bool,
}

impl Attempt {
    pub fn first() -> Self {
        Self { retried: false }
    }

    pub fn replay(self) -> Self {
        Self { retried: true }
    }
}

/// A successful (2xx) response with its body already read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// Deserialize the body; an empty body reads as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let parsed = if self.body.trim().is_empty() {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_str(&self.body)
        };
        parsed.map_err(|e| {
            ApiError::InvalidResponse(format!(
                "{} (body: {})",
                e,
                ApiError::truncate_body(&self.body)
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_collects_query_and_body() {
        let req = ApiRequest::post("/countries/create")
            .query([("lang", "fr")])
            .json(&json!({"name": "Cameroon", "code": "CM"}))
            .expect("serializable body");

        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/countries/create");
        assert_eq!(req.query, vec![("lang".to_string(), "fr".to_string())]);
        assert_eq!(req.body, RequestBody::Json(json!({"name": "Cameroon", "code": "CM"})));
    }

    #[test]
    fn test_attempt_replay_sets_retried() {
        let attempt = Attempt::first();
        assert!(!attempt.retried);
        assert!(attempt.replay().retried);
    }

    #[test]
    fn test_response_json_empty_body_is_null() {
        let resp = ApiResponse {
            status: StatusCode::NO_CONTENT,
            body: String::new(),
        };
        let value: Option<Value> = resp.json().expect("null parses into Option");
        assert!(value.is_none());
    }

    #[test]
    fn test_response_json_reports_invalid_body() {
        let resp = ApiResponse {
            status: StatusCode::OK,
            body: "not json".to_string(),
        };
        let err = resp.json::<Value>().unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
