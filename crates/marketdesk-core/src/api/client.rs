//! API client for communicating with the marketplace REST backend.
//!
//! Every call gets the stored access token as a bearer header. A 401 is
//! recovered once per request by refreshing the access token; concurrent
//! 401s share a single refresh and are replayed with its result.

use std::sync::Arc;

use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::error::{body_message, resolve_message, SESSION_EXPIRED_MESSAGE};
use super::refresh::{wait_for, RefreshCoordinator, Ticket};
use super::request::{ApiRequest, ApiResponse, Attempt};
use super::ApiError;
use crate::auth::TokenStore;
use crate::config::ApiSettings;

/// Path of the token refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/users/refresh";

/// Capacity of the session event channel. Slow subscribers only miss
/// duplicates of the same "log in again" signal.
const SESSION_EVENT_CAPACITY: usize = 16;

/// Session-level signals for the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Credentials were cleared; the user has to log in again.
    LoginRequired { reason: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    result: Option<RefreshResult>,
}

#[derive(Debug, Deserialize)]
struct RefreshResult {
    token: Option<String>,
}

/// Authenticated API client.
/// Clone is cheap - clones share the connection pool, token store and
/// refresh state.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    refresh: RefreshCoordinator,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(settings: ApiSettings, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, settings.base_url, store))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            refresh: RefreshCoordinator::new(),
            events,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Receive `LoginRequired` and other session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Resolve a path against the base URL. Absolute URLs pass through.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    pub(crate) fn access_token(&self) -> Result<Option<String>, ApiError> {
        self.store
            .access_token()
            .map_err(|e| ApiError::Storage(e.to_string()))
    }

    fn auth_headers(token: Option<&str>) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ApiError::InvalidRequest(format!("Invalid access token: {}", e)))?,
            );
        }
        Ok(headers)
    }

    /// Send `request`, recovering from one expired access token.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut attempt = Attempt::first();
        let mut token = self.access_token()?;

        loop {
            match self.dispatch(request, token.as_deref(), attempt).await {
                Err(err) if err.is_unauthorized() && !attempt.retried => {
                    attempt = attempt.replay();
                    token = match self.access_token()? {
                        // Another request already refreshed since this one was sent.
                        Some(current) if token.is_some() && token.as_deref() != Some(current.as_str()) => {
                            debug!("Access token already refreshed, replaying");
                            Some(current)
                        }
                        _ => Some(self.await_refresh(err).await?),
                    };
                }
                result => return result,
            }
        }
    }

    /// One HTTP exchange. Non-2xx statuses become normalized errors.
    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        attempt: Attempt,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url_for(&request.path);
        debug!(method = %request.method, url = %url, replay = attempt.retried, "Sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(Self::auth_headers(token)?);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = request.body.apply(builder)?;

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        if status.is_success() {
            Ok(ApiResponse { status, body })
        } else {
            debug!(url = %url, status = %status, body = %ApiError::truncate_body(&body), "Request failed");
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Obtain a fresh access token, either by leading the refresh or by
    /// waiting on the one already running.
    async fn await_refresh(&self, original: ApiError) -> Result<String, ApiError> {
        match self.refresh.join() {
            Ticket::Follower(rx) => {
                debug!("Refresh in flight, queueing request");
                wait_for(rx).await
            }
            Ticket::Leader(guard) => {
                let outcome = self.run_refresh(original).await;
                let released = guard.settle(&outcome);
                debug!(released = released, ok = outcome.is_ok(), "Refresh settled");
                outcome
            }
        }
    }

    async fn run_refresh(&self, original: ApiError) -> Result<String, ApiError> {
        let refresh_token = match self.store.refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!("Access token rejected and no refresh token stored");
                self.end_session(&original.to_string());
                return Err(original);
            }
            Err(e) => {
                let err = ApiError::Storage(e.to_string());
                self.end_session(&err.to_string());
                return Err(err);
            }
        };

        match self.request_new_token(&refresh_token).await {
            Ok(token) => {
                if let Err(e) = self.store.set_access_token(&token) {
                    let err = ApiError::Storage(e.to_string()).into_session_expired();
                    self.end_session(&err.to_string());
                    return Err(err);
                }
                info!("Access token refreshed");
                Ok(token)
            }
            Err(err) => {
                let err = err.into_session_expired();
                warn!(error = %err, "Token refresh failed");
                self.end_session(&err.to_string());
                Err(err)
            }
        }
    }

    /// Call the refresh endpoint. A 2xx without a token counts as a failure.
    async fn request_new_token(&self, refresh_token: &str) -> Result<String, ApiError> {
        let url = self.url_for(REFRESH_PATH);
        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e).into_session_expired())?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(&e).into_session_expired())?;

        if !status.is_success() {
            let transport = format!("Request failed with status code {}", status.as_u16());
            return Err(ApiError::SessionExpired(resolve_message(
                body_message(&body).as_deref(),
                status.canonical_reason(),
                Some(&transport),
                SESSION_EXPIRED_MESSAGE,
            )));
        }

        serde_json::from_str::<RefreshResponse>(&body)
            .ok()
            .and_then(|r| r.result)
            .and_then(|r| r.token)
            .filter(|t| !t.trim().is_empty() && t != "null")
            .ok_or_else(|| ApiError::SessionExpired("Token missing from refresh response".to_string()))
    }

    /// Clear all local session state and tell the front end to show login.
    fn end_session(&self, reason: &str) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear token store");
        }
        // No subscribers is fine: nothing to redirect.
        let _ = self.events.send(SessionEvent::LoginRequired {
            reason: reason.to_string(),
        });
    }

    // ===== Typed helpers =====

    pub async fn request<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        self.send(request).await?.json()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(&ApiRequest::get(path)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        self.request(&ApiRequest::get(path).query(query.iter().cloned()))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(&ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(&ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(&ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(&ApiRequest::delete(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(Client::new(), base, Arc::new(MemoryTokenStore::new()))
    }

    #[test]
    fn test_url_for_joins_slashes() {
        let api = client("http://localhost:8000/api/");
        assert_eq!(api.url_for("/countries"), "http://localhost:8000/api/countries");
        assert_eq!(api.url_for("countries/3"), "http://localhost:8000/api/countries/3");
    }

    #[test]
    fn test_url_for_keeps_absolute_urls() {
        let api = client("http://localhost:8000");
        assert_eq!(
            api.url_for("https://other.example/users/login"),
            "https://other.example/users/login"
        );
    }

    #[test]
    fn test_auth_headers_only_with_token() {
        let headers = ApiClient::auth_headers(Some("abc")).unwrap();
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer abc");
        assert!(ApiClient::auth_headers(None).unwrap().is_empty());
    }

    #[test]
    fn test_auth_headers_rejects_invalid_token() {
        let err = ApiClient::auth_headers(Some("bad\ntoken")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn test_refresh_request_wire_shape() {
        let body = serde_json::to_value(RefreshRequest { refresh_token: "r1" }).unwrap();
        assert_eq!(body, serde_json::json!({"refreshToken": "r1"}));
    }
}
