//! Shared wire types: the response envelope, ids and user stubs.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Backend response wrapper: `{ success, message, result }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// True only for an explicit `success: true`.
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    /// Backend message, or `default` when it sent none.
    pub fn message_or(&self, default: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(default)
            .to_string()
    }
}

/// Entity identifier. The backend uses numeric ids, but string ids are
/// accepted so a schema change does not break every screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Str(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(id) => write!(f, "{}", id),
            Id::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for Id {
    fn from(id: i64) -> Self {
        Id::Int(id)
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        match id.parse::<i64>() {
            Ok(n) => Id::Int(n),
            Err(_) => Id::Str(id.to_string()),
        }
    }
}

/// Creator / updator / validator reference embedded in entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Option<Id>,
    pub username: Option<String>,
}

/// Username of an optional user reference, `N/A` when unknown.
pub fn username_or_na(user: &Option<UserRef>) -> String {
    user.as_ref()
        .and_then(|u| u.username.clone())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Flag that the backend sometimes sends as `null`; read that as `false`.
pub(crate) fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Result item of `POST /files/upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_must_be_true() {
        let ok: Envelope<u32> = serde_json::from_str(r#"{"success":true,"result":3}"#).unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.result, Some(3));

        let missing: Envelope<u32> = serde_json::from_str(r#"{"result":3}"#).unwrap();
        assert!(!missing.is_success());

        let failed: Envelope<u32> =
            serde_json::from_str(r#"{"success":false,"message":"Bad credentials"}"#).unwrap();
        assert_eq!(failed.message_or("Login failed"), "Bad credentials");
        assert!(failed.result.is_none());
    }

    #[test]
    fn test_id_accepts_numbers_and_strings() {
        let ids: Vec<Id> = serde_json::from_str(r#"[12, "a1b2"]"#).unwrap();
        assert_eq!(ids[0], Id::Int(12));
        assert_eq!(ids[1], Id::Str("a1b2".to_string()));
        assert_eq!(ids[0].to_string(), "12");
        assert_eq!(Id::from("42"), Id::Int(42));
    }

    #[test]
    fn test_username_or_na() {
        let user = Some(UserRef {
            id: Some(Id::Int(1)),
            username: Some("jdoe".to_string()),
        });
        assert_eq!(username_or_na(&user), "jdoe");
        assert_eq!(username_or_na(&None), "N/A");
    }
}
