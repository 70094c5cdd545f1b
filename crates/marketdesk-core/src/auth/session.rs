//! Account flows against the backend and the signed-in user.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{Envelope, Gender, Id, User};

/// Username and password for `POST /users/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Self-registration form.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub town_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResult {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

/// Login, logout and account recovery. Clones share the current user.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    user: Arc<RwLock<Option<User>>>,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            user: Arc::new(RwLock::new(None)),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// User remembered from the last login or bootstrap.
    pub fn current_user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_current_user(&self, user: Option<User>) {
        *self.user.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = user;
    }

    fn storage_error(e: anyhow::Error) -> ApiError {
        ApiError::Storage(e.to_string())
    }

    /// Sign in and store both tokens. Only `success: true` counts.
    pub async fn login(&self, credentials: &Credentials) -> Result<Option<User>, ApiError> {
        debug!(username = %credentials.username, "Logging in");
        let envelope: Envelope<LoginResult> = self.api.post("/users/login", credentials).await?;

        if !envelope.is_success() {
            let message = envelope.message_or("Login failed");
            warn!(username = %credentials.username, message = %message, "Login rejected");
            return Err(ApiError::Rejected(message));
        }

        let result = envelope
            .result
            .ok_or_else(|| ApiError::InvalidResponse("Login response has no result".to_string()))?;
        let (Some(token), Some(refresh_token)) = (result.token, result.refresh_token) else {
            return Err(ApiError::InvalidResponse(
                "Login response is missing tokens".to_string(),
            ));
        };

        self.api
            .store()
            .save_tokens(&token, &refresh_token)
            .map_err(Self::storage_error)?;
        self.set_current_user(result.user.clone());
        info!(username = %credentials.username, "Logged in");
        Ok(result.user)
    }

    /// `GET /users/me`.
    pub async fn me(&self) -> Result<User, ApiError> {
        let envelope: Envelope<User> = self.api.get("/users/me").await?;
        envelope
            .result
            .ok_or_else(|| ApiError::InvalidResponse("Profile response has no result".to_string()))
    }

    /// Restore the session from stored tokens. Never fails: a missing token
    /// or any error from the backend means "not signed in".
    pub async fn bootstrap(&self) -> Option<User> {
        match self.api.access_token() {
            Ok(Some(_)) => {}
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Could not read access token");
                return None;
            }
        }

        match self.me().await {
            Ok(user) => {
                self.set_current_user(Some(user.clone()));
                Some(user)
            }
            Err(e) => {
                warn!(error = %e, "Session bootstrap failed");
                self.set_current_user(None);
                None
            }
        }
    }

    /// `POST /users/register`; returns the backend's `result`.
    pub async fn signup(&self, request: &SignupRequest) -> Result<Value, ApiError> {
        let envelope: Envelope<Value> = self.api.post("/users/register", request).await?;
        if !envelope.is_success() {
            return Err(ApiError::Rejected(envelope.message_or("Registration failed")));
        }
        info!(username = %request.username, "Account registered");
        Ok(envelope.result.unwrap_or(Value::Null))
    }

    /// Ask for a reset link. The backend's message is returned for display.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, ApiError> {
        let envelope: Envelope<Value> = self
            .api
            .post("/users/forgot-password", &json!({ "email": email }))
            .await?;
        Ok(envelope.message)
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), ApiError> {
        let path = format!("/users/reset-password/{}", token);
        let envelope: Envelope<Value> =
            self.api.post(&path, &json!({ "password": password })).await?;
        if envelope.is_success() {
            Ok(())
        } else {
            Err(ApiError::Rejected(envelope.message_or("Password reset failed")))
        }
    }

    /// Revoke the token on the backend, then forget it locally regardless
    /// of how the call went.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = match self.api.access_token() {
            Ok(token) => self
                .api
                .post::<Value, _>("/users/logout", &json!({ "token": token }))
                .await
                .map(|_| ()),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!(error = %e, "Logout call failed, clearing session anyway");
        }
        self.set_current_user(None);
        self.api
            .store()
            .clear_session()
            .map_err(Self::storage_error)?;
        info!("Logged out");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryTokenStore, TokenStore};

    fn service(store: MemoryTokenStore) -> AuthService {
        // Nothing listens on port 9; any call fails at the transport.
        let api = ApiClient::with_client(reqwest::Client::new(), "http://127.0.0.1:9", Arc::new(store));
        AuthService::new(api)
    }

    #[test]
    fn test_signup_wire_shape_skips_empty_fields() {
        let request = SignupRequest {
            username: "mbella".to_string(),
            last_name: "Bella".to_string(),
            email: "m@example.com".to_string(),
            town_id: Some(Id::Int(9)),
            ..Default::default()
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"username": "mbella", "lastName": "Bella", "email": "m@example.com", "townId": 9})
        );
    }

    #[test]
    fn test_login_result_parses_backend_shape() {
        let json = r#"{"success": true, "result": {"token": "a", "refreshToken": "r",
            "user": {"id": 1, "username": "jdoe"}}}"#;
        let envelope: Envelope<LoginResult> = serde_json::from_str(json).unwrap();
        let result = envelope.result.unwrap();
        assert_eq!(result.token.as_deref(), Some("a"));
        assert_eq!(result.refresh_token.as_deref(), Some("r"));
        assert_eq!(result.user.unwrap().username, "jdoe");
    }

    #[tokio::test]
    async fn test_bootstrap_without_token_skips_backend() {
        let auth = service(MemoryTokenStore::with_tokens(Some("null"), None));
        assert!(auth.bootstrap().await.is_none());
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_tokens_even_when_call_fails() {
        let auth = service(MemoryTokenStore::with_tokens(Some("a"), Some("r")));
        let result = auth.logout().await;
        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(auth.api().store().access_token().unwrap(), None);
        assert_eq!(auth.api().store().refresh_token().unwrap(), None);
    }
}
