//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use marketdesk_core::api::ApiClient;
use marketdesk_core::auth::MemoryTokenStore;
use marketdesk_core::config::ApiSettings;
use wiremock::MockServer;

/// Client against `server` with the given tokens pre-stored.
pub fn client(
    server: &MockServer,
    access_token: Option<&str>,
    refresh_token: Option<&str>,
) -> (ApiClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::with_tokens(access_token, refresh_token));
    let api = ApiClient::new(ApiSettings::new(server.uri()), store.clone())
        .expect("client builds");
    (api, store)
}

/// Like [`client`], with a custom request timeout.
pub fn client_with_timeout(
    server: &MockServer,
    timeout: Duration,
    access_token: Option<&str>,
    refresh_token: Option<&str>,
) -> (ApiClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::with_tokens(access_token, refresh_token));
    let settings = ApiSettings {
        timeout,
        ..ApiSettings::new(server.uri())
    };
    let api = ApiClient::new(settings, store.clone()).expect("client builds");
    (api, store)
}

/// Authorization header of every request the server saw on `path`.
pub async fn auth_headers_for(server: &MockServer, path: &str) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .map(|r| {
            r.headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        })
        .collect()
}
