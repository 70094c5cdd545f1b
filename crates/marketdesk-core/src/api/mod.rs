//! REST API client module for the marketplace backend.
//!
//! This module provides the `ApiClient` for communicating with the backend.
//! Requests carry the stored access token as a bearer header. When the
//! backend answers 401, the client refreshes the access token once (shared
//! by every request that failed meanwhile) and replays the request.

pub mod client;
pub mod error;
pub mod refresh;
pub mod request;

pub use client::{ApiClient, SessionEvent, REFRESH_PATH};
pub use error::ApiError;
pub use refresh::RefreshCoordinator;
pub use request::{ApiRequest, ApiResponse, Attempt, FilePart, RequestBody};
