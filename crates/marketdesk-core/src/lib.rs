//! Core library for marketdesk, the back-office client of the marketplace
//! REST backend.
//!
//! - `api`: authenticated HTTP client with single-flight token refresh
//! - `auth`: token storage and account flows
//! - `services`: typed CRUD access per collection, file uploads
//! - `query`: list parameters, filter state and result pages
//! - `access`: which dashboard sections a user may open
//! - `config`: persisted settings and the backend base URL

pub mod access;
pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod query;
pub mod services;

pub use access::{visible_sections, Section};
pub use api::{ApiClient, ApiError, SessionEvent};
pub use auth::{AuthService, Credentials, TokenStore};
pub use config::{ApiSettings, Config};
pub use services::Services;
