//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `TokenStore`: client-local storage of the access and refresh tokens
//!   (`MemoryTokenStore`, `FileTokenStore`, `KeyringTokenStore`)
//! - `AuthService`: login, signup, password reset and logout against the
//!   backend, plus the current user

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::KeyringTokenStore;
pub use session::{AuthService, Credentials, SignupRequest};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
