//! Data models for marketplace entities.
//!
//! This module contains the structures the backend returns:
//!
//! - `Envelope`: the `{ success, message, result }` wrapper
//! - `Country`, `Town`: reference data
//! - `Company`, `User`: organizational entities
//! - `ProductType`, `PlatformAccount`: catalog and payment configuration

pub mod catalog;
pub mod common;
pub mod company;
pub mod geo;
pub mod user;

pub use catalog::{PaymentMethod, PlatformAccount, ProductType};
pub use common::{username_or_na, Envelope, Id, UploadedFile, UserRef};
pub use company::Company;
pub use geo::{Country, CountryRef, Town};
pub use user::{Gender, Rank, TownRef, User};
