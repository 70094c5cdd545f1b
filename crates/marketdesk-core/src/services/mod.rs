//! Typed services over the backend's CRUD collections and file uploads.

pub mod files;
pub mod resource;

pub use files::{file_part, FileService, UPLOAD_FIELD, UPLOAD_PATH};
pub use resource::{Resource, ResourceService};

use crate::api::ApiClient;
use crate::models::{Company, Country, PlatformAccount, ProductType, Town, User};

/// Entry point handing out one service per collection.
#[derive(Clone)]
pub struct Services {
    api: ApiClient,
}

impl Services {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn countries(&self) -> ResourceService<Country> {
        ResourceService::new(self.api.clone(), Resource::Countries)
    }

    pub fn towns(&self) -> ResourceService<Town> {
        ResourceService::new(self.api.clone(), Resource::Towns)
    }

    pub fn companies(&self) -> ResourceService<Company> {
        ResourceService::new(self.api.clone(), Resource::Companies)
    }

    pub fn users(&self) -> ResourceService<User> {
        ResourceService::new(self.api.clone(), Resource::Users)
    }

    pub fn product_types(&self) -> ResourceService<ProductType> {
        ResourceService::new(self.api.clone(), Resource::ProductTypes)
    }

    pub fn platform_accounts(&self) -> ResourceService<PlatformAccount> {
        ResourceService::new(self.api.clone(), Resource::PlatformAccounts)
    }

    /// Untyped access, for generic front ends.
    pub fn raw(&self, resource: Resource) -> ResourceService<serde_json::Value> {
        ResourceService::new(self.api.clone(), resource)
    }

    pub fn files(&self) -> FileService {
        FileService::new(self.api.clone())
    }
}
