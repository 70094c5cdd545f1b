use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{Envelope, Id};
use crate::query::{ListParams, Page};

/// Backend CRUD collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Countries,
    Towns,
    Companies,
    Users,
    ProductTypes,
    PlatformAccounts,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Countries,
        Resource::Towns,
        Resource::Companies,
        Resource::Users,
        Resource::ProductTypes,
        Resource::PlatformAccounts,
    ];

    /// Collection path on the backend.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Countries => "/countries",
            Resource::Towns => "/towns",
            Resource::Companies => "/companies",
            Resource::Users => "/users",
            Resource::ProductTypes => "/product_types",
            Resource::PlatformAccounts => "/platform_accounts",
        }
    }

    pub fn name(&self) -> &'static str {
        self.path().trim_start_matches('/')
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = String;

    /// Accepts collection names plus the screen aliases (`cities`, dashes).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "countries" => Ok(Resource::Countries),
            "towns" | "cities" => Ok(Resource::Towns),
            "companies" => Ok(Resource::Companies),
            "users" => Ok(Resource::Users),
            "product_types" => Ok(Resource::ProductTypes),
            "platform_accounts" => Ok(Resource::PlatformAccounts),
            other => Err(format!("Unknown resource: {}", other)),
        }
    }
}

/// Typed CRUD access to one collection.
pub struct ResourceService<T> {
    api: ApiClient,
    resource: Resource,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceService<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            resource: self.resource,
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ResourceService<T> {
    pub fn new(api: ApiClient, resource: Resource) -> Self {
        Self {
            api,
            resource,
            _marker: PhantomData,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    fn item_path(&self, id: &Id) -> String {
        format!("{}/{}", self.resource.path(), id)
    }

    /// One page of the collection. Missing `result` reads as an empty page.
    pub async fn list(&self, params: &ListParams) -> Result<Page<T>, ApiError> {
        let query = params.to_query();
        debug!(resource = %self.resource, ?query, "Listing");
        let envelope: Envelope<Page<T>> = self
            .api
            .get_with_query(self.resource.path(), &query)
            .await?;
        Ok(envelope.result.unwrap_or_default())
    }

    /// Every active row, for option lists.
    pub async fn list_all(&self) -> Result<Vec<T>, ApiError> {
        Ok(self.list(&ListParams::all_active()).await?.data)
    }

    pub async fn get(&self, id: &Id) -> Result<T, ApiError> {
        let envelope: Envelope<T> = self.api.get(&self.item_path(id)).await?;
        envelope.result.ok_or_else(|| {
            ApiError::InvalidResponse(format!("{} {} returned no result", self.resource, id))
        })
    }

    /// `POST /<resource>/create`; returns the backend's `result`.
    pub async fn create<B: Serialize + ?Sized>(&self, payload: &B) -> Result<Value, ApiError> {
        let path = format!("{}/create", self.resource.path());
        let envelope: Envelope<Value> = self.api.post(&path, payload).await?;
        Ok(envelope.result.unwrap_or(Value::Null))
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &Id, payload: &B) -> Result<Value, ApiError> {
        let envelope: Envelope<Value> = self.api.put(&self.item_path(id), payload).await?;
        Ok(envelope.result.unwrap_or(Value::Null))
    }

    /// Soft delete.
    pub async fn delete(&self, id: &Id) -> Result<Value, ApiError> {
        let envelope: Envelope<Value> = self.api.delete(&self.item_path(id)).await?;
        Ok(envelope.result.unwrap_or(Value::Null))
    }

    /// Undo a soft delete.
    pub async fn restore(&self, id: &Id) -> Result<Value, ApiError> {
        let envelope: Envelope<Value> = self
            .api
            .patch(&self.item_path(id), &serde_json::json!({}))
            .await?;
        Ok(envelope.result.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::ProductTypes.path(), "/product_types");
        assert_eq!(Resource::PlatformAccounts.name(), "platform_accounts");
        assert_eq!(Resource::Towns.to_string(), "towns");
    }

    #[test]
    fn test_resource_from_str_aliases() {
        assert_eq!("cities".parse::<Resource>(), Ok(Resource::Towns));
        assert_eq!("product-types".parse::<Resource>(), Ok(Resource::ProductTypes));
        assert_eq!("Users".parse::<Resource>(), Ok(Resource::Users));
        assert!("invoices".parse::<Resource>().is_err());
    }

    #[test]
    fn test_every_resource_round_trips_through_name() {
        for resource in Resource::ALL {
            assert_eq!(resource.name().parse::<Resource>(), Ok(resource));
        }
    }
}
