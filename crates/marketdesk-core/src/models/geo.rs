//! Reference data: countries and the towns (cities) inside them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{null_as_false, Id, UserRef};
use super::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "referenceNumber", default)]
    pub reference_number: Option<String>,
    #[serde(rename = "isActive", default, deserialize_with = "null_as_false")]
    pub is_active: bool,
    #[serde(default)]
    pub creator: Option<UserRef>,
    #[serde(default)]
    pub updator: Option<UserRef>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub towns: Vec<Town>,
}

impl Country {
    /// Comma-separated town names, for list cells.
    pub fn town_names(&self) -> String {
        self.towns
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Town {
    pub id: Id,
    pub name: String,
    #[serde(rename = "countryId", default)]
    pub country_id: Option<Id>,
    #[serde(default)]
    pub country: Option<CountryRef>,
    #[serde(rename = "referenceNumber", default)]
    pub reference_number: Option<String>,
    #[serde(rename = "isActive", default, deserialize_with = "null_as_false")]
    pub is_active: bool,
    #[serde(default)]
    pub creator: Option<UserRef>,
    #[serde(default)]
    pub updator: Option<UserRef>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub citizens: Vec<User>,
}

impl Town {
    pub fn country_name(&self) -> &str {
        self.country
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("N/A")
    }
}

/// Country stub embedded in towns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryRef {
    #[serde(default)]
    pub id: Option<Id>,
    pub name: String,
}
