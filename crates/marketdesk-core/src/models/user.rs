use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{null_as_false, Id};

/// Position of a user inside their company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    GeneralManager,
    HumanResourcesManager,
    ItManager,
    Admin,
    Collaborator,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "MALE")]
    Male,
    // Spelled this way by the backend.
    #[serde(rename = "FEMAL")]
    Female,
    #[serde(untagged)]
    Other(String),
}

/// Town stub embedded in users and companies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TownRef {
    #[serde(default)]
    pub id: Option<Id>,
    pub name: String,
    #[serde(rename = "countryId", default)]
    pub country_id: Option<Id>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub rank: Option<Rank>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub company_id: Option<Id>,
    #[serde(default)]
    pub business_sector: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub town_id: Option<Id>,
    #[serde(default)]
    pub town: Option<TownRef>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_staff: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_approved: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() => format!("{} {}", first, last),
            (_, Some(last)) if !last.is_empty() => last.to_string(),
            _ => self.username.clone(),
        }
    }

    pub fn is_admin_or_staff(&self) -> bool {
        self.is_admin || self.is_staff
    }

    /// Administrator of an approved company.
    pub fn is_company_admin(&self) -> bool {
        self.rank == Some(Rank::Admin) && self.is_approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user() {
        let json = r#"{
            "id": 7,
            "username": "mbella",
            "firstName": "Marie",
            "lastName": "Bella",
            "gender": "FEMAL",
            "rank": "IT_MANAGER",
            "isStaff": true,
            "town": {"id": 9, "name": "Douala", "countryId": 4}
        }"#;

        let user: User = serde_json::from_str(json).expect("user parses");
        assert_eq!(user.gender, Some(Gender::Female));
        assert_eq!(user.rank, Some(Rank::ItManager));
        assert!(user.is_admin_or_staff());
        assert!(!user.is_company_admin());
        assert_eq!(user.full_name(), "Marie Bella");
    }

    #[test]
    fn test_unknown_rank_is_preserved() {
        let rank: Rank = serde_json::from_str(r#""SALES_MANAGER""#).unwrap();
        assert_eq!(rank, Rank::Other("SALES_MANAGER".to_string()));
        assert_eq!(serde_json::to_string(&rank).unwrap(), r#""SALES_MANAGER""#);
    }

    #[test]
    fn test_full_name_fallbacks() {
        let mut user: User = serde_json::from_str(r#"{"id": 1, "username": "jdoe"}"#).unwrap();
        assert_eq!(user.full_name(), "jdoe");
        user.last_name = Some("Doe".to_string());
        assert_eq!(user.full_name(), "Doe");
    }

    #[test]
    fn test_null_flags_read_as_false() {
        let json = r#"{"id": 2, "username": "ghost", "isActive": null, "isStaff": null,
            "isAdmin": null, "isApproved": null}"#;
        let user: User = serde_json::from_str(json).expect("null flags parse");
        assert!(!user.is_active);
        assert!(!user.is_admin_or_staff());
        assert!(!user.is_company_admin());
    }

    #[test]
    fn test_company_admin_requires_approval() {
        let mut user: User =
            serde_json::from_str(r#"{"id": 1, "username": "boss", "rank": "ADMIN"}"#).unwrap();
        assert!(!user.is_company_admin());
        user.is_approved = true;
        assert!(user.is_company_admin());
    }
}
