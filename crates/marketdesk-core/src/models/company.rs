use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{null_as_false, Id, UserRef};
use super::user::TownRef;

/// A tenant company registered on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub business_sector: Option<String>,
    #[serde(default)]
    pub country_id: Option<Id>,
    #[serde(default)]
    pub town_id: Option<Id>,
    #[serde(default)]
    pub town: Option<TownRef>,
    #[serde(default)]
    pub address: Option<String>,
    /// Tax identification number.
    #[serde(default)]
    pub nui: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Logo URLs, first one is displayed.
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_approved: bool,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creator: Option<UserRef>,
    #[serde(default)]
    pub updator: Option<UserRef>,
    #[serde(default)]
    pub validator: Option<UserRef>,
    #[serde(default)]
    pub employees: Vec<UserRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Company {
    pub fn logo(&self) -> Option<&str> {
        self.media.first().map(String::as_str)
    }

    /// "(n) name, name" as shown in the employees column.
    pub fn employees_display(&self) -> String {
        let names: Vec<&str> = self
            .employees
            .iter()
            .filter_map(|e| e.username.as_deref())
            .collect();
        format!("({}) {}", self.employees.len(), names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_company() {
        let json = r#"{
            "id": 3,
            "name": "Sawa Foods",
            "businessSector": "Agrifood",
            "nui": "M0123456789",
            "media": ["https://cdn.example/logo.png"],
            "isApproved": true,
            "approvedAt": "2024-06-01T08:00:00Z",
            "employees": [{"id": 1, "username": "a"}, {"id": 2, "username": "b"}]
        }"#;

        let company: Company = serde_json::from_str(json).expect("company parses");
        assert_eq!(company.logo(), Some("https://cdn.example/logo.png"));
        assert!(company.is_approved);
        assert!(company.approved_at.is_some());
        assert_eq!(company.employees_display(), "(2) a, b");
    }
}
