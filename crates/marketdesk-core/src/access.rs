//! Which dashboard sections a user may open.

use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Dashboard,
    Countries,
    Cities,
    Companies,
    Users,
    ProductTypes,
    PlatformAccounts,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Dashboard,
        Section::Countries,
        Section::Cities,
        Section::Companies,
        Section::Users,
        Section::ProductTypes,
        Section::PlatformAccounts,
    ];

    pub fn route(&self) -> &'static str {
        match self {
            Section::Dashboard => "/dashboard",
            Section::Countries => "/countries",
            Section::Cities => "/cities",
            Section::Companies => "/companies",
            Section::Users => "/users",
            Section::ProductTypes => "/product-types",
            Section::PlatformAccounts => "/platform-accounts",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Countries => "Countries",
            Section::Cities => "Cities",
            Section::Companies => "Companies",
            Section::Users => "Users",
            Section::ProductTypes => "Product types",
            Section::PlatformAccounts => "Platform accounts",
        }
    }

    /// Sections company admins manage for their own company.
    fn open_to_company_admins(&self) -> bool {
        matches!(
            self,
            Section::Users | Section::ProductTypes | Section::PlatformAccounts
        )
    }

    pub fn is_visible_to(&self, user: Option<&User>) -> bool {
        match user {
            Some(u) if u.is_admin_or_staff() => true,
            Some(u) if u.is_company_admin() => self.open_to_company_admins(),
            _ => false,
        }
    }
}

/// Menu entries for `user`, in display order.
pub fn visible_sections(user: Option<&User>) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|s| s.is_visible_to(user))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(json: &str) -> User {
        serde_json::from_str(json).expect("test user parses")
    }

    #[test]
    fn test_anonymous_sees_nothing() {
        assert!(visible_sections(None).is_empty());
    }

    #[test]
    fn test_staff_sees_everything() {
        let staff = user(r#"{"id": 1, "username": "ops", "isStaff": true}"#);
        assert_eq!(visible_sections(Some(&staff)), Section::ALL.to_vec());

        let admin = user(r#"{"id": 2, "username": "root", "isAdmin": true}"#);
        assert_eq!(visible_sections(Some(&admin)).len(), 7);
    }

    #[test]
    fn test_company_admin_sees_company_sections() {
        let boss = user(r#"{"id": 3, "username": "boss", "rank": "ADMIN", "isApproved": true}"#);
        assert_eq!(
            visible_sections(Some(&boss)),
            vec![Section::Users, Section::ProductTypes, Section::PlatformAccounts]
        );
    }

    #[test]
    fn test_unapproved_company_admin_sees_nothing() {
        let boss = user(r#"{"id": 3, "username": "boss", "rank": "ADMIN"}"#);
        assert!(visible_sections(Some(&boss)).is_empty());

        let collaborator =
            user(r#"{"id": 4, "username": "c", "rank": "COLLABORATOR", "isApproved": true}"#);
        assert!(visible_sections(Some(&collaborator)).is_empty());
    }

    #[test]
    fn test_routes() {
        assert_eq!(Section::ProductTypes.route(), "/product-types");
        assert_eq!(Section::Cities.title(), "Cities");
    }
}
