use std::collections::BTreeMap;

/// Default page size of list screens.
pub const DEFAULT_LIMIT: i64 = 10;

/// `limit` value asking the backend for every row (option lists).
pub const ALL_ROWS: i64 = -1;

/// Query of a paginated list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: u32,
    pub limit: i64,
    /// Advanced filters (`countryId`, `createdAtStart`, `sortBy`, ...).
    pub filters: BTreeMap<String, String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            search: None,
            is_active: None,
            page: 1,
            limit: DEFAULT_LIMIT,
            filters: BTreeMap::new(),
        }
    }
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every active row, for autocomplete options.
    pub fn all_active() -> Self {
        Self {
            is_active: Some(true),
            limit: ALL_ROWS,
            ..Self::default()
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Query pairs: blank search and unset `isActive` are left out, `page`
    /// and `limit` are always sent.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(term) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("search".to_string(), term.to_string()));
        }
        if let Some(active) = self.is_active {
            query.push(("isActive".to_string(), active.to_string()));
        }
        query.push(("page".to_string(), self.page.to_string()));
        query.push(("limit".to_string(), self.limit.to_string()));
        for (key, value) in &self.filters {
            if matches!(key.as_str(), "search" | "isActive" | "page" | "limit") {
                continue;
            }
            query.push((key.clone(), value.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_send_page_and_limit_only() {
        assert_eq!(ListParams::new().to_query(), q(&[("page", "1"), ("limit", "10")]));
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let params = ListParams::new().search("   ");
        assert_eq!(params.to_query(), q(&[("page", "1"), ("limit", "10")]));
    }

    #[test]
    fn test_full_query_order() {
        let params = ListParams::new()
            .search("dou")
            .active(false)
            .page(3)
            .limit(25)
            .filter("sortBy", "name")
            .filter("countryId", "4");
        assert_eq!(
            params.to_query(),
            q(&[
                ("search", "dou"),
                ("isActive", "false"),
                ("page", "3"),
                ("limit", "25"),
                ("countryId", "4"),
                ("sortBy", "name"),
            ])
        );
    }

    #[test]
    fn test_all_active() {
        assert_eq!(
            ListParams::all_active().to_query(),
            q(&[("isActive", "true"), ("page", "1"), ("limit", "-1")])
        );
    }

    #[test]
    fn test_page_is_at_least_one() {
        assert_eq!(ListParams::new().page(0).page, 1);
    }
}
