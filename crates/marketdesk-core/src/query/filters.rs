//! Filter state of a list screen.
//!
//! Mirrors the query string a list screen keeps: `search`, `isActive`,
//! `page` and any advanced filters. Every change that alters the result set
//! sends the user back to page 1.

use std::collections::BTreeMap;

use super::params::ListParams;

const SEARCH: &str = "search";
const IS_ACTIVE: &str = "isActive";
const PAGE: &str = "page";
const LIMIT: &str = "limit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFilters {
    params: BTreeMap<String, String>,
}

impl Default for ModuleFilters {
    fn default() -> Self {
        Self::new()
    }
}

/// Values that clear a filter instead of setting it.
fn is_blank(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == "false"
}

impl ModuleFilters {
    /// Fresh screen: only active rows.
    pub fn new() -> Self {
        Self::from_params(BTreeMap::new())
    }

    /// Restore from an existing query string map; `isActive` defaults to true.
    pub fn from_params(mut params: BTreeMap<String, String>) -> Self {
        params
            .entry(IS_ACTIVE.to_string())
            .or_insert_with(|| "true".to_string());
        Self { params }
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn search_term(&self) -> &str {
        self.get(SEARCH).unwrap_or("")
    }

    pub fn is_active(&self) -> bool {
        self.get(IS_ACTIVE) == Some("true")
    }

    fn reset_page(&mut self) {
        self.params.insert(PAGE.to_string(), "1".to_string());
    }

    /// Commit a search term. Only a non-empty term resets the page.
    pub fn set_search(&mut self, term: &str) {
        if term.is_empty() {
            self.params.remove(SEARCH);
        } else {
            self.params.insert(SEARCH.to_string(), term.to_string());
            self.reset_page();
        }
    }

    /// Switch between active and inactive rows.
    pub fn toggle_active(&mut self) {
        let next = if self.is_active() { "false" } else { "true" };
        self.params.insert(IS_ACTIVE.to_string(), next.to_string());
        self.reset_page();
    }

    /// Apply advanced filters; blank or `false` values remove the key.
    pub fn apply_filters<I, K, V>(&mut self, filters: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let is_active = self.params.get(IS_ACTIVE).cloned();
        for (key, value) in filters {
            let key = key.into();
            let value = value.into();
            if is_blank(&value) {
                self.params.remove(&key);
            } else {
                self.params.insert(key, value);
            }
        }
        if let Some(is_active) = is_active {
            self.params.insert(IS_ACTIVE.to_string(), is_active);
        }
        self.reset_page();
    }

    /// Drop advanced filters, keeping the search term.
    pub fn reset_filters(&mut self) {
        let search = self.params.remove(SEARCH);
        self.params.clear();
        self.params.insert(IS_ACTIVE.to_string(), "true".to_string());
        if let Some(search) = search {
            self.params.insert(SEARCH.to_string(), search);
        }
        self.reset_page();
    }

    pub fn set_page(&mut self, page: u32) {
        self.params.insert(PAGE.to_string(), page.max(1).to_string());
    }

    pub fn has_advanced_filters(&self) -> bool {
        self.params
            .keys()
            .any(|key| !matches!(key.as_str(), PAGE | SEARCH | IS_ACTIVE))
    }

    /// Params for the list call. Unparseable page/limit fall back to defaults.
    pub fn to_list_params(&self) -> ListParams {
        let mut params = ListParams::new();
        if let Some(search) = self.get(SEARCH) {
            params = params.search(search);
        }
        params.is_active = match self.get(IS_ACTIVE) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };
        if let Some(page) = self.get(PAGE).and_then(|p| p.parse().ok()) {
            params = params.page(page);
        }
        if let Some(limit) = self.get(LIMIT).and_then(|l| l.parse().ok()) {
            params = params.limit(limit);
        }
        for (key, value) in &self.params {
            if !matches!(key.as_str(), SEARCH | IS_ACTIVE | PAGE | LIMIT) {
                params.filters.insert(key.clone(), value.clone());
            }
        }
        params
    }
}
