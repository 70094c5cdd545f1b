//! List queries: request parameters, screen filter state and result pages.

pub mod filters;
pub mod page;
pub mod params;

pub use filters::ModuleFilters;
pub use page::{Page, Pagination};
pub use params::{ListParams, ALL_ROWS, DEFAULT_LIMIT};
