//! Pagination Module
//!
//! Generic cursor-driven page walking with hard safety ceilings.

mod engine;

pub use engine::{
    collect_pages, execute_pagination, PageLimits, PageOutcome, PaginationRequest, Paginator,
    DEFAULT_MAX_ITEMS, DEFAULT_MAX_PAGES,
};
