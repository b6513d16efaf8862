// Maps Listing Scraper Library
//
// Resilient extraction and pagination engine for infinite-scroll business
// search results: tolerant per-field extraction, progressive-load
// triggering, and detail-page enrichment behind pluggable DOM ports.

pub mod detail;
pub mod dom;
pub mod error;
pub mod extract;
pub mod listing;
pub mod output;
pub mod pagination;
pub mod record;
pub mod session;
pub mod static_dom;

// Re-export main types for convenience
pub use detail::{DetailConfig, DetailEnricher, DetailSelectors};
pub use dom::{DomQuery, Key, Navigator, Scope};
pub use error::{MissingReason, PortError, ScrapeError};
pub use extract::{Source, Strategy, extract_first};
pub use listing::{ITEM_SELECTOR, ListingBuilder, ListingSelectors};
pub use output::{output_file_path, write_listings};
pub use pagination::{PaginationConfig, PaginationDriver};
pub use record::{DetailRecord, ListingRecord, NA, WeeklyHours};
pub use session::{
    SearchSession, SessionConfig, SessionOutput, build_search_url, results_container_selector,
};
pub use static_dom::{StaticDom, StaticNode};
