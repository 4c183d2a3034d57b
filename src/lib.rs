//! doclinks: Verify that markdown links point at files and headings that exist
//!
//! Commands:
//! - check: Check local links in every markdown file under a directory
//! - links: List the links found in one markdown file

pub mod anchors;
pub mod check_links;
pub mod discover;
pub mod error;
pub mod extract;
pub mod list_links;
pub mod resolve;
pub mod schema;
pub mod storage;

pub use check_links::{check_links, CheckConfig, Checker, ReportFormat};
pub use error::Error;
pub use extract::Extractor;
pub use resolve::Resolver;
pub use schema::{LinkKind, LinkOccurrence, Report, ResolutionResult};
pub use storage::{FsStorage, Storage};
