//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services take already-loaded records; reading and writing listings
//! belongs to the infrastructure store.

mod catalog;
mod dependency;
mod merge;

pub use catalog::{CatalogService, CatalogSummary};
pub use dependency::DependencyService;
pub use merge::MergeService;
