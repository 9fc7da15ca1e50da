//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic over whole listings.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
