//! Report assembly.
//!
//! Validates a request, normalizes and filters transactions, then builds the
//! structures the report kind asks for and stamps the metadata.

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportEngine;
pub use types::*;
