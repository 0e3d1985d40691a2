//! Shared types, errors, and configuration for Vendora.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    AlertThresholds, AppConfig, EngineConfig, IngredientCatalog, ProviderRatio,
    ReconciliationThresholds, SettlementConfig,
};
pub use error::{AppError, AppResult};
