//! Shared types, errors, and configuration for Kakebo.
//!
//! This crate provides common types used across all other crates:
//! - Fixed-point money helpers with decimal precision
//! - Typed IDs for type-safe entity references
//! - Billing cycle tags
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
