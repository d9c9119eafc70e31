//! Core domain models and configuration for the adapter.
//!
//! This module contains the fundamental types shared by the translation
//! pipeline: the legacy measurement model, adapter configuration, and the
//! crate-wide error type.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AdapterConfig, AdapterConfigBuilder, GroupingMode};
pub use error::{Error, Result};
pub use types::{FieldValue, Fields, Measurement, Tags, ValueKind};
