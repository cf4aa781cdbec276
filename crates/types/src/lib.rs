//! Shared types for the settings bundle
//!
//! This crate contains the error types shared by the configuration object,
//! the bundle and the launcher.

pub mod error;

pub use error::{BundleError, BundleResult, Result, SettingsError};
