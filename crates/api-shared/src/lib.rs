//! # API Shared
//!
//! Shared utilities and definitions for PRM APIs.
//!
//! Contains:
//! - Wire DTOs for the REST surface (`dto` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the root `prm-run` binary for common functionality.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
