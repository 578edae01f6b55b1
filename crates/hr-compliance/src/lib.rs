//! Compliance expiry tracking for HR document categories.
//!
//! The [`compliance`] module holds the status evaluator and the list, schedule,
//! report, and HTTP layers built on top of it. [`import`] reads record exports
//! from CSV, and [`config`], [`telemetry`], and [`error`] carry the service
//! plumbing shared with the API binary.

pub mod compliance;
pub mod config;
pub mod error;
pub mod import;
pub mod telemetry;
