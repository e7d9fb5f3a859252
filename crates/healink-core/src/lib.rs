//! Core types and trait definitions for the Healink telemetry platform.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod alert;
pub mod error;
pub mod guard;
pub mod identity;
pub mod sample;
pub mod store;

pub use error::{Error, Result};
