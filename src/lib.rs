//! WriteWell library crate
//!
//! Exposes the suggestion pipeline so external frontends (and the CLI binary)
//! can drive analysis, settings, and one-click apply without going through
//! process startup.

pub mod config;
pub mod error;
pub mod service;
pub mod suggest;

pub use error::Error;
