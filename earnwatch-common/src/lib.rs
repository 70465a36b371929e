//! Shared foundation for the Earnwatch dashboard.
//!
//! Provides the configuration loader, the unified error type, and the
//! logging bootstrap used by the client library and the CLI front end.

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{Error, Result};
