//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the dialog core:
//! - Logging and tracing infrastructure
//! - Configuration management and backend discovery
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the dialog invoker depends on.
//! It establishes the logging conventions and resolves which native backends
//! are available before any dialog is shown.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
