//! # Host Bridge Traits
//!
//! Capability traits the dialog core depends on, implemented per platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the dialog invoker and the
//! native file-dialog library. The core never calls into native code itself;
//! it talks to a [`NativeDialogBackend`](dialog::NativeDialogBackend) that is
//! bound to one string-encoding family of the native ABI.
//!
//! ## Traits
//!
//! - [`NativeDialogBackend`](dialog::NativeDialogBackend) - open/save/pick-folder entry points
//! - [`NativePathSet`](dialog::NativePathSet) - owned multi-select result
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Encoding | Implementation |
//! |----------|----------|----------------|
//! | Windows  | UTF-16 (`N` entry points) | `bridge-desktop::WideStringBackend` |
//! | macOS    | UTF-8 (`U8` entry points) | `bridge-desktop::Utf8Backend` |
//! | Linux    | UTF-8 (`U8` entry points) | `bridge-desktop::Utf8Backend` |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError) for failures on
//! the Rust side of the boundary. A native `NFD_ERROR` is *not* a
//! `BridgeError`; it is reported as [`NativeReply::Error`](dialog::NativeReply)
//! so the caller can fetch the native error text.
//!
//! ## Thread Safety
//!
//! Backends are `Send + Sync` so they can be shared behind an `Arc`, but the
//! native library is not reentrant. Callers must serialize invocations.

pub mod dialog;
pub mod error;
pub mod filter;
pub mod log;

pub use error::BridgeError;

// Re-export commonly used types
pub use dialog::{Encoding, NativeDialogBackend, NativePathSet, NativeReply, NativeResult};
pub use filter::FilterSpec;
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
