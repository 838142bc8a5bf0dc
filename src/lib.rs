//! Workspace façade crate.
//!
//! Re-exports the dialog invoker from `core-dialog` and maps the workspace
//! feature flags onto it. Host applications can depend on `nfd-workspace`
//! and enable `desktop-shims` (default) to get the `nfd`-backed adapters
//! without wiring each crate individually.

pub use core_dialog::*;
