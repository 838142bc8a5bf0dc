//! # Native File Dialogs
//!
//! Opens the operating system's file dialogs through the `nfd`
//! (nativefiledialog-extended) library.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`DialogInvoker`]: open, multi-open, save and folder-pick dialogs
//! - [`DialogRequest`] / [`DialogOutcome`]: serializable request and result types
//! - Per-call lifecycle handling (`init`/`teardown`) and native error capture
//! - Serialization of dialogs across threads, with nested dialogs rejected
//!
//! The native library comes in a UTF-8 flavour and a wide-string flavour;
//! the invoker picks the one the host OS requires on every call.

mod invoker;
mod lifecycle;

pub mod error;
pub mod request;

pub use bridge_traits::{Encoding, FilterSpec};
pub use error::{DialogError, Result};
pub use invoker::DialogInvoker;
pub use request::{DialogOutcome, DialogRequest};
