//! # Desktop Bridge Implementations
//!
//! Native dialog backends for desktop platforms (macOS, Windows, Linux),
//! backed by the `nfd` shared library (nativefiledialog-extended).
//!
//! ## Overview
//!
//! The library is loaded at runtime with `libloading`, so binaries build and
//! start on machines without it and only fail when a dialog is requested.
//! Two backends sit on top of one loaded [`NfdLibrary`]:
//! - [`Utf8Backend`] for the `NFD_*U8` entry points (Linux, macOS)
//! - [`WideStringBackend`] for the UTF-16 `NFD_*N` entry points (Windows only)
//!
//! Use [`host_backends`] to get every backend usable on the current OS.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{default_library_names, host_backends, NfdLibrary};
//!
//! let library = NfdLibrary::load(&default_library_names())?;
//! let backends = host_backends(library);
//! ```

pub mod ffi;
mod library;
mod marshal;
mod utf8;

#[cfg(windows)]
mod wide;

use bridge_traits::NativeDialogBackend;
use std::sync::Arc;

pub use library::{default_library_names, NfdLibrary};
pub use utf8::Utf8Backend;

#[cfg(windows)]
pub use wide::WideStringBackend;

/// Backends for every encoding family `library` can serve on this OS,
/// wide first where available.
pub fn host_backends(library: Arc<NfdLibrary>) -> Vec<Arc<dyn NativeDialogBackend>> {
    let mut backends: Vec<Arc<dyn NativeDialogBackend>> = Vec::with_capacity(2);

    #[cfg(windows)]
    backends.push(Arc::new(WideStringBackend::new(Arc::clone(&library))));

    backends.push(Arc::new(Utf8Backend::new(library)));
    backends
}
