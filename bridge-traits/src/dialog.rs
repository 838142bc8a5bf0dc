//! Native File Dialog Abstractions
//!
//! Contract between the dialog invoker and the native `nfd` library.
//!
//! The native library splits its ABI by string encoding: every entry point
//! exists as a `U8` variant taking UTF-8 and an `N` variant taking the
//! platform's native character type (UTF-16 on Windows). A
//! [`NativeDialogBackend`] is bound to exactly one of those variants and owns
//! all marshaling for it, so callers only ever deal in Rust strings.
//!
//! ## Result model
//!
//! Every dialog entry point reports one of three [`NativeResult`] codes.
//! Backends surface them as a [`NativeReply`], which carries the already
//! materialized out-parameter on `Okay`. Marshaling failures on the Rust side
//! (interior NULs) are reported through the outer
//! [`Result`](crate::error::Result) instead, so they can never be confused
//! with a native error.
//!
//! Paths cross the boundary as [`Path`]/[`PathBuf`], never as `String`: file
//! names on Linux are arbitrary bytes and NTFS names may hold unpaired
//! surrogates, and both must survive a round trip.
//!
//! ## Lifecycle
//!
//! `init` must be called before any dialog entry point and `teardown` after
//! it. Backends do not track this themselves; the invoker brackets each call.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{error::Result, filter::FilterSpec};

/// String encoding of a native entry-point family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// `NFD_*U8` entry points
    Utf8,
    /// `NFD_*N` entry points with UTF-16 `wchar_t` strings
    Wide,
}

impl Encoding {
    /// Encoding whose entry points must be used on the current OS.
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Wide
        } else {
            Self::Utf8
        }
    }

    /// Suffix used by the native symbol names of this family.
    pub fn symbol_suffix(self) -> &'static str {
        match self {
            Self::Utf8 => "U8",
            Self::Wide => "N",
        }
    }
}

/// Raw result code of a native call (`nfdresult_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeResult {
    Error,
    Okay,
    Cancel,
}

impl NativeResult {
    pub const ERROR: i32 = 0;
    pub const OKAY: i32 = 1;
    pub const CANCEL: i32 = 2;

    /// Decode a raw code. Unknown codes are treated as errors.
    pub fn from_raw(code: i32) -> Self {
        match code {
            Self::OKAY => Self::Okay,
            Self::CANCEL => Self::Cancel,
            _ => Self::Error,
        }
    }
}

/// Native result together with its out-parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeReply<T> {
    Okay(T),
    Cancel,
    Error,
}

impl<T> NativeReply<T> {
    pub fn result(&self) -> NativeResult {
        match self {
            Self::Okay(_) => NativeResult::Okay,
            Self::Cancel => NativeResult::Cancel,
            Self::Error => NativeResult::Error,
        }
    }

}

/// Selection returned by a multi-select dialog.
///
/// Implementations own the native handle and release it on drop. The set is
/// read by querying [`count`](NativePathSet::count) and then fetching each
/// index in order.
pub trait NativePathSet {
    /// Number of paths in the set
    fn count(&self) -> Result<NativeReply<usize>>;

    /// Path at `index`, where `index < count`
    fn path(&self, index: usize) -> Result<NativeReply<PathBuf>>;
}

/// Native dialog capability bound to one encoding family.
///
/// Default paths and names are optional; `None` becomes a native `NULL`.
/// Filters are forwarded in slice order with an explicit count.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::dialog::{NativeDialogBackend, NativeReply, NativeResult};
/// use std::path::PathBuf;
///
/// fn pick(backend: &dyn NativeDialogBackend) -> Option<PathBuf> {
///     if backend.init() != NativeResult::Okay {
///         return None;
///     }
///     let reply = backend.pick_folder(None).ok();
///     backend.teardown();
///     match reply {
///         Some(NativeReply::Okay(path)) => Some(path),
///         _ => None,
///     }
/// }
/// ```
pub trait NativeDialogBackend: Send + Sync {
    /// Encoding family this backend marshals through
    fn encoding(&self) -> Encoding;

    /// `NFD_Init`
    fn init(&self) -> NativeResult;

    /// `NFD_Quit`
    fn teardown(&self);

    /// `NFD_OpenDialog*`
    fn open_dialog(
        &self,
        filters: &[FilterSpec],
        default_path: Option<&Path>,
    ) -> Result<NativeReply<PathBuf>>;

    /// `NFD_OpenDialogMultiple*`
    fn open_dialog_multiple(
        &self,
        filters: &[FilterSpec],
        default_path: Option<&Path>,
    ) -> Result<NativeReply<Box<dyn NativePathSet>>>;

    /// `NFD_SaveDialog*`
    fn save_dialog(
        &self,
        filters: &[FilterSpec],
        default_path: Option<&Path>,
        default_name: Option<&str>,
    ) -> Result<NativeReply<PathBuf>>;

    /// `NFD_PickFolder*`
    fn pick_folder(&self, default_path: Option<&Path>) -> Result<NativeReply<PathBuf>>;

    /// `NFD_GetError`
    fn last_error(&self) -> Option<String>;

    /// `NFD_ClearError`
    fn clear_error(&self);
}
