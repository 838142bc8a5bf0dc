//! # Dialog Invoker
//!
//! Shows native file dialogs through a [`NativeDialogBackend`].
//!
//! ## Overview
//!
//! Every invocation follows the same sequence:
//! 1. Validate the request (filters, NUL bytes)
//! 2. Pick the backend whose encoding matches the host OS
//! 3. Claim the process-wide dialog slot
//! 4. `init`, dialog call, `teardown`
//!
//! Native results are translated as follows:
//! - `Okay` becomes [`DialogOutcome::Selected`] or [`DialogOutcome::SelectedMany`]
//! - `Cancel` becomes [`DialogOutcome::Cancelled`]
//! - `Error` becomes [`DialogError::Native`] carrying the native error text,
//!   which is cleared before teardown
//!
//! Nothing native is touched when validation fails.
//!
//! ## Usage
//!
//! ```ignore
//! use core_dialog::{DialogInvoker, FilterSpec};
//!
//! let invoker = DialogInvoker::desktop()?;
//! let outcome = invoker.open_file(None, &[FilterSpec::new("Images", "png,jpg")])?;
//! if let Some(path) = outcome.path() {
//!     println!("{}", path.display());
//! }
//! ```

use bridge_traits::{Encoding, FilterSpec, NativeDialogBackend, NativePathSet, NativeReply};
use core_runtime::config::DialogConfig;
use core_runtime::logging::strip_path;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{DialogError, Result};
use crate::lifecycle::{DialogSlot, NativeSession};
use crate::request::{DialogOutcome, DialogRequest};

/// Entry point for showing native dialogs.
///
/// Cheap to clone; backends are shared.
#[derive(Clone)]
pub struct DialogInvoker {
    backends: Vec<Arc<dyn NativeDialogBackend>>,
}

impl DialogInvoker {
    /// Create an invoker from a built configuration.
    pub fn new(config: DialogConfig) -> Result<Self> {
        config.validate()?;
        info!(backends = config.backends.len(), "Dialog invoker created");
        Ok(Self {
            backends: config.backends,
        })
    }

    /// Create an invoker around a single backend.
    pub fn with_backend(backend: Arc<dyn NativeDialogBackend>) -> Self {
        Self {
            backends: vec![backend],
        }
    }

    /// Load the `nfd` library from the default locations.
    #[cfg(feature = "desktop-shims")]
    pub fn desktop() -> Result<Self> {
        Self::new(DialogConfig::builder().build()?)
    }

    /// Encodings of the registered backends, in registration order.
    pub fn encodings(&self) -> Vec<Encoding> {
        self.backends.iter().map(|b| b.encoding()).collect()
    }

    /// Show a single-selection open dialog.
    pub fn open_file(
        &self,
        default_path: Option<&Path>,
        filters: &[FilterSpec],
    ) -> Result<DialogOutcome> {
        let mut request = DialogRequest::open_file().with_filters(filters.iter().cloned());
        if let Some(path) = default_path {
            request = request.with_default_path(path);
        }
        self.run(&request)
    }

    /// Show a multi-selection open dialog.
    ///
    /// Paths are returned in the order the native library reports them.
    pub fn open_files(
        &self,
        default_path: Option<&Path>,
        filters: &[FilterSpec],
    ) -> Result<DialogOutcome> {
        let mut request = DialogRequest::open_files().with_filters(filters.iter().cloned());
        if let Some(path) = default_path {
            request = request.with_default_path(path);
        }
        self.run(&request)
    }

    /// Show a save dialog.
    pub fn save_file(
        &self,
        default_path: Option<&Path>,
        default_name: Option<&str>,
        filters: &[FilterSpec],
    ) -> Result<DialogOutcome> {
        let mut request = DialogRequest::save_file().with_filters(filters.iter().cloned());
        if let Some(path) = default_path {
            request = request.with_default_path(path);
        }
        if let Some(name) = default_name {
            request = request.with_default_name(name);
        }
        self.run(&request)
    }

    /// Show a folder picker.
    pub fn pick_folder(&self, default_path: Option<&Path>) -> Result<DialogOutcome> {
        let mut request = DialogRequest::pick_folder();
        if let Some(path) = default_path {
            request = request.with_default_path(path);
        }
        self.run(&request)
    }

    /// Show the dialog described by `request`.
    ///
    /// # Errors
    ///
    /// - [`DialogError::InvalidArgument`] when the request cannot be marshaled
    /// - [`DialogError::EncodingUnavailable`] when no backend matches the host
    /// - [`DialogError::Reentrant`] when called from inside another dialog
    /// - [`DialogError::Native`] when the native library reports an error
    pub fn run(&self, request: &DialogRequest) -> Result<DialogOutcome> {
        request.validate()?;
        let default_path = request.native_default_path();
        let default_name = request.native_default_name();

        let backend = self.backend_for(Encoding::host())?;

        debug!(
            operation = request.operation(),
            encoding = ?backend.encoding(),
            filters = request.filters().len(),
            default_path = ?default_path.map(file_name),
            "Showing native dialog"
        );

        let _slot = DialogSlot::acquire()?;
        let session = NativeSession::open(backend)?;

        let result = match request {
            DialogRequest::OpenSingle { filters, .. } => {
                let reply = backend.open_dialog(filters, default_path)?;
                single_outcome(reply, &session)
            }
            DialogRequest::OpenMultiple { filters, .. } => {
                match backend.open_dialog_multiple(filters, default_path)? {
                    NativeReply::Okay(set) => match collect_paths(set.as_ref())? {
                        NativeReply::Okay(paths) if paths.is_empty() => {
                            warn!("Multi-select dialog returned an empty selection");
                            Ok(DialogOutcome::Cancelled)
                        }
                        NativeReply::Okay(paths) => Ok(DialogOutcome::SelectedMany(paths)),
                        NativeReply::Cancel | NativeReply::Error => Err(session.native_error()),
                    },
                    NativeReply::Cancel => Ok(DialogOutcome::Cancelled),
                    NativeReply::Error => Err(session.native_error()),
                }
            }
            DialogRequest::Save { filters, .. } => {
                let reply = backend.save_dialog(filters, default_path, default_name)?;
                single_outcome(reply, &session)
            }
            DialogRequest::PickFolder { .. } => {
                let reply = backend.pick_folder(default_path)?;
                single_outcome(reply, &session)
            }
        };

        match &result {
            Ok(DialogOutcome::Selected(path)) => info!(
                operation = request.operation(),
                file = %file_name(path),
                "Dialog selection made"
            ),
            Ok(DialogOutcome::SelectedMany(paths)) => info!(
                operation = request.operation(),
                count = paths.len(),
                "Dialog selection made"
            ),
            Ok(DialogOutcome::Cancelled) => {
                debug!(operation = request.operation(), "Dialog cancelled")
            }
            Err(e) => error!(operation = request.operation(), "Dialog failed: {}", e),
        }

        result
    }

    fn backend_for(&self, encoding: Encoding) -> Result<&dyn NativeDialogBackend> {
        self.backends
            .iter()
            .find(|b| b.encoding() == encoding)
            .map(|b| b.as_ref())
            .ok_or(DialogError::EncodingUnavailable(encoding))
    }
}

impl std::fmt::Debug for DialogInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogInvoker")
            .field("encodings", &self.encodings())
            .finish()
    }
}

/// Base name of `path` for logs.
fn file_name(path: &Path) -> String {
    strip_path(&path.to_string_lossy()).to_string()
}

fn single_outcome(
    reply: NativeReply<PathBuf>,
    session: &NativeSession<'_>,
) -> Result<DialogOutcome> {
    match reply {
        NativeReply::Okay(path) => Ok(DialogOutcome::Selected(path)),
        NativeReply::Cancel => Ok(DialogOutcome::Cancelled),
        NativeReply::Error => Err(session.native_error()),
    }
}

/// Read every path of a selection in index order.
///
/// A query that does not report `Okay` makes the whole read an error; a
/// path set has no way to be cancelled.
fn collect_paths(set: &dyn NativePathSet) -> Result<NativeReply<Vec<PathBuf>>> {
    let count = match set.count()? {
        NativeReply::Okay(count) => count,
        reply => {
            warn!(result = ?reply.result(), "Path set count query failed");
            return Ok(NativeReply::Error);
        }
    };

    let mut paths = Vec::with_capacity(count);
    for index in 0..count {
        match set.path(index)? {
            NativeReply::Okay(path) => paths.push(path),
            reply => {
                warn!(index, result = ?reply.result(), "Path set path query failed");
                return Ok(NativeReply::Error);
            }
        }
    }
    Ok(NativeReply::Okay(paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{BridgeError, NativeResult};
    use mockall::mock;
    use mockall::predicate::*;
    use mockall::Sequence;

    mock! {
        pub PathSet {}

        impl NativePathSet for PathSet {
            fn count(&self) -> bridge_traits::error::Result<NativeReply<usize>>;
            fn path(&self, index: usize) -> bridge_traits::error::Result<NativeReply<PathBuf>>;
        }
    }

    #[test]
    fn test_collect_paths_in_index_order() {
        let mut set = MockPathSet::new();
        let mut seq = Sequence::new();
        set.expect_count()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(NativeReply::Okay(3)));
        let names = ["/a/one.txt", "/a/two.txt", "/a/three.txt"];
        for (index, name) in names.into_iter().enumerate() {
            set.expect_path()
                .with(eq(index))
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| Ok(NativeReply::Okay(PathBuf::from(name))));
        }

        let reply = collect_paths(&set).unwrap();
        assert_eq!(
            reply,
            NativeReply::Okay(vec![
                PathBuf::from("/a/one.txt"),
                PathBuf::from("/a/two.txt"),
                PathBuf::from("/a/three.txt"),
            ])
        );
    }

    #[test]
    fn test_collect_paths_empty_set() {
        let mut set = MockPathSet::new();
        set.expect_count().returning(|| Ok(NativeReply::Okay(0)));
        set.expect_path().never();

        assert_eq!(collect_paths(&set).unwrap(), NativeReply::Okay(Vec::new()));
    }

    #[test]
    fn test_collect_paths_count_failure() {
        let mut set = MockPathSet::new();
        set.expect_count().returning(|| Ok(NativeReply::Error));
        set.expect_path().never();

        assert_eq!(collect_paths(&set).unwrap().result(), NativeResult::Error);
    }

    #[test]
    fn test_collect_paths_stops_at_failed_index() {
        let mut set = MockPathSet::new();
        set.expect_count().returning(|| Ok(NativeReply::Okay(3)));
        set.expect_path()
            .with(eq(0))
            .returning(|_| Ok(NativeReply::Okay(PathBuf::from("/a/one.txt"))));
        set.expect_path()
            .with(eq(1))
            .returning(|_| Ok(NativeReply::Cancel));
        set.expect_path().with(eq(2)).never();

        assert_eq!(collect_paths(&set).unwrap().result(), NativeResult::Error);
    }

    #[test]
    fn test_collect_paths_propagates_decode_failure() {
        let mut set = MockPathSet::new();
        set.expect_count().returning(|| Ok(NativeReply::Okay(1)));
        set.expect_path()
            .returning(|_| Err(BridgeError::Encoding("unpaired surrogate".to_string())));

        assert!(matches!(
            collect_paths(&set),
            Err(DialogError::Bridge(BridgeError::Encoding(_)))
        ));
    }

    #[test]
    fn test_empty_invoker_reports_missing_encoding() {
        let invoker = DialogInvoker { backends: Vec::new() };
        let err = invoker.pick_folder(None).unwrap_err();
        assert!(matches!(err, DialogError::EncodingUnavailable(e) if e == Encoding::host()));
        assert!(invoker.encodings().is_empty());
    }

    #[test]
    fn test_validation_precedes_backend_lookup() {
        let invoker = DialogInvoker { backends: Vec::new() };
        let err = invoker.save_file(None, Some("bad\0name"), &[]).unwrap_err();
        assert!(matches!(err, DialogError::InvalidArgument(_)));
    }
}
