//! Dialog requests and outcomes.

use bridge_traits::FilterSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DialogError, Result};

/// One dialog invocation.
///
/// Built with the [`open_file`](Self::open_file), [`open_files`](Self::open_files),
/// [`save_file`](Self::save_file) and [`pick_folder`](Self::pick_folder)
/// constructors and the `with_*` setters:
///
/// ```
/// use core_dialog::DialogRequest;
///
/// let request = DialogRequest::open_file()
///     .with_default_path("/home/user")
///     .with_filter("Images", "png,jpg");
/// assert_eq!(request.filters().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialogRequest {
    OpenSingle {
        default_path: Option<PathBuf>,
        #[serde(default)]
        filters: Vec<FilterSpec>,
    },
    OpenMultiple {
        default_path: Option<PathBuf>,
        #[serde(default)]
        filters: Vec<FilterSpec>,
    },
    Save {
        default_path: Option<PathBuf>,
        default_name: Option<String>,
        #[serde(default)]
        filters: Vec<FilterSpec>,
    },
    PickFolder {
        default_path: Option<PathBuf>,
    },
}

impl DialogRequest {
    pub fn open_file() -> Self {
        Self::OpenSingle {
            default_path: None,
            filters: Vec::new(),
        }
    }

    pub fn open_files() -> Self {
        Self::OpenMultiple {
            default_path: None,
            filters: Vec::new(),
        }
    }

    pub fn save_file() -> Self {
        Self::Save {
            default_path: None,
            default_name: None,
            filters: Vec::new(),
        }
    }

    pub fn pick_folder() -> Self {
        Self::PickFolder { default_path: None }
    }

    /// Directory the dialog starts in.
    pub fn with_default_path(mut self, path: impl Into<PathBuf>) -> Self {
        match &mut self {
            Self::OpenSingle { default_path, .. }
            | Self::OpenMultiple { default_path, .. }
            | Self::Save { default_path, .. }
            | Self::PickFolder { default_path } => *default_path = Some(path.into()),
        }
        self
    }

    /// Suggested file name. Only save dialogs use it; ignored otherwise.
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        if let Self::Save { default_name, .. } = &mut self {
            *default_name = Some(name.into());
        }
        self
    }

    /// Append a filter. Folder pickers take no filters; ignored there.
    pub fn with_filter(self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.with_filters([FilterSpec::new(name, pattern)])
    }

    /// Append filters, keeping their order.
    pub fn with_filters<I>(mut self, filters: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FilterSpec>,
    {
        match &mut self {
            Self::OpenSingle { filters: list, .. }
            | Self::OpenMultiple { filters: list, .. }
            | Self::Save { filters: list, .. } => list.extend(filters.into_iter().map(Into::into)),
            Self::PickFolder { .. } => {}
        }
        self
    }

    /// Operation name used in logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::OpenSingle { .. } => "open_file",
            Self::OpenMultiple { .. } => "open_files",
            Self::Save { .. } => "save_file",
            Self::PickFolder { .. } => "pick_folder",
        }
    }

    pub fn default_path(&self) -> Option<&Path> {
        match self {
            Self::OpenSingle { default_path, .. }
            | Self::OpenMultiple { default_path, .. }
            | Self::Save { default_path, .. }
            | Self::PickFolder { default_path } => default_path.as_deref(),
        }
    }

    pub fn default_name(&self) -> Option<&str> {
        match self {
            Self::Save { default_name, .. } => default_name.as_deref(),
            _ => None,
        }
    }

    pub fn filters(&self) -> &[FilterSpec] {
        match self {
            Self::OpenSingle { filters, .. }
            | Self::OpenMultiple { filters, .. }
            | Self::Save { filters, .. } => filters.as_slice(),
            Self::PickFolder { .. } => &[],
        }
    }

    /// Default path as handed to the native side. An empty path means
    /// "no default". Paths that are not valid Unicode are passed through
    /// unchanged.
    pub fn native_default_path(&self) -> Option<&Path> {
        self.default_path().filter(|path| !path.as_os_str().is_empty())
    }

    /// Default name as handed to the native side. An empty name means
    /// "no default".
    pub fn native_default_name(&self) -> Option<&str> {
        self.default_name().filter(|name| !name.is_empty())
    }

    /// Check everything the native call would reject, before any native
    /// state is touched.
    pub fn validate(&self) -> Result<()> {
        for filter in self.filters() {
            filter.validate()?;
        }

        if let Some(path) = self.native_default_path() {
            if path.as_os_str().as_encoded_bytes().contains(&0) {
                return Err(DialogError::InvalidArgument(
                    "default path contains a NUL byte".to_string(),
                ));
            }
        }

        if let Some(name) = self.default_name() {
            if name.contains('\0') {
                return Err(DialogError::InvalidArgument(
                    "default name contains a NUL byte".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Result of a dialog the user dismissed.
///
/// Native failures are not an outcome; they are returned as
/// [`DialogError::Native`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum DialogOutcome {
    /// One path from an open, save or folder dialog
    Selected(PathBuf),
    /// One or more paths from a multi-select dialog, in native order
    SelectedMany(Vec<PathBuf>),
    /// The user dismissed the dialog
    Cancelled,
}

impl DialogOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The selected path of a single-selection outcome.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Selected(path) => Some(path),
            _ => None,
        }
    }

    /// All selected paths; empty when cancelled.
    pub fn into_paths(self) -> Vec<PathBuf> {
        match self {
            Self::Selected(path) => vec![path],
            Self::SelectedMany(paths) => paths,
            Self::Cancelled => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_set_fields() {
        let request = DialogRequest::save_file()
            .with_default_path("/tmp")
            .with_default_name("out.txt")
            .with_filter("Text", "txt");

        assert_eq!(request.operation(), "save_file");
        assert_eq!(request.default_path(), Some(Path::new("/tmp")));
        assert_eq!(request.default_name(), Some("out.txt"));
        assert_eq!(request.filters(), &[FilterSpec::new("Text", "txt")]);
    }

    #[test]
    fn test_filters_keep_insertion_order_and_duplicates() {
        let request = DialogRequest::open_files()
            .with_filter("Images", "png")
            .with_filters([("Text", "txt"), ("Images", "jpg")]);

        let names: Vec<&str> = request.filters().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Images", "Text", "Images"]);
    }

    #[test]
    fn test_pick_folder_ignores_filters_and_name() {
        let request = DialogRequest::pick_folder()
            .with_filter("Images", "png")
            .with_default_name("ignored");

        assert!(request.filters().is_empty());
        assert_eq!(request.default_name(), None);
    }

    #[test]
    fn test_empty_default_path_is_none() {
        let request = DialogRequest::pick_folder().with_default_path("");
        assert_eq!(request.native_default_path(), None);

        let request = DialogRequest::pick_folder().with_default_path("/home/user");
        assert_eq!(request.native_default_path(), Some(Path::new("/home/user")));
    }

    #[test]
    fn test_empty_default_name_is_none() {
        let request = DialogRequest::save_file().with_default_name("");
        assert_eq!(request.native_default_name(), None);
    }

    #[test]
    fn test_validate_rejects_bad_filter() {
        let request = DialogRequest::open_file().with_filter("Empty", ";");
        assert!(matches!(
            request.validate(),
            Err(DialogError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_validate_rejects_nul_in_name() {
        let request = DialogRequest::save_file().with_default_name("out\0.txt");
        assert!(matches!(
            request.validate(),
            Err(DialogError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_validate_rejects_nul_in_path() {
        let request = DialogRequest::open_file().with_default_path("/tmp/a\0b");
        assert!(matches!(
            request.validate(),
            Err(DialogError::InvalidArgument(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_default_path_accepted() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = PathBuf::from(OsStr::from_bytes(b"/tmp/caf\xe9"));
        let request = DialogRequest::open_file().with_default_path(path.clone());
        assert!(request.validate().is_ok());
        assert_eq!(request.native_default_path(), Some(path.as_path()));
    }

    #[test]
    fn test_request_serde_shape() {
        let request = DialogRequest::open_file()
            .with_default_path("/home/user")
            .with_filter("Images", "png,jpg");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "open_single");
        assert_eq!(json["default_path"], "/home/user");
        assert_eq!(json["filters"][0]["name"], "Images");

        let parsed: DialogRequest = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_request_without_filters_deserializes() {
        let open: DialogRequest =
            serde_json::from_str(r#"{"kind": "open_multiple", "default_path": null}"#).unwrap();
        assert_eq!(open, DialogRequest::open_files());

        let save: DialogRequest = serde_json::from_str(
            r#"{"kind": "save", "default_path": "/tmp", "default_name": "out.txt"}"#,
        )
        .unwrap();
        assert_eq!(
            save,
            DialogRequest::save_file()
                .with_default_path("/tmp")
                .with_default_name("out.txt")
        );
    }

    #[test]
    fn test_outcome_serde_shape() {
        let selected = DialogOutcome::Selected(PathBuf::from("/home/user/photo.png"));
        let json = serde_json::to_value(&selected).unwrap();
        assert_eq!(json["status"], "selected");
        assert_eq!(json["value"], "/home/user/photo.png");

        let cancelled = serde_json::to_value(DialogOutcome::Cancelled).unwrap();
        assert_eq!(cancelled["status"], "cancelled");
    }

    #[test]
    fn test_outcome_accessors() {
        let selected = DialogOutcome::Selected(PathBuf::from("/a"));
        assert_eq!(selected.path(), Some(Path::new("/a")));
        assert!(!selected.is_cancelled());
        assert_eq!(selected.into_paths(), vec![PathBuf::from("/a")]);

        let many = DialogOutcome::SelectedMany(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(many.path(), None);
        assert_eq!(many.into_paths().len(), 2);

        assert!(DialogOutcome::Cancelled.is_cancelled());
        assert!(DialogOutcome::Cancelled.into_paths().is_empty());
    }
}
