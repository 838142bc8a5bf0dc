//! # Dialog Configuration Module
//!
//! Provides configuration management for the dialog invoker.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `DialogConfig` holding the native dialog backends and the locations the
//! `nfd` shared library is searched in. It fails fast when no backend can be
//! provided.
//!
//! ## Backends
//!
//! Backends can be injected explicitly (tests, hosts with their own native
//! layer). When none are injected and the `desktop-shims` feature is enabled,
//! the builder loads the `nfd` library from the configured candidates and
//! binds the backends for the host OS.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::DialogConfig;
//!
//! let config = DialogConfig::builder()
//!     .library_path("/opt/nfd/lib/libnfd.so")
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::NativeDialogBackend;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for the dialog invoker.
///
/// Use [`DialogConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct DialogConfig {
    /// Explicit path to the `nfd` shared library, searched first
    pub library_path: Option<PathBuf>,

    /// Additional library names or paths, searched in order
    pub library_names: Vec<PathBuf>,

    /// Whether the OS default library names are searched last
    pub use_default_library_names: bool,

    /// Native backends, one per encoding family
    pub backends: Vec<Arc<dyn NativeDialogBackend>>,
}

impl std::fmt::Debug for DialogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogConfig")
            .field("library_path", &self.library_path)
            .field("library_names", &self.library_names)
            .field("use_default_library_names", &self.use_default_library_names)
            .field(
                "backends",
                &self
                    .backends
                    .iter()
                    .map(|b| b.encoding())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl DialogConfig {
    /// Creates a new builder for constructing a `DialogConfig`.
    pub fn builder() -> DialogConfigBuilder {
        DialogConfigBuilder::default()
    }

    /// Library locations in search order.
    pub fn library_candidates(&self) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = self
            .library_path
            .iter()
            .chain(self.library_names.iter())
            .cloned()
            .collect();

        if self.use_default_library_names {
            candidates.extend(default_library_names());
        }
        candidates
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The explicit library path is not empty and not a directory
    /// - Library names are not empty
    /// - At least one backend is present
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.library_path {
            if path.as_os_str().is_empty() {
                return Err(Error::Config("Library path cannot be empty".to_string()));
            }
            if path.is_dir() {
                return Err(Error::Config(format!(
                    "Library path {} is a directory, expected the nfd shared library file",
                    path.display()
                )));
            }
        }

        if self
            .library_names
            .iter()
            .any(|name| name.as_os_str().is_empty())
        {
            return Err(Error::Config("Library names cannot be empty".to_string()));
        }

        if self.backends.is_empty() {
            return Err(backend_missing_error());
        }

        Ok(())
    }
}

fn backend_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "NativeDialogBackend".to_string(),
        message: "No native dialog backend available. \
                 Desktop: enable the 'desktop-shims' feature and install the nfd \
                 (nativefiledialog-extended) shared library, or set library_path. \
                 Other hosts: inject a NativeDialogBackend implementation."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn default_library_names() -> Vec<PathBuf> {
    bridge_desktop::default_library_names()
}

#[cfg(not(feature = "desktop-shims"))]
fn default_library_names() -> Vec<PathBuf> {
    Vec::new()
}

#[cfg(feature = "desktop-shims")]
fn provide_default_backends(candidates: &[PathBuf]) -> Result<Vec<Arc<dyn NativeDialogBackend>>> {
    use bridge_desktop::{host_backends, NfdLibrary};

    let library = NfdLibrary::load(candidates).map_err(|e| Error::CapabilityMissing {
        capability: "NativeDialogBackend".to_string(),
        message: format!(
            "{}. Install the nfd (nativefiledialog-extended) shared library or set library_path.",
            e
        ),
    })?;
    Ok(host_backends(library))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_backends(
    _candidates: &[PathBuf],
) -> Result<Vec<Arc<dyn NativeDialogBackend>>> {
    Err(backend_missing_error())
}

/// Builder for constructing [`DialogConfig`] instances.
pub struct DialogConfigBuilder {
    library_path: Option<PathBuf>,
    library_names: Vec<PathBuf>,
    use_default_library_names: bool,
    backends: Vec<Arc<dyn NativeDialogBackend>>,
}

impl Default for DialogConfigBuilder {
    fn default() -> Self {
        Self {
            library_path: None,
            library_names: Vec::new(),
            use_default_library_names: true,
            backends: Vec::new(),
        }
    }
}

impl DialogConfigBuilder {
    /// Sets the explicit path of the `nfd` shared library.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::DialogConfig;
    ///
    /// let builder = DialogConfig::builder()
    ///     .library_path("/usr/local/lib/libnfd.so");
    /// ```
    pub fn library_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.library_path = Some(path.into());
        self
    }

    /// Adds a library name or path to the search list.
    pub fn library_name<P: Into<PathBuf>>(mut self, name: P) -> Self {
        self.library_names.push(name.into());
        self
    }

    /// Enables or disables searching the OS default library names.
    ///
    /// Default: enabled
    pub fn use_default_library_names(mut self, enabled: bool) -> Self {
        self.use_default_library_names = enabled;
        self
    }

    /// Injects a native backend.
    ///
    /// When at least one backend is injected the `nfd` library is not loaded.
    pub fn backend(mut self, backend: Arc<dyn NativeDialogBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    /// Builds the final `DialogConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The library path is empty or a directory
    /// - No backend was injected and none can be loaded
    pub fn build(self) -> Result<DialogConfig> {
        let mut config = DialogConfig {
            library_path: self.library_path,
            library_names: self.library_names,
            use_default_library_names: self.use_default_library_names,
            backends: self.backends,
        };

        if config.backends.is_empty() {
            // Check paths before attempting to load anything from them.
            if let Err(err @ Error::Config(_)) = config.validate() {
                return Err(err);
            }
            config.backends = provide_default_backends(&config.library_candidates())?;
        }

        config.validate()?;
        Ok(config)
    }
}
