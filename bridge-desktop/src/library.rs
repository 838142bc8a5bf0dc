//! Runtime loading of the `nfd` shared library.

use bridge_traits::dialog::Encoding;
use bridge_traits::error::{BridgeError, Result};
use libloading::Library;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::ffi::*;

/// Entry points shared by both encoding families.
#[derive(Clone, Copy)]
pub(crate) struct CommonApi {
    pub init: FnInit,
    pub quit: FnQuit,
    pub get_error: FnGetError,
    pub clear_error: FnClearError,
    pub path_set_get_count: FnPathSetGetCount,
    pub path_set_free: FnPathSetFree,
}

/// `NFD_*U8` entry points.
#[derive(Clone, Copy)]
pub(crate) struct Utf8Api {
    pub open_dialog: FnOpenDialogU8,
    pub open_dialog_multiple: FnOpenDialogMultipleU8,
    pub save_dialog: FnSaveDialogU8,
    pub pick_folder: FnPickFolderU8,
    pub path_set_get_path: FnPathSetGetPathU8,
    pub free_path: FnFreePathU8,
    pub path_set_free_path: FnPathSetFreePathU8,
}

/// `NFD_*N` entry points with UTF-16 strings.
#[cfg(windows)]
#[derive(Clone, Copy)]
pub(crate) struct WideApi {
    pub open_dialog: FnOpenDialogW,
    pub open_dialog_multiple: FnOpenDialogMultipleW,
    pub save_dialog: FnSaveDialogW,
    pub pick_folder: FnPickFolderW,
    pub path_set_get_path: FnPathSetGetPathW,
    pub free_path: FnFreePathW,
    pub path_set_free_path: FnPathSetFreePathW,
}

/// A loaded `nfd` library with all entry points resolved.
///
/// The function pointers are copied out of the library and stay valid for
/// as long as `_library` is alive, which is the lifetime of this value.
pub struct NfdLibrary {
    pub(crate) common: CommonApi,
    pub(crate) utf8: Utf8Api,
    #[cfg(windows)]
    pub(crate) wide: WideApi,
    path: PathBuf,
    _library: Library,
}

impl std::fmt::Debug for NfdLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NfdLibrary")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl NfdLibrary {
    /// Load the first candidate that resolves every required symbol.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Arc<Self>> {
        if candidates.is_empty() {
            return Err(BridgeError::NotAvailable(
                "no nfd library candidates configured".to_string(),
            ));
        }

        let mut failures = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let candidate = candidate.as_ref();
            match Self::load_from(candidate) {
                Ok(library) => {
                    info!(path = %candidate.display(), "Loaded nfd library");
                    return Ok(Arc::new(library));
                }
                Err(err) => {
                    debug!(path = %candidate.display(), error = %err, "nfd candidate rejected");
                    failures.push(format!("{}: {}", candidate.display(), err));
                }
            }
        }

        warn!(attempts = failures.len(), "Unable to load nfd library");
        Err(BridgeError::NotAvailable(format!(
            "unable to load nfd library ({})",
            failures.join("; ")
        )))
    }

    /// Load a specific library file or name.
    pub fn load_from(path: &Path) -> Result<Self> {
        // Safety: loading runs the library's initializers; nfd has none with
        // observable side effects beyond its own globals.
        let library = unsafe { Library::new(path.as_os_str()) }
            .map_err(|e| BridgeError::NotAvailable(e.to_string()))?;

        // Safety: each symbol is resolved with the signature declared in
        // nfd.h; see `ffi`.
        unsafe {
            let common = CommonApi {
                init: symbol(&library, &["NFD_Init"])?,
                quit: symbol(&library, &["NFD_Quit"])?,
                get_error: symbol(&library, &["NFD_GetError"])?,
                clear_error: symbol(&library, &["NFD_ClearError"])?,
                path_set_get_count: symbol(&library, &["NFD_PathSet_GetCount"])?,
                path_set_free: symbol(&library, &["NFD_PathSet_Free"])?,
            };

            let utf8 = Utf8Api {
                open_dialog: symbol(&library, &utf8_symbol_names("NFD_OpenDialog"))?,
                open_dialog_multiple: symbol(
                    &library,
                    &utf8_symbol_names("NFD_OpenDialogMultiple"),
                )?,
                save_dialog: symbol(&library, &utf8_symbol_names("NFD_SaveDialog"))?,
                pick_folder: symbol(&library, &utf8_symbol_names("NFD_PickFolder"))?,
                path_set_get_path: symbol(&library, &utf8_symbol_names("NFD_PathSet_GetPath"))?,
                free_path: symbol(&library, &utf8_symbol_names("NFD_FreePath"))?,
                path_set_free_path: symbol(&library, &utf8_symbol_names("NFD_PathSet_FreePath"))?,
            };

            #[cfg(windows)]
            let wide = WideApi {
                open_dialog: symbol(&library, &[wide_symbol_name("NFD_OpenDialog")])?,
                open_dialog_multiple: symbol(
                    &library,
                    &[wide_symbol_name("NFD_OpenDialogMultiple")],
                )?,
                save_dialog: symbol(&library, &[wide_symbol_name("NFD_SaveDialog")])?,
                pick_folder: symbol(&library, &[wide_symbol_name("NFD_PickFolder")])?,
                path_set_get_path: symbol(&library, &[wide_symbol_name("NFD_PathSet_GetPath")])?,
                free_path: symbol(&library, &[wide_symbol_name("NFD_FreePath")])?,
                path_set_free_path: symbol(&library, &[wide_symbol_name("NFD_PathSet_FreePath")])?,
            };

            Ok(Self {
                common,
                utf8,
                #[cfg(windows)]
                wide,
                path: path.to_path_buf(),
                _library: library,
            })
        }
    }

    /// Path or name the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolve the first of `names` exported by `library`.
///
/// # Safety
///
/// `T` must be the function-pointer type matching the native declaration.
unsafe fn symbol<T: Copy, S: AsRef<str>>(library: &Library, names: &[S]) -> Result<T> {
    for name in names {
        if let Ok(sym) = library.get::<T>(name.as_ref().as_bytes()) {
            return Ok(*sym);
        }
    }
    let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    Err(BridgeError::SymbolMissing(names.join(" / ")))
}

/// Export names tried for a UTF-8 entry point, in order.
///
/// Outside Windows `nfdnchar_t` is `char`, so the library also exports the
/// UTF-8 family under the `N` names. On Windows the `N` names take UTF-16
/// and must never be bound to a UTF-8 signature.
fn utf8_symbol_names(base: &str) -> Vec<String> {
    let mut names = vec![format!("{base}{}", Encoding::Utf8.symbol_suffix())];
    if !cfg!(windows) {
        names.push(format!("{base}{}", Encoding::Wide.symbol_suffix()));
    }
    names
}

/// Export name of a UTF-16 entry point.
#[cfg(windows)]
fn wide_symbol_name(base: &str) -> String {
    format!("{base}{}", Encoding::Wide.symbol_suffix())
}

/// Default library file names searched on this OS.
pub fn default_library_names() -> Vec<PathBuf> {
    #[cfg(target_os = "windows")]
    let names: &[&str] = &["nfd.dll"];

    #[cfg(target_os = "macos")]
    let names: &[&str] = &["libnfd.dylib"];

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let names: &[&str] = &["libnfd.so", "libnfd.so.1", "libnfd.so.0"];

    names.iter().map(|name| PathBuf::from(OsStr::new(name))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_with_no_candidates() {
        let candidates: [PathBuf; 0] = [];
        let err = NfdLibrary::load(&candidates).unwrap_err();
        assert!(matches!(err, BridgeError::NotAvailable(_)));
    }

    #[test]
    fn test_load_reports_every_attempt() {
        let candidates = [
            PathBuf::from("/nonexistent/libnfd-a.so"),
            PathBuf::from("/nonexistent/libnfd-b.so"),
        ];
        let err = NfdLibrary::load(&candidates).unwrap_err().to_string();
        assert!(err.contains("libnfd-a.so"));
        assert!(err.contains("libnfd-b.so"));
    }

    #[test]
    fn test_utf8_symbol_names_never_alias_wide_on_windows() {
        let names = utf8_symbol_names("NFD_OpenDialog");
        assert_eq!(names[0], "NFD_OpenDialogU8");

        #[cfg(windows)]
        assert_eq!(names, vec!["NFD_OpenDialogU8".to_string()]);

        #[cfg(not(windows))]
        assert_eq!(
            names,
            vec!["NFD_OpenDialogU8".to_string(), "NFD_OpenDialogN".to_string()]
        );
    }

    #[cfg(windows)]
    #[test]
    fn test_wide_symbol_name() {
        assert_eq!(wide_symbol_name("NFD_PickFolder"), "NFD_PickFolderN");
    }

    #[test]
    fn test_default_library_names() {
        let names = default_library_names();
        assert!(!names.is_empty());

        #[cfg(target_os = "windows")]
        assert_eq!(names[0], PathBuf::from("nfd.dll"));

        #[cfg(target_os = "linux")]
        assert_eq!(names[0], PathBuf::from("libnfd.so"));
    }
}
