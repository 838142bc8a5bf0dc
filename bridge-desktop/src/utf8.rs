//! UTF-8 backend over the `NFD_*U8` entry points.

use bridge_traits::{
    dialog::{Encoding, NativeDialogBackend, NativePathSet, NativeReply, NativeResult},
    error::{BridgeError, Result},
    filter::FilterSpec,
};
use std::ffi::{c_char, CStr, CString};
use std::path::{Path, PathBuf};
use std::ptr;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::ffi::{nfdfiltersize_t, nfdpathset_t, nfdpathsetsize_t, nfdresult_t, nfdu8filteritem_t};
use crate::library::NfdLibrary;
use crate::marshal::{cstring_ptr, path_to_cstring_opt, read_cpath, to_cstring, to_cstring_opt};

/// Native dialog backend marshaling every string as UTF-8.
///
/// Used on Linux and macOS, where the native library only speaks UTF-8.
#[derive(Debug, Clone)]
pub struct Utf8Backend {
    library: Arc<NfdLibrary>,
}

impl Utf8Backend {
    pub fn new(library: Arc<NfdLibrary>) -> Self {
        Self { library }
    }

    /// Convert a native out-parameter into an owned reply, releasing the
    /// native buffer.
    fn take_path(&self, code: nfdresult_t, out: *mut c_char) -> Result<NativeReply<PathBuf>> {
        match NativeResult::from_raw(code) {
            NativeResult::Okay => {
                if out.is_null() {
                    return Err(BridgeError::OperationFailed(
                        "native dialog reported success without a path".to_string(),
                    ));
                }
                // Safety: on NFD_OKAY `out` is a NUL-terminated path owned
                // by the library until released with NFD_FreePathU8.
                let path = unsafe { read_cpath(out) };
                unsafe { (self.library.utf8.free_path)(out) };
                path.map(NativeReply::Okay)
            }
            NativeResult::Cancel => Ok(NativeReply::Cancel),
            NativeResult::Error => Ok(NativeReply::Error),
        }
    }
}

/// Filter array kept alive for the duration of one native call.
struct Utf8Filters {
    _strings: Vec<(CString, CString)>,
    items: Vec<nfdu8filteritem_t>,
}

impl Utf8Filters {
    fn new(filters: &[FilterSpec]) -> Result<Self> {
        let strings = filters
            .iter()
            .map(|f| {
                Ok((
                    to_cstring(&f.name, "filter name")?,
                    to_cstring(&f.native_spec(), "filter pattern")?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        // Pointers into the CStrings stay valid when `strings` is moved,
        // since each CString owns a separate heap buffer.
        let items = strings
            .iter()
            .map(|(name, spec)| nfdu8filteritem_t {
                name: name.as_ptr(),
                spec: spec.as_ptr(),
            })
            .collect();

        Ok(Self {
            _strings: strings,
            items,
        })
    }

    fn as_ptr(&self) -> *const nfdu8filteritem_t {
        if self.items.is_empty() {
            ptr::null()
        } else {
            self.items.as_ptr()
        }
    }

    fn count(&self) -> Result<nfdfiltersize_t> {
        nfdfiltersize_t::try_from(self.items.len())
            .map_err(|_| BridgeError::InvalidArgument("too many filters".to_string()))
    }
}

impl NativeDialogBackend for Utf8Backend {
    fn encoding(&self) -> Encoding {
        Encoding::Utf8
    }

    fn init(&self) -> NativeResult {
        NativeResult::from_raw(unsafe { (self.library.common.init)() })
    }

    fn teardown(&self) {
        unsafe { (self.library.common.quit)() }
    }

    fn open_dialog(
        &self,
        filters: &[FilterSpec],
        default_path: Option<&Path>,
    ) -> Result<NativeReply<PathBuf>> {
        let filters = Utf8Filters::new(filters)?;
        let count = filters.count()?;
        let default_path = path_to_cstring_opt(default_path, "default path")?;
        let mut out: *mut c_char = ptr::null_mut();

        trace!(filters = count, "NFD_OpenDialogU8");
        let code = unsafe {
            (self.library.utf8.open_dialog)(
                &mut out,
                filters.as_ptr(),
                count,
                cstring_ptr(&default_path),
            )
        };
        self.take_path(code, out)
    }

    fn open_dialog_multiple(
        &self,
        filters: &[FilterSpec],
        default_path: Option<&Path>,
    ) -> Result<NativeReply<Box<dyn NativePathSet>>> {
        let filters = Utf8Filters::new(filters)?;
        let count = filters.count()?;
        let default_path = path_to_cstring_opt(default_path, "default path")?;
        let mut out: *const nfdpathset_t = ptr::null();

        trace!(filters = count, "NFD_OpenDialogMultipleU8");
        let code = unsafe {
            (self.library.utf8.open_dialog_multiple)(
                &mut out,
                filters.as_ptr(),
                count,
                cstring_ptr(&default_path),
            )
        };

        match NativeResult::from_raw(code) {
            NativeResult::Okay if out.is_null() => Err(BridgeError::OperationFailed(
                "native dialog reported success without a path set".to_string(),
            )),
            NativeResult::Okay => Ok(NativeReply::Okay(Box::new(Utf8PathSet {
                library: Arc::clone(&self.library),
                handle: out,
            }))),
            NativeResult::Cancel => Ok(NativeReply::Cancel),
            NativeResult::Error => Ok(NativeReply::Error),
        }
    }

    fn save_dialog(
        &self,
        filters: &[FilterSpec],
        default_path: Option<&Path>,
        default_name: Option<&str>,
    ) -> Result<NativeReply<PathBuf>> {
        let filters = Utf8Filters::new(filters)?;
        let count = filters.count()?;
        let default_path = path_to_cstring_opt(default_path, "default path")?;
        let default_name = to_cstring_opt(default_name, "default name")?;
        let mut out: *mut c_char = ptr::null_mut();

        trace!(filters = count, "NFD_SaveDialogU8");
        let code = unsafe {
            (self.library.utf8.save_dialog)(
                &mut out,
                filters.as_ptr(),
                count,
                cstring_ptr(&default_path),
                cstring_ptr(&default_name),
            )
        };
        self.take_path(code, out)
    }

    fn pick_folder(&self, default_path: Option<&Path>) -> Result<NativeReply<PathBuf>> {
        let default_path = path_to_cstring_opt(default_path, "default path")?;
        let mut out: *mut c_char = ptr::null_mut();

        trace!("NFD_PickFolderU8");
        let code =
            unsafe { (self.library.utf8.pick_folder)(&mut out, cstring_ptr(&default_path)) };
        self.take_path(code, out)
    }

    fn last_error(&self) -> Option<String> {
        let message = unsafe { (self.library.common.get_error)() };
        if message.is_null() {
            return None;
        }
        // Safety: NFD_GetError returns a static NUL-terminated string that
        // stays valid until the next nfd call.
        Some(unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned())
    }

    fn clear_error(&self) {
        unsafe { (self.library.common.clear_error)() }
    }
}

/// Multi-select result owned by the UTF-8 backend.
struct Utf8PathSet {
    library: Arc<NfdLibrary>,
    handle: *const nfdpathset_t,
}

impl NativePathSet for Utf8PathSet {
    fn count(&self) -> Result<NativeReply<usize>> {
        let mut count: nfdpathsetsize_t = 0;
        let code = unsafe { (self.library.common.path_set_get_count)(self.handle, &mut count) };
        match NativeResult::from_raw(code) {
            NativeResult::Okay => usize::try_from(count)
                .map(NativeReply::Okay)
                .map_err(|_| BridgeError::OperationFailed("path set too large".to_string())),
            NativeResult::Cancel => Ok(NativeReply::Cancel),
            NativeResult::Error => Ok(NativeReply::Error),
        }
    }

    fn path(&self, index: usize) -> Result<NativeReply<PathBuf>> {
        let index = nfdpathsetsize_t::try_from(index)
            .map_err(|_| BridgeError::InvalidArgument(format!("path index {index} out of range")))?;
        let mut out: *mut c_char = ptr::null_mut();
        let code =
            unsafe { (self.library.utf8.path_set_get_path)(self.handle, index, &mut out) };

        match NativeResult::from_raw(code) {
            NativeResult::Okay if out.is_null() => Err(BridgeError::OperationFailed(
                "native path set returned a null path".to_string(),
            )),
            NativeResult::Okay => {
                let path = unsafe { read_cpath(out) };
                unsafe { (self.library.utf8.path_set_free_path)(out) };
                path.map(NativeReply::Okay)
            }
            NativeResult::Cancel => Ok(NativeReply::Cancel),
            NativeResult::Error => Ok(NativeReply::Error),
        }
    }
}

impl Drop for Utf8PathSet {
    fn drop(&mut self) {
        debug!("Releasing native path set");
        unsafe { (self.library.common.path_set_free)(self.handle) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn text(ptr: *const c_char) -> String {
        CStr::from_ptr(ptr).to_str().unwrap().to_string()
    }

    #[test]
    fn test_filters_preserve_order() {
        let filters = vec![
            FilterSpec::new("Images", "png,jpg"),
            FilterSpec::new("Text", "*.txt;*.md"),
            FilterSpec::new("Images", "gif"),
        ];
        let marshaled = Utf8Filters::new(&filters).unwrap();
        assert_eq!(marshaled.count().unwrap(), 3);

        let decoded: Vec<(String, String)> = marshaled
            .items
            .iter()
            .map(|item| unsafe { (text(item.name), text(item.spec)) })
            .collect();

        assert_eq!(
            decoded,
            vec![
                ("Images".to_string(), "png,jpg".to_string()),
                ("Text".to_string(), "txt,md".to_string()),
                ("Images".to_string(), "gif".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_filters_pass_null() {
        let marshaled = Utf8Filters::new(&[]).unwrap();
        assert!(marshaled.as_ptr().is_null());
        assert_eq!(marshaled.count().unwrap(), 0);
    }

    #[test]
    fn test_filters_reject_nul() {
        let result = Utf8Filters::new(&[FilterSpec::new("Bad\0Name", "png")]);
        assert!(matches!(result, Err(BridgeError::InvalidArgument(_))));
    }
}
