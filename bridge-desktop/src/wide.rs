//! UTF-16 backend over the Windows `NFD_*N` entry points.

use bridge_traits::{
    dialog::{Encoding, NativeDialogBackend, NativePathSet, NativeReply, NativeResult},
    error::{BridgeError, Result},
    filter::FilterSpec,
};
use std::ffi::CStr;
use std::path::{Path, PathBuf};
use std::ptr;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::ffi::{
    nfdfiltersize_t, nfdpathset_t, nfdpathsetsize_t, nfdresult_t, nfdwchar_t, nfdwfilteritem_t,
};
use crate::library::NfdLibrary;
use crate::marshal::{path_to_wide_opt, read_wide_path, to_wide, to_wide_opt, wide_ptr};

/// Native dialog backend marshaling every string as UTF-16.
///
/// Windows file-system APIs are wide-character; paths are handed over and
/// read back as raw UTF-16 units, so names that are not valid Unicode
/// survive.
#[derive(Debug, Clone)]
pub struct WideStringBackend {
    library: Arc<NfdLibrary>,
}

impl WideStringBackend {
    pub fn new(library: Arc<NfdLibrary>) -> Self {
        Self { library }
    }

    fn take_path(
        &self,
        code: nfdresult_t,
        out: *mut nfdwchar_t,
    ) -> Result<NativeReply<PathBuf>> {
        match NativeResult::from_raw(code) {
            NativeResult::Okay => {
                if out.is_null() {
                    return Err(BridgeError::OperationFailed(
                        "native dialog reported success without a path".to_string(),
                    ));
                }
                let path = unsafe { read_wide_path(out) };
                unsafe { (self.library.wide.free_path)(out) };
                Ok(NativeReply::Okay(path))
            }
            NativeResult::Cancel => Ok(NativeReply::Cancel),
            NativeResult::Error => Ok(NativeReply::Error),
        }
    }
}

struct WideFilters {
    _strings: Vec<(Vec<u16>, Vec<u16>)>,
    items: Vec<nfdwfilteritem_t>,
}

impl WideFilters {
    fn new(filters: &[FilterSpec]) -> Result<Self> {
        let strings = filters
            .iter()
            .map(|f| {
                Ok((
                    to_wide(&f.name, "filter name")?,
                    to_wide(&f.native_spec(), "filter pattern")?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let items = strings
            .iter()
            .map(|(name, spec)| nfdwfilteritem_t {
                name: name.as_ptr(),
                spec: spec.as_ptr(),
            })
            .collect();

        Ok(Self {
            _strings: strings,
            items,
        })
    }

    fn as_ptr(&self) -> *const nfdwfilteritem_t {
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

impl NativeDialogBackend for WideStringBackend {
    fn encoding(&self) -> Encoding {
        Encoding::Wide
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
        let filters = WideFilters::new(filters)?;
        let count = filters.count()?;
        let default_path = path_to_wide_opt(default_path, "default path")?;
        let mut out: *mut nfdwchar_t = ptr::null_mut();

        trace!(filters = count, "NFD_OpenDialogN");
        let code = unsafe {
            (self.library.wide.open_dialog)(
                &mut out,
                filters.as_ptr(),
                count,
                wide_ptr(&default_path),
            )
        };
        self.take_path(code, out)
    }

    fn open_dialog_multiple(
        &self,
        filters: &[FilterSpec],
        default_path: Option<&Path>,
    ) -> Result<NativeReply<Box<dyn NativePathSet>>> {
        let filters = WideFilters::new(filters)?;
        let count = filters.count()?;
        let default_path = path_to_wide_opt(default_path, "default path")?;
        let mut out: *const nfdpathset_t = ptr::null();

        trace!(filters = count, "NFD_OpenDialogMultipleN");
        let code = unsafe {
            (self.library.wide.open_dialog_multiple)(
                &mut out,
                filters.as_ptr(),
                count,
                wide_ptr(&default_path),
            )
        };

        match NativeResult::from_raw(code) {
            NativeResult::Okay if out.is_null() => Err(BridgeError::OperationFailed(
                "native dialog reported success without a path set".to_string(),
            )),
            NativeResult::Okay => Ok(NativeReply::Okay(Box::new(WidePathSet {
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
        let filters = WideFilters::new(filters)?;
        let count = filters.count()?;
        let default_path = path_to_wide_opt(default_path, "default path")?;
        let default_name = to_wide_opt(default_name, "default name")?;
        let mut out: *mut nfdwchar_t = ptr::null_mut();

        trace!(filters = count, "NFD_SaveDialogN");
        let code = unsafe {
            (self.library.wide.save_dialog)(
                &mut out,
                filters.as_ptr(),
                count,
                wide_ptr(&default_path),
                wide_ptr(&default_name),
            )
        };
        self.take_path(code, out)
    }

    fn pick_folder(&self, default_path: Option<&Path>) -> Result<NativeReply<PathBuf>> {
        let default_path = path_to_wide_opt(default_path, "default path")?;
        let mut out: *mut nfdwchar_t = ptr::null_mut();

        trace!("NFD_PickFolderN");
        let code = unsafe { (self.library.wide.pick_folder)(&mut out, wide_ptr(&default_path)) };
        self.take_path(code, out)
    }

    fn last_error(&self) -> Option<String> {
        // Error text is always narrow, whichever family reported it.
        let message = unsafe { (self.library.common.get_error)() };
        if message.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned())
    }

    fn clear_error(&self) {
        unsafe { (self.library.common.clear_error)() }
    }
}

struct WidePathSet {
    library: Arc<NfdLibrary>,
    handle: *const nfdpathset_t,
}

impl NativePathSet for WidePathSet {
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
        let mut out: *mut nfdwchar_t = ptr::null_mut();
        let code =
            unsafe { (self.library.wide.path_set_get_path)(self.handle, index, &mut out) };

        match NativeResult::from_raw(code) {
            NativeResult::Okay if out.is_null() => Err(BridgeError::OperationFailed(
                "native path set returned a null path".to_string(),
            )),
            NativeResult::Okay => {
                let path = unsafe { read_wide_path(out) };
                unsafe { (self.library.wide.path_set_free_path)(out) };
                Ok(NativeReply::Okay(path))
            }
            NativeResult::Cancel => Ok(NativeReply::Cancel),
            NativeResult::Error => Ok(NativeReply::Error),
        }
    }
}

impl Drop for WidePathSet {
    fn drop(&mut self) {
        debug!("Releasing native path set");
        unsafe { (self.library.common.path_set_free)(self.handle) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::read_wide;

    #[test]
    fn test_wide_filters_preserve_order_and_text() {
        let filters = vec![
            FilterSpec::new("Bilder", "png;jpg"),
            FilterSpec::new("Документы", "txt"),
        ];
        let marshaled = WideFilters::new(&filters).unwrap();
        assert_eq!(marshaled.count().unwrap(), 2);

        let decoded: Vec<(String, String)> = marshaled
            .items
            .iter()
            .map(|item| unsafe {
                (
                    read_wide(item.name).unwrap(),
                    read_wide(item.spec).unwrap(),
                )
            })
            .collect();

        assert_eq!(decoded[0], ("Bilder".to_string(), "png,jpg".to_string()));
        assert_eq!(decoded[1], ("Документы".to_string(), "txt".to_string()));
    }
}
