//! String and path marshaling for both native encoding families.
//!
//! UTF-8 strings cross the boundary as NUL-terminated `char*`; wide strings
//! as NUL-terminated UTF-16 code units.
//!
//! Paths are never forced through `str`. On Unix a path is the raw bytes the
//! file system stores; on Windows it is the raw UTF-16 units, unpaired
//! surrogates included. Only the UTF-8 family on Windows requires a path to
//! be valid Unicode.

use bridge_traits::error::{BridgeError, Result};
use std::ffi::{c_char, CStr, CString};
use std::path::{Path, PathBuf};

/// Encode `value` as a NUL-terminated UTF-8 buffer.
pub fn to_cstring(value: &str, what: &str) -> Result<CString> {
    CString::new(value).map_err(|_| nul_error(what))
}

pub fn to_cstring_opt(value: Option<&str>, what: &str) -> Result<Option<CString>> {
    value.map(|v| to_cstring(v, what)).transpose()
}

/// Pointer for an optional argument; `None` becomes `NULL`.
pub fn cstring_ptr(value: &Option<CString>) -> *const c_char {
    value.as_ref().map_or(std::ptr::null(), |v| v.as_ptr())
}

/// Encode a path for the UTF-8 entry points, byte for byte.
#[cfg(unix)]
pub fn path_to_cstring(path: &Path, what: &str) -> Result<CString> {
    use std::os::unix::ffi::OsStrExt;

    CString::new(path.as_os_str().as_bytes()).map_err(|_| nul_error(what))
}

/// Encode a path for the UTF-8 entry points.
#[cfg(not(unix))]
pub fn path_to_cstring(path: &Path, what: &str) -> Result<CString> {
    let value = path.to_str().ok_or_else(|| {
        BridgeError::InvalidArgument(format!("{what} cannot be represented as UTF-8"))
    })?;
    to_cstring(value, what)
}

pub fn path_to_cstring_opt(path: Option<&Path>, what: &str) -> Result<Option<CString>> {
    path.map(|p| path_to_cstring(p, what)).transpose()
}

/// Copy a native path returned by a UTF-8 entry point.
///
/// # Safety
///
/// `ptr` must be non-null and point to a NUL-terminated buffer that stays
/// valid for the duration of the call.
#[cfg(unix)]
pub unsafe fn read_cpath(ptr: *const c_char) -> Result<PathBuf> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    Ok(PathBuf::from(OsStr::from_bytes(CStr::from_ptr(ptr).to_bytes())))
}

/// Copy a native path returned by a UTF-8 entry point.
///
/// # Safety
///
/// `ptr` must be non-null and point to a NUL-terminated buffer that stays
/// valid for the duration of the call.
#[cfg(not(unix))]
pub unsafe fn read_cpath(ptr: *const c_char) -> Result<PathBuf> {
    CStr::from_ptr(ptr)
        .to_str()
        .map(PathBuf::from)
        .map_err(|e| BridgeError::Encoding(format!("native path is not valid UTF-8: {e}")))
}

/// Encode `value` as a NUL-terminated UTF-16 buffer.
#[cfg(any(windows, test))]
pub fn to_wide(value: &str, what: &str) -> Result<Vec<u16>> {
    if value.contains('\0') {
        return Err(nul_error(what));
    }
    Ok(value.encode_utf16().chain(std::iter::once(0)).collect())
}

#[cfg(any(windows, test))]
pub fn to_wide_opt(value: Option<&str>, what: &str) -> Result<Option<Vec<u16>>> {
    value.map(|v| to_wide(v, what)).transpose()
}

/// Pointer for an optional wide argument; `None` becomes `NULL`.
#[cfg(any(windows, test))]
pub fn wide_ptr(value: &Option<Vec<u16>>) -> *const u16 {
    value.as_ref().map_or(std::ptr::null(), |v| v.as_ptr())
}

/// Encode a path as NUL-terminated UTF-16, unpaired surrogates included.
#[cfg(windows)]
pub fn path_to_wide(path: &Path, what: &str) -> Result<Vec<u16>> {
    use std::os::windows::ffi::OsStrExt;

    let mut units: Vec<u16> = path.as_os_str().encode_wide().collect();
    if units.contains(&0) {
        return Err(nul_error(what));
    }
    units.push(0);
    Ok(units)
}

#[cfg(windows)]
pub fn path_to_wide_opt(path: Option<&Path>, what: &str) -> Result<Option<Vec<u16>>> {
    path.map(|p| path_to_wide(p, what)).transpose()
}

/// Copy a native path returned by a wide entry point.
///
/// # Safety
///
/// `ptr` must be non-null and point to a NUL-terminated UTF-16 buffer that
/// stays valid for the duration of the call.
#[cfg(windows)]
pub unsafe fn read_wide_path(ptr: *const u16) -> PathBuf {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;

    PathBuf::from(OsString::from_wide(wide_units(ptr)))
}

/// Copy a native UTF-16 string into an owned `String`.
///
/// # Safety
///
/// Same contract as [`read_wide_path`].
#[cfg(test)]
pub unsafe fn read_wide(ptr: *const u16) -> Result<String> {
    String::from_utf16(wide_units(ptr))
        .map_err(|e| BridgeError::Encoding(format!("native string is not valid UTF-16: {e}")))
}

#[cfg(any(windows, test))]
unsafe fn wide_units<'a>(ptr: *const u16) -> &'a [u16] {
    let mut len = 0;
    while *ptr.add(len) != 0 {
        len += 1;
    }
    std::slice::from_raw_parts(ptr, len)
}

fn nul_error(what: &str) -> BridgeError {
    BridgeError::InvalidArgument(format!("{what} contains a NUL byte"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NON_ASCII: &str = "/home/zoë/Документы/写真.png";

    #[test]
    fn test_utf8_path_round_trip_non_ascii() {
        let buffer = path_to_cstring(Path::new(NON_ASCII), "default path").unwrap();
        assert_eq!(buffer.as_bytes(), NON_ASCII.as_bytes());
        let decoded = unsafe { read_cpath(buffer.as_ptr()) }.unwrap();
        assert_eq!(decoded, Path::new(NON_ASCII));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_native_path_kept_byte_exact() {
        use std::os::unix::ffi::OsStrExt;

        let native = b"/home/user/caf\xe9.txt\0";
        let decoded = unsafe { read_cpath(native.as_ptr().cast()) }.unwrap();
        assert_eq!(decoded.as_os_str().as_bytes(), &native[..native.len() - 1]);

        let encoded = path_to_cstring(&decoded, "default path").unwrap();
        assert_eq!(encoded.as_bytes_with_nul(), native);
    }

    #[cfg(windows)]
    #[test]
    fn test_unpaired_surrogate_path_round_trip() {
        use std::ffi::OsString;
        use std::os::windows::ffi::{OsStrExt, OsStringExt};

        let units = [u16::from(b'C'), u16::from(b':'), u16::from(b'\\'), 0xD800, u16::from(b'x')];
        let path = PathBuf::from(OsString::from_wide(&units));

        let buffer = path_to_wide(&path, "default path").unwrap();
        assert_eq!(&buffer[..units.len()], &units);
        let decoded = unsafe { read_wide_path(buffer.as_ptr()) };
        assert_eq!(decoded.as_os_str().encode_wide().collect::<Vec<_>>(), units);
    }

    #[test]
    fn test_wide_round_trip_non_ascii() {
        let buffer = to_wide(NON_ASCII, "filter name").unwrap();
        assert_eq!(buffer.last(), Some(&0));
        let decoded = unsafe { read_wide(buffer.as_ptr()) }.unwrap();
        assert_eq!(decoded, NON_ASCII);
    }

    #[test]
    fn test_wide_encoding_is_not_utf8() {
        let wide = to_wide("é", "name").unwrap();
        assert_eq!(wide, vec![0x00E9, 0]);

        let narrow = to_cstring("é", "name").unwrap();
        assert_eq!(narrow.as_bytes(), &[0xC3, 0xA9]);
    }

    #[test]
    fn test_wide_surrogate_pairs() {
        let buffer = to_wide("🎵", "name").unwrap();
        assert_eq!(buffer.len(), 3);
        let decoded = unsafe { read_wide(buffer.as_ptr()) }.unwrap();
        assert_eq!(decoded, "🎵");
    }

    #[test]
    fn test_interior_nul_rejected() {
        assert!(matches!(
            to_cstring("a\0b", "default name"),
            Err(BridgeError::InvalidArgument(_))
        ));
        assert!(matches!(
            path_to_cstring(Path::new("/tmp/a\0b"), "default path"),
            Err(BridgeError::InvalidArgument(_))
        ));
        assert!(matches!(
            to_wide("a\0b", "default name"),
            Err(BridgeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_optional_arguments_become_null() {
        let none = path_to_cstring_opt(None, "default path").unwrap();
        assert!(cstring_ptr(&none).is_null());

        let wide_none = to_wide_opt(None, "default name").unwrap();
        assert!(wide_ptr(&wide_none).is_null());

        let some = path_to_cstring_opt(Some(Path::new("/tmp")), "default path").unwrap();
        assert!(!cstring_ptr(&some).is_null());
    }
}
