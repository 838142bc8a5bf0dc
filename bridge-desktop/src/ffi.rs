//! Raw `nfd` ABI types.
//!
//! Mirrors the declarations of `nfd.h` (nativefiledialog-extended). Only
//! types and function-pointer signatures live here; symbols are resolved at
//! runtime by [`NfdLibrary`](crate::library::NfdLibrary).

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_int, c_uint, c_void};

/// `nfdresult_t`
pub type nfdresult_t = c_int;

/// `nfdfiltersize_t`
pub type nfdfiltersize_t = c_uint;

/// `nfdpathsetsize_t`
#[cfg(any(windows, target_os = "macos"))]
pub type nfdpathsetsize_t = std::ffi::c_ulong;

/// `nfdpathsetsize_t`
#[cfg(not(any(windows, target_os = "macos")))]
pub type nfdpathsetsize_t = c_uint;

/// `nfdu8char_t`
pub type nfdu8char_t = c_char;

/// `nfdnchar_t` on Windows (`wchar_t`, UTF-16)
pub type nfdwchar_t = u16;

/// Opaque `nfdpathset_t`
pub type nfdpathset_t = c_void;

/// `nfdu8filteritem_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct nfdu8filteritem_t {
    pub name: *const nfdu8char_t,
    pub spec: *const nfdu8char_t,
}

/// `nfdnfilteritem_t` with `wchar_t` strings
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct nfdwfilteritem_t {
    pub name: *const nfdwchar_t,
    pub spec: *const nfdwchar_t,
}

// Encoding-independent entry points
pub type FnInit = unsafe extern "C" fn() -> nfdresult_t;
pub type FnQuit = unsafe extern "C" fn();
pub type FnGetError = unsafe extern "C" fn() -> *const c_char;
pub type FnClearError = unsafe extern "C" fn();
pub type FnPathSetGetCount =
    unsafe extern "C" fn(*const nfdpathset_t, *mut nfdpathsetsize_t) -> nfdresult_t;
pub type FnPathSetFree = unsafe extern "C" fn(*const nfdpathset_t);

// UTF-8 family
pub type FnOpenDialogU8 = unsafe extern "C" fn(
    *mut *mut nfdu8char_t,
    *const nfdu8filteritem_t,
    nfdfiltersize_t,
    *const nfdu8char_t,
) -> nfdresult_t;
pub type FnOpenDialogMultipleU8 = unsafe extern "C" fn(
    *mut *const nfdpathset_t,
    *const nfdu8filteritem_t,
    nfdfiltersize_t,
    *const nfdu8char_t,
) -> nfdresult_t;
pub type FnSaveDialogU8 = unsafe extern "C" fn(
    *mut *mut nfdu8char_t,
    *const nfdu8filteritem_t,
    nfdfiltersize_t,
    *const nfdu8char_t,
    *const nfdu8char_t,
) -> nfdresult_t;
pub type FnPickFolderU8 =
    unsafe extern "C" fn(*mut *mut nfdu8char_t, *const nfdu8char_t) -> nfdresult_t;
pub type FnPathSetGetPathU8 = unsafe extern "C" fn(
    *const nfdpathset_t,
    nfdpathsetsize_t,
    *mut *mut nfdu8char_t,
) -> nfdresult_t;
pub type FnFreePathU8 = unsafe extern "C" fn(*mut nfdu8char_t);
pub type FnPathSetFreePathU8 = unsafe extern "C" fn(*const nfdu8char_t);

// Wide family
pub type FnOpenDialogW = unsafe extern "C" fn(
    *mut *mut nfdwchar_t,
    *const nfdwfilteritem_t,
    nfdfiltersize_t,
    *const nfdwchar_t,
) -> nfdresult_t;
pub type FnOpenDialogMultipleW = unsafe extern "C" fn(
    *mut *const nfdpathset_t,
    *const nfdwfilteritem_t,
    nfdfiltersize_t,
    *const nfdwchar_t,
) -> nfdresult_t;
pub type FnSaveDialogW = unsafe extern "C" fn(
    *mut *mut nfdwchar_t,
    *const nfdwfilteritem_t,
    nfdfiltersize_t,
    *const nfdwchar_t,
    *const nfdwchar_t,
) -> nfdresult_t;
pub type FnPickFolderW =
    unsafe extern "C" fn(*mut *mut nfdwchar_t, *const nfdwchar_t) -> nfdresult_t;
pub type FnPathSetGetPathW = unsafe extern "C" fn(
    *const nfdpathset_t,
    nfdpathsetsize_t,
    *mut *mut nfdwchar_t,
) -> nfdresult_t;
pub type FnFreePathW = unsafe extern "C" fn(*mut nfdwchar_t);
pub type FnPathSetFreePathW = unsafe extern "C" fn(*const nfdwchar_t);
