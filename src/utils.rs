use std::ffi::{c_char, CStr};

use gdal_sys::{self, CPLErr};

use crate::errors::WarpError;

pub(crate) fn _string(raw_ptr: *const c_char) -> String {
    if raw_ptr.is_null() {
        return String::new();
    }
    let c_str = unsafe { CStr::from_ptr(raw_ptr) };
    c_str.to_string_lossy().into_owned()
}

pub(crate) fn _last_cpl_err(cpl_err_class: CPLErr::Type) -> WarpError {
    let last_err_no = unsafe { gdal_sys::CPLGetLastErrorNo() };
    let last_err_msg = _string(unsafe { gdal_sys::CPLGetLastErrorMsg() });
    unsafe { gdal_sys::CPLErrorReset() };
    WarpError::CplError {
        class: cpl_err_class,
        number: last_err_no,
        msg: last_err_msg,
    }
}

pub(crate) fn _last_null_pointer_err(method_name: &'static str) -> WarpError {
    let last_err_msg = _string(unsafe { gdal_sys::CPLGetLastErrorMsg() });
    unsafe { gdal_sys::CPLErrorReset() };
    WarpError::NullPointer {
        method_name,
        msg: last_err_msg,
    }
}
