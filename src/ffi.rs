//! C ABI entry points
//!
//! Thin shims over [`crate::ops`]. Every call loads the config, opens its own
//! connection and reports failures as negative integers (see
//! [`crate::common::constants::ffi`]); details go to the tracing log.

use std::ffi::{CStr, c_char};
use std::sync::Once;

use tracing::{error, warn};

use crate::common::constants::{config, ffi};
use crate::common::error::ffi_code;
use crate::common::types::WindowHandle;
use crate::config::ToolConfig;
use crate::ops;

/// Install the tracing subscriber; later calls do nothing
#[unsafe(no_mangle)]
pub extern "C" fn xwt_init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let result = crate::logging::init(config::LOG_LEVEL).and_then(|log| {
            let config = ToolConfig::load_or_default();
            log.set_filter(&config.log_level)
        });
        if let Err(e) = result {
            eprintln!("xwindowtools: {:#}", e);
        }
    });
}

/// Handle of the first window whose title contains `term`, ignoring ASCII case
///
/// Returns `-1` when nothing matches, `-2` when the display is unreachable,
/// `-3` for a null or non UTF-8 `term` and `-4` for other X11 failures.
///
/// # Safety
///
/// `term` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn xwt_window_search(term: *const c_char) -> i64 {
    if term.is_null() {
        warn!("xwt_window_search called with a null term");
        return ffi::INVALID_ARGUMENT;
    }
    // SAFETY: non-null and NUL-terminated per the contract above
    let term = unsafe { CStr::from_ptr(term) };
    let Ok(term) = term.to_str() else {
        warn!("xwt_window_search called with a non UTF-8 term");
        return ffi::INVALID_ARGUMENT;
    };

    match ops::window_search(&ToolConfig::load_or_default(), term) {
        Ok(Some(handle)) => handle.to_ffi(),
        Ok(None) => ffi::NOT_FOUND,
        Err(e) => {
            error!("Window search failed: {:#}", e);
            ffi_code(&e)
        }
    }
}

/// Handle of the focused window, `-1` when none is focused
///
/// `-2` and `-4` have the same meaning as for [`xwt_window_search`].
#[unsafe(no_mangle)]
pub extern "C" fn xwt_get_window_focus() -> i64 {
    match ops::get_window_focus(&ToolConfig::load_or_default()) {
        Ok(Some(handle)) => handle.to_ffi(),
        Ok(None) => ffi::NOT_FOUND,
        Err(e) => {
            error!("Reading focused window failed: {:#}", e);
            ffi_code(&e)
        }
    }
}

/// Focus and raise `handle`
///
/// Returns `0` on success, `-2` when the display is unreachable, `-3` when
/// `handle` does not name a live window and `-4` for other X11 failures.
#[unsafe(no_mangle)]
pub extern "C" fn xwt_set_window_focus(handle: i64) -> i32 {
    let Some(window) = WindowHandle::from_ffi(handle) else {
        warn!(handle = handle, "xwt_set_window_focus called with an impossible handle");
        return ffi::INVALID_ARGUMENT as i32;
    };

    match ops::set_window_focus(&ToolConfig::load_or_default(), window) {
        Ok(()) => ffi::OK,
        Err(e) => {
            error!("Setting focus failed: {:#}", e);
            ffi_code(&e) as i32
        }
    }
}
