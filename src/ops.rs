//! One-shot window operations
//!
//! Each function opens its own display connection, performs its queries and
//! drops the connection before returning. No state survives between calls.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::common::types::{WindowHandle, WindowInfo};
use crate::config::ToolConfig;
use crate::enumerator::WindowEnumerator;
use crate::search;
use crate::x11::X11Session;

/// First window whose title contains `term`, ignoring ASCII case
pub fn window_search(config: &ToolConfig, term: &str) -> Result<Option<WindowHandle>> {
    let session = X11Session::connect(config)?;
    let found = search::search_window(&session, term)
        .with_context(|| format!("Failed to search windows for {:?}", term))?;
    match found {
        Some(handle) => info!(window = %handle, term = %term, "Found window"),
        None => info!(term = %term, "No window found"),
    }
    Ok(found)
}

/// Every window whose title contains `term`
pub fn window_search_all(config: &ToolConfig, term: &str) -> Result<Vec<WindowHandle>> {
    let session = X11Session::connect(config)?;
    search::search_all(&session, term)
        .with_context(|| format!("Failed to search windows for {:?}", term))
}

/// Currently focused window, or `None` when nothing is focused
pub fn get_window_focus(config: &ToolConfig) -> Result<Option<WindowHandle>> {
    let session = X11Session::connect(config)?;
    session
        .get_focused_window()
        .context("Failed to read focused window")
}

/// Focus and raise `handle`
///
/// A handle that no longer names a window fails with
/// [`crate::WindowError::InvalidWindow`].
pub fn set_window_focus(config: &ToolConfig, handle: WindowHandle) -> Result<()> {
    let session = X11Session::connect(config)?;
    session
        .set_focus_and_raise(handle)
        .with_context(|| format!("Failed to focus window {}", handle))
}

/// Handle and title of every top-level window
pub fn list_windows(config: &ToolConfig) -> Result<Vec<WindowInfo>> {
    let session = X11Session::connect(config)?;
    search::list_windows(&session)
}

/// Search repeatedly, one connection per attempt, until a window appears
pub fn wait_for_window(
    config: &ToolConfig,
    term: &str,
    interval: Duration,
    timeout: Duration,
) -> Result<Option<WindowHandle>> {
    search::wait_for_window(
        || {
            let session = X11Session::connect(config)?;
            search::search_window(&session, term)
        },
        interval,
        timeout,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::ffi;
    use crate::common::error::{WindowError, ffi_code};

    fn unreachable_display() -> ToolConfig {
        ToolConfig {
            display: Some("no display here".to_string()),
            ..ToolConfig::default()
        }
    }

    fn assert_connection_failed(err: anyhow::Error) {
        assert_eq!(ffi_code(&err), ffi::CONNECTION_FAILED, "{:#}", err);
        assert!(matches!(
            err.downcast_ref::<WindowError>(),
            Some(WindowError::ConnectionFailed { display, .. }) if display == "no display here"
        ));
    }

    #[test]
    fn test_search_reports_connection_failure() {
        assert_connection_failed(window_search(&unreachable_display(), "term").unwrap_err());
        assert_connection_failed(window_search_all(&unreachable_display(), "term").unwrap_err());
    }

    #[test]
    fn test_get_focus_reports_connection_failure() {
        assert_connection_failed(get_window_focus(&unreachable_display()).unwrap_err());
    }

    #[test]
    fn test_set_focus_reports_connection_failure() {
        let handle = WindowHandle::new(20).unwrap();
        assert_connection_failed(set_window_focus(&unreachable_display(), handle).unwrap_err());
    }

    #[test]
    fn test_list_and_wait_report_connection_failure() {
        assert_connection_failed(list_windows(&unreachable_display()).unwrap_err());
        let err = wait_for_window(
            &unreachable_display(),
            "term",
            Duration::from_millis(10),
            Duration::from_millis(50),
        )
        .unwrap_err();
        assert_connection_failed(err);
    }

    #[test]
    fn test_connection_failure_message_names_display() {
        let err = get_window_focus(&unreachable_display()).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to connect to X display no display here"));
    }
}
