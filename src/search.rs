//! Title search over top-level windows

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::common::constants::wait;
use crate::common::types::{WindowHandle, WindowInfo};
use crate::enumerator::WindowEnumerator;
use crate::matcher::TitleMatcher;

/// Non-zero top-level windows in server order
fn top_level_handles<E: WindowEnumerator + ?Sized>(windows: &E) -> Result<Vec<WindowHandle>> {
    let raw = windows
        .list_top_level_windows()
        .context("Failed to enumerate top-level windows")?;
    let total = raw.len();
    let handles: Vec<WindowHandle> = raw.into_iter().filter_map(WindowHandle::new).collect();
    if handles.len() != total {
        debug!(skipped = total - handles.len(), "Skipped zero window ids in client list");
    }
    Ok(handles)
}

/// Windows whose title contains `term`, looked up lazily in enumeration order
fn matching_windows<'a, E: WindowEnumerator + ?Sized>(
    windows: &'a E,
    term: &str,
) -> Result<impl Iterator<Item = Result<WindowHandle>> + 'a> {
    let matcher = TitleMatcher::new(term);
    let handles = top_level_handles(windows)?;
    Ok(handles.into_iter().filter_map(move |handle| {
        match windows
            .get_title(handle)
            .with_context(|| format!("Failed to read title of window {}", handle))
        {
            Ok(title) => matcher.matches(title.as_deref()).then_some(Ok(handle)),
            Err(e) => Some(Err(e)),
        }
    }))
}

/// First window whose title contains `term` (ASCII case-insensitive)
pub fn search_window<E: WindowEnumerator + ?Sized>(
    windows: &E,
    term: &str,
) -> Result<Option<WindowHandle>> {
    let found = matching_windows(windows, term)?.next().transpose()?;
    match found {
        Some(handle) => debug!(window = %handle, term = %term, "Window title matched"),
        None => debug!(term = %term, "No window title matched"),
    }
    Ok(found)
}

/// Every matching window, in enumeration order
pub fn search_all<E: WindowEnumerator + ?Sized>(
    windows: &E,
    term: &str,
) -> Result<Vec<WindowHandle>> {
    matching_windows(windows, term)?.collect()
}

/// Titles of every top-level window
pub fn list_windows<E: WindowEnumerator + ?Sized>(windows: &E) -> Result<Vec<WindowInfo>> {
    top_level_handles(windows)?
        .into_iter()
        .map(|handle| {
            let title = windows
                .get_title(handle)
                .with_context(|| format!("Failed to read title of window {}", handle))?;
            Ok(WindowInfo { handle, title })
        })
        .collect()
}

/// Repeat `search` every `interval` until it finds a window or `timeout` elapses
///
/// `search` is a closure so each attempt can open its own connection. An
/// `interval` below `wait::MIN_INTERVAL_MS` is raised to it.
pub fn wait_for_window<F>(
    mut search: F,
    interval: Duration,
    timeout: Duration,
) -> Result<Option<WindowHandle>>
where
    F: FnMut() -> Result<Option<WindowHandle>>,
{
    let interval = interval.max(Duration::from_millis(wait::MIN_INTERVAL_MS));
    let start = Instant::now();
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        if let Some(handle) = search()? {
            info!(window = %handle, attempts, "Window appeared");
            return Ok(Some(handle));
        }
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            info!(attempts, timeout_ms = timeout.as_millis() as u64, "Gave up waiting for window");
            return Ok(None);
        }
        thread::sleep(interval.min(timeout - elapsed));
    }
}
