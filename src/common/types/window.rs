//! Window identity types
//!
//! `WindowHandle` can only hold a non-zero X11 window id, which keeps the
//! "zero is never a window" rule out of every call site.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use x11rb::protocol::xproto::Window;

/// Opaque identifier for a top-level window, assigned by the display server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(NonZeroU32);

impl WindowHandle {
    /// Wrap a raw window id; zero yields `None`
    pub fn new(raw: Window) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// Raw X11 window id
    pub fn raw(self) -> Window {
        self.0.get()
    }

    /// Integer encoding used across the C ABI (always positive)
    pub fn to_ffi(self) -> i64 {
        i64::from(self.0.get())
    }

    /// Decode a handle received over the C ABI
    pub fn from_ffi(value: i64) -> Option<Self> {
        u32::try_from(value).ok().and_then(Self::new)
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0.get())
    }
}

/// Error returned when a handle string is not a non-zero window id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid window handle {0:?}: expected a non-zero decimal or 0x-prefixed hex id")]
pub struct ParseHandleError(String);

impl FromStr for WindowHandle {
    type Err = ParseHandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => trimmed.parse::<u32>(),
        };
        parsed
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ParseHandleError(s.to_string()))
    }
}

/// Snapshot of a top-level window as reported by the display server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: Option<String>,
}
