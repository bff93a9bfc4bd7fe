//! X11 backend
//!
//! Implements [`WindowEnumerator`] over an x11rb connection using the EWMH
//! root window properties.

mod context;
mod query;
mod window;

pub use context::{CachedAtoms, PropertyLimits, X11Session};
pub use query::{PropertyValue, decode_title};

use anyhow::Result;
use x11rb::protocol::xproto::Window;

use crate::common::types::WindowHandle;
use crate::enumerator::WindowEnumerator;

impl WindowEnumerator for X11Session {
    fn list_top_level_windows(&self) -> Result<Vec<Window>> {
        self.get_client_list()
    }

    fn get_title(&self, handle: WindowHandle) -> Result<Option<String>> {
        self.get_window_title(handle.raw())
    }

    fn get_focused_window(&self) -> Result<Option<WindowHandle>> {
        self.get_active_window()
    }

    fn set_focus_and_raise(&self, handle: WindowHandle) -> Result<()> {
        self.focus_and_raise(handle)
    }
}
