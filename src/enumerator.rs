//! Window system abstraction
//!
//! Search and focus logic talk to the display server only through this
//! trait. The X11 implementation is [`crate::x11::X11Session`]; tests use an
//! in-memory fake.

use anyhow::Result;
use x11rb::protocol::xproto::Window;

use crate::common::types::WindowHandle;

pub trait WindowEnumerator {
    /// Raw ids of all top-level client windows, in server order.
    /// May contain zero; callers skip it.
    fn list_top_level_windows(&self) -> Result<Vec<Window>>;

    /// Current title of `handle`, or `None` if it declares none
    fn get_title(&self, handle: WindowHandle) -> Result<Option<String>>;

    /// Currently focused window, or `None` if nothing is focused
    fn get_focused_window(&self) -> Result<Option<WindowHandle>>;

    /// Give `handle` input focus and raise it to the top of the stack
    fn set_focus_and_raise(&self, handle: WindowHandle) -> Result<()>;
}
