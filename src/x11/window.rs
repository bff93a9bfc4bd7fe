//! X11 focus and stacking operations

use anyhow::{Context, Result};
use tracing::{debug, info};
use x11rb::connection::Connection;
use x11rb::cookie::VoidCookie;
use x11rb::errors::{ConnectionError, ReplyError};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use super::X11Session;
use crate::common::constants::x11;
use crate::common::error::WindowError;
use crate::common::types::WindowHandle;

/// Wait for a void request and turn `BadWindow` into [`WindowError::InvalidWindow`]
fn check_request(
    request: Result<VoidCookie<'_, RustConnection>, ConnectionError>,
    window: Window,
    what: &str,
) -> Result<()> {
    match request.map_err(ReplyError::from).and_then(VoidCookie::check) {
        Ok(()) => Ok(()),
        Err(ReplyError::X11Error(err)) if err.error_kind == x11rb::protocol::ErrorKind::Window => {
            Err(WindowError::InvalidWindow { window }.into())
        }
        Err(err) => Err(err).with_context(|| format!("Failed to {} window {}", what, window)),
    }
}

impl X11Session {
    /// Give `handle` input focus and raise it to the top of the stack
    ///
    /// The window is verified first so a stale id is reported as
    /// [`WindowError::InvalidWindow`] instead of being silently ignored. An
    /// EWMH `_NET_ACTIVE_WINDOW` request follows so the window manager's own
    /// notion of the active window agrees with the input focus.
    pub fn focus_and_raise(&self, handle: WindowHandle) -> Result<()> {
        let window = handle.raw();

        match self
            .conn
            .get_window_attributes(window)
            .context(format!("Failed to query attributes of window {}", window))?
            .reply()
        {
            Ok(attrs) => {
                debug!(window = window, map_state = ?attrs.map_state, "Focus target exists");
            }
            Err(ReplyError::X11Error(err))
                if err.error_kind == x11rb::protocol::ErrorKind::Window =>
            {
                return Err(WindowError::InvalidWindow { window }.into());
            }
            Err(err) => {
                return Err(err)
                    .context(format!("Failed to get attributes reply for window {}", window));
            }
        }

        check_request(
            self.conn
                .set_input_focus(InputFocus::PARENT, window, x11rb::CURRENT_TIME),
            window,
            "focus",
        )?;

        check_request(
            self.conn.configure_window(
                window,
                &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE),
            ),
            window,
            "raise",
        )?;

        let event = ClientMessageEvent {
            response_type: CLIENT_MESSAGE_EVENT,
            format: 32,
            sequence: 0,
            window,
            type_: self.atoms.net_active_window,
            data: ClientMessageData::from([
                x11::ACTIVE_WINDOW_SOURCE_PAGER,
                x11rb::CURRENT_TIME,
                0,
                0,
                0,
            ]),
        };

        self.conn
            .send_event(
                false,
                self.root,
                EventMask::SUBSTRUCTURE_NOTIFY | EventMask::SUBSTRUCTURE_REDIRECT,
                event,
            )
            .context(format!("Failed to send _NET_ACTIVE_WINDOW event for window {}", window))?;

        self.conn
            .flush()
            .context("Failed to flush X11 connection after window activation")?;

        info!(window = %handle, "Focused and raised window");
        Ok(())
    }
}
