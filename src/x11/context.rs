//! Display connection and cached X11 state

use anyhow::{Context, Result};
use tracing::debug;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::common::constants::x11;
use crate::common::error::WindowError;
use crate::config::ToolConfig;

/// Atoms interned once per connection
#[derive(Debug, Clone, Copy)]
pub struct CachedAtoms {
    pub wm_name: Atom,
    pub net_wm_name: Atom,
    pub utf8_string: Atom,
    pub net_client_list: Atom,
    pub net_active_window: Atom,
}

fn intern(conn: &RustConnection, name: &[u8]) -> Result<Atom> {
    let printable = String::from_utf8_lossy(name);
    Ok(conn
        .intern_atom(false, name)
        .with_context(|| format!("Failed to intern {} atom", printable))?
        .reply()
        .with_context(|| format!("Failed to get reply for {} atom", printable))?
        .atom)
}

impl CachedAtoms {
    pub fn new(conn: &RustConnection) -> Result<Self> {
        Ok(Self {
            wm_name: intern(conn, x11::WM_NAME)?,
            net_wm_name: intern(conn, x11::NET_WM_NAME)?,
            utf8_string: intern(conn, x11::UTF8_STRING)?,
            net_client_list: intern(conn, x11::NET_CLIENT_LIST)?,
            net_active_window: intern(conn, x11::NET_ACTIVE_WINDOW)?,
        })
    }
}

/// Limits applied to chunked property reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyLimits {
    /// Length of one GetProperty request, in 32-bit units
    pub chunk_len: u32,
    /// Chunks read before the value is truncated
    pub max_chunks: u32,
}

/// One open display connection
///
/// Every public operation creates a session, uses it, and drops it; dropping
/// the session closes the connection on every exit path.
pub struct X11Session {
    pub(super) conn: RustConnection,
    pub(super) root: Window,
    pub(super) atoms: CachedAtoms,
    pub(super) limits: PropertyLimits,
    pub(super) title_fallback: bool,
}

impl X11Session {
    /// Connect to `config.display`, or `$DISPLAY` when unset
    pub fn connect(config: &ToolConfig) -> Result<Self> {
        let display = config.display.as_deref();
        let (conn, screen_num) =
            x11rb::connect(display).map_err(|source| WindowError::ConnectionFailed {
                display: display.unwrap_or("$DISPLAY").to_string(),
                source,
            })?;

        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .with_context(|| format!("X server reported no screen {}", screen_num))?
            .root;
        let atoms = CachedAtoms::new(&conn)?;

        debug!(screen = screen_num, root = root, "Connected to X server");
        Ok(Self {
            conn,
            root,
            atoms,
            limits: PropertyLimits {
                chunk_len: config.property_chunk_len,
                max_chunks: config.max_property_chunks,
            },
            title_fallback: config.title_fallback_net_wm_name,
        })
    }

    /// Root window of the default screen
    pub fn root(&self) -> Window {
        self.root
    }
}
