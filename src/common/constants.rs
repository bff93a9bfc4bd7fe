//! Crate-wide constants
//!
//! Atom names, FFI return codes and configuration defaults live here so
//! there is a single source of truth for every magic value.

/// X11 protocol constants
pub mod x11 {
    /// Legacy ICCCM window title
    pub const WM_NAME: &[u8] = b"WM_NAME";

    /// EWMH UTF-8 window title
    pub const NET_WM_NAME: &[u8] = b"_NET_WM_NAME";

    /// Property type of `_NET_WM_NAME`
    pub const UTF8_STRING: &[u8] = b"UTF8_STRING";

    /// Root window property listing managed client windows
    pub const NET_CLIENT_LIST: &[u8] = b"_NET_CLIENT_LIST";

    /// Root window property holding the currently active window
    pub const NET_ACTIVE_WINDOW: &[u8] = b"_NET_ACTIVE_WINDOW";

    /// Source indication for _NET_ACTIVE_WINDOW (2 = pager/direct user action)
    pub const ACTIVE_WINDOW_SOURCE_PAGER: u32 = 2;
}

/// Numeric encodings returned across the C ABI
pub mod ffi {
    /// No window matched / no window focused
    pub const NOT_FOUND: i64 = -1;

    /// Could not connect to the display server
    pub const CONNECTION_FAILED: i64 = -2;

    /// Null or non UTF-8 argument, or a handle that cannot name a window
    pub const INVALID_ARGUMENT: i64 = -3;

    /// Any other X11 failure
    pub const X11_ERROR: i64 = -4;

    /// Success for status-returning calls
    pub const OK: i32 = 0;
}

/// Configuration paths and defaults
pub mod config {
    /// Application directory name under XDG config
    pub const APP_DIR: &str = "xwindowtools";

    /// Configuration filename
    pub const FILENAME: &str = "config.json";

    /// Environment variable overriding the config file path
    pub const PATH_ENV: &str = "XWT_CONFIG";

    /// Length of one property read, in 32-bit units
    pub const PROPERTY_CHUNK_LEN: u32 = 1024;

    /// Upper bound on chunks read for a single property
    pub const MAX_PROPERTY_CHUNKS: u32 = 64;

    /// Default tracing filter
    pub const LOG_LEVEL: &str = "info";
}

/// Polling defaults for `wait_for_window`
pub mod wait {
    /// Delay between searches
    pub const INTERVAL_MS: u64 = 1000;

    /// Give up after this long
    pub const TIMEOUT_MS: u64 = 30_000;

    /// Shortest delay allowed between searches
    pub const MIN_INTERVAL_MS: u64 = 10;
}
