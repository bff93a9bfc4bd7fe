//! Typed failures callers branch on
//!
//! Most functions return `anyhow::Result` with context attached; the
//! variants here sit at the root of those chains so the C ABI (and any
//! other caller) can recover the failure class with `downcast_ref`.

use thiserror::Error;
use x11rb::protocol::xproto::Window;

use crate::common::constants::ffi;

#[derive(Debug, Error)]
pub enum WindowError {
    /// The display server could not be reached
    #[error("failed to connect to X display {display}")]
    ConnectionFailed {
        display: String,
        #[source]
        source: x11rb::errors::ConnectError,
    },

    /// Focus was requested for an id that does not name a live window
    #[error("window 0x{window:08x} does not exist")]
    InvalidWindow { window: Window },
}

impl WindowError {
    /// Numeric status for the C ABI
    pub fn ffi_code(&self) -> i64 {
        match self {
            Self::ConnectionFailed { .. } => ffi::CONNECTION_FAILED,
            Self::InvalidWindow { .. } => ffi::INVALID_ARGUMENT,
        }
    }
}

/// Map an error chain to its C ABI status, `X11_ERROR` when untyped
pub fn ffi_code(err: &anyhow::Error) -> i64 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<WindowError>())
        .map(WindowError::ffi_code)
        .unwrap_or(ffi::X11_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_invalid_window_code_survives_context() {
        let err = Err::<(), _>(WindowError::InvalidWindow { window: 7 })
            .context("Failed to focus window 7")
            .unwrap_err();
        assert_eq!(ffi_code(&err), ffi::INVALID_ARGUMENT);
    }

    #[test]
    fn test_untyped_error_maps_to_x11_error() {
        let err = anyhow::anyhow!("Invalid return from _NET_CLIENT_LIST");
        assert_eq!(ffi_code(&err), ffi::X11_ERROR);
    }

    #[test]
    fn test_invalid_window_message() {
        let err = WindowError::InvalidWindow { window: 0x3a0_0007 };
        assert_eq!(err.to_string(), "window 0x03a00007 does not exist");
    }
}
