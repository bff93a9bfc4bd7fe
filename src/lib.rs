//! Search, inspect and focus X11 top-level windows
//!
//! The library finds windows by a case-insensitive substring of their title,
//! reports the focused window and focuses/raises a window by handle. It is
//! usable from Rust through [`ops`], and from other runtimes through the C
//! ABI in [`ffi`].

#![deny(unsafe_code)]

pub mod common;
pub mod config;
pub mod enumerator;
#[allow(unsafe_code)]
pub mod ffi;
pub mod logging;
pub mod matcher;
pub mod ops;
pub mod search;
pub mod x11;

pub use common::error::WindowError;
pub use common::types::{WindowHandle, WindowInfo};
pub use config::ToolConfig;
pub use enumerator::WindowEnumerator;
pub use matcher::{TitleMatcher, title_matches};
