//! Domain types for type safety and clarity

pub mod window;

pub use window::{ParseHandleError, WindowHandle, WindowInfo};
