//! Configuration management
//!
//! Optional JSON settings: display selection, property read limits and the
//! default log filter.

pub mod settings;

pub use settings::ToolConfig;
