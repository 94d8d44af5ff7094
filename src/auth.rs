//! Caller-facing grant parameters: validated identifiers and per-call settings.

pub mod id;
pub mod settings;

pub use id::*;
pub use settings::*;
