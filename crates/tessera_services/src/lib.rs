//! Tessera Services Layer
//!
//! Platform-facing services. Currently: settings loading.

pub mod settings;

pub use settings::{Settings, SettingsError};
