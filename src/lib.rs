//! Startup plumbing for a bot host: environment-driven settings and an
//! explicitly constructed logging pipeline.
//!
//! The host calls [`Settings::load`] once, builds a [`logging::LoggingConfig`]
//! (or uses [`logging::default_config`]), constructs a [`logging::Logger`]
//! from it, and passes both values down. Nothing here is global.

pub mod logging;
pub mod settings;

pub use logging::{Logger, LoggingConfig, Record, Severity};
pub use settings::{Env, Secret, Settings, SettingsError};
