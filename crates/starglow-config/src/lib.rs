//! Configuration system for the Starglow backdrop.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, device-class
//! adaptation, and forward/backward compatible serialization.

mod cli;
mod config;
mod device;
mod error;

pub use cli::CliArgs;
pub use config::{
    BackdropKind, ClassTuning, Config, DebugConfig, MotionPreference, NebulaTuning,
    ParticleTuning, SkyConfig, WindowConfig,
};
pub use device::DeviceClass;
pub use error::ConfigError;
