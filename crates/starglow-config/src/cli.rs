//! Command-line argument parsing for the Starglow backdrop.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{BackdropKind, Config, MotionPreference};

/// Starglow command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "starglow", about = "Celebratory night-sky backdrop")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Backdrop kind to render.
    #[arg(long, value_enum)]
    pub backdrop: Option<BackdropKind>,

    /// Simulation seed for deterministic runs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Motion-reduction preference.
    #[arg(long, value_enum)]
    pub motion: Option<MotionPreference>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(kind) = args.backdrop {
            self.sky.backdrop = kind;
        }
        if let Some(seed) = args.seed {
            self.sky.seed = Some(seed);
        }
        if let Some(motion) = args.motion {
            self.sky.motion = motion;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
