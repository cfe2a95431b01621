//! Binary entry point for the Starglow backdrop.

use clap::Parser;

use starglow_app::PlatformDirs;
use starglow_config::{CliArgs, Config};

fn main() {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(root) => {
            let dirs = PlatformDirs::resolve_with_root(root);
            if let Err(e) = dirs.create_dirs() {
                eprintln!("Failed to create config directories: {e}");
                std::process::exit(1);
            }
            dirs
        }
        None => match PlatformDirs::resolve_and_create() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("Failed to initialize platform directories: {e}");
                std::process::exit(1);
            }
        },
    };

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config unusable ({e}), falling back to defaults");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    starglow_log::init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions),
        Some(&config),
    );

    if let Err(e) = starglow_app::run(config) {
        eprintln!("Event loop error: {e}");
        std::process::exit(1);
    }
}
