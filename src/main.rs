#[macro_use] extern crate log;

use std::env;
use std::process;

use glscratch::app;
use glscratch::interface::cli::{self, ConfigError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match cli::parse_args(env::args_os()) {
        Ok(config) => config,
        Err(ConfigError::Cli(e)) => e.exit(),
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };

    if let Err(e) = app::run(&config) {
        error!("{:#}", e);
        process::exit(1);
    }
}
