//! sealcache - inspect and maintain an encrypted secrets-and-session cache.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sealcache::cli::output;
use sealcache::cli::{execute, Cli};
use sealcache::core::constants;
use sealcache::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("sealcache=debug")
        } else {
            EnvFilter::new("sealcache=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli.command, cli.dir) {
        let suggestion = match &e {
            Error::Config(ConfigError::Parse(_)) => {
                Some(format!("check {}", constants::CONFIG_FILE))
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}
