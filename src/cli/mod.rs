//! Command-line interface.
//!
//! The binary inspects and maintains a cache file. Inspection commands read
//! the file without writing it back, so a corrupt or foreign cache is left
//! on disk for `clear` to deal with.

pub mod list;
pub mod maintain;
pub mod output;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::cipher;
use crate::core::config::Config;
use crate::core::constants;
use crate::core::persist::{CacheFile, LoadSource};
use crate::error::Result;

/// sealcache - encrypted secrets-and-session cache.
#[derive(Parser)]
#[command(
    name = "sealcache",
    about = "Inspect and maintain an encrypted secrets-and-session cache",
    version
)]
pub struct Cli {
    /// Directory holding the cache file
    #[arg(long, global = true, env = constants::DATA_DIR_ENV)]
    pub dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the cache file path
    Path,

    /// Show what the cache holds
    Status,

    /// List cached keys with their kind and expiry
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a legacy plaintext cache in encrypted form
    Migrate,

    /// Delete the cache
    Clear,
}

/// Execute a parsed command against the cache in `dir`.
///
/// # Errors
///
/// Returns error if the configuration cannot be resolved or the command
/// fails to touch the file.
pub fn execute(command: Command, dir: Option<PathBuf>) -> Result<()> {
    let config = Config::resolve(dir)?;

    match command {
        Command::Path => maintain::path(&config),
        Command::Status => status::execute(&config),
        Command::List { json } => list::execute(&config, json),
        Command::Migrate => maintain::migrate(&config),
        Command::Clear => maintain::clear(&config),
    }
}

/// The cache file for `config`, not yet loaded.
fn cache_file(config: &Config) -> CacheFile {
    CacheFile::new(
        config.cache_path(),
        cipher::default_protector(&config.app_name),
    )
}

/// Open and load the cache file without wrapping it in a saving handle.
fn inspect(config: &Config) -> (CacheFile, LoadSource) {
    let file = cache_file(config);
    let source = file.load();
    (file, source)
}

/// Human label for how a file was read.
fn describe(source: LoadSource) -> &'static str {
    match source {
        LoadSource::Missing => "no cache file",
        LoadSource::Empty => "empty",
        LoadSource::Encrypted => "encrypted",
        LoadSource::Legacy => "legacy plaintext",
        LoadSource::Failed => "unreadable",
    }
}
