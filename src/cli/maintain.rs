//! Maintenance commands: path, migrate, clear.

use crate::cli::{cache_file, describe, output};
use crate::core::config::Config;
use crate::core::persist::LoadSource;
use crate::error::Result;

/// Print the resolved cache file path.
pub fn path(config: &Config) -> Result<()> {
    println!("{}", config.cache_path().display());
    Ok(())
}

/// Upgrade a legacy plaintext cache to the encrypted form.
pub fn migrate(config: &Config) -> Result<()> {
    let file = cache_file(config);

    match file.migrate()? {
        LoadSource::Legacy => {
            output::success(&format!(
                "encrypted legacy cache at {}",
                output::path(file.path().display())
            ));
        }
        LoadSource::Failed => {
            output::warn("cache file is unreadable, nothing migrated");
            output::hint("run: sealcache clear");
        }
        source => output::dimmed(&format!("nothing to migrate ({})", describe(source))),
    }
    Ok(())
}

/// Delete the cache file.
pub fn clear(config: &Config) -> Result<()> {
    let path = config.cache_path();
    let existed = path.exists();

    cache_file(config).clear()?;

    if existed {
        output::success(&format!("removed {}", output::path(path.display())));
    } else {
        output::dimmed("no cache file to remove");
    }
    Ok(())
}
