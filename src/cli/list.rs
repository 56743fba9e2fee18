//! List command - cached keys with their kind and expiry.

use crate::cli::{inspect, output};
use crate::core::config::Config;
use crate::core::secrets::{EntryInfo, Secrets};
use crate::core::store::EntryKind;
use crate::error::{PersistError, Result};

/// List live entries. Contents are never shown.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let (file, _) = inspect(config);
    let entries = file
        .with_state(|state| Secrets::from_snapshot(&state.secrets))
        .entries();

    if json {
        let json_output: Vec<_> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "key": e.key.to_string(),
                    "kind": kind_label(e.kind),
                    "expires_at": e.expires_at.map(|at| at.to_rfc3339()),
                })
            })
            .collect();
        let rendered =
            serde_json::to_string_pretty(&json_output).map_err(PersistError::Serialize)?;
        println!("{}", rendered);
        return Ok(());
    }

    if entries.is_empty() {
        output::dimmed("no cached entries");
        return Ok(());
    }

    let key_width = entries
        .iter()
        .map(|e| e.key.to_string().len())
        .max()
        .unwrap_or(3)
        .max(3);

    println!(
        "{:<width$}  {:<6}  {}",
        "KEY",
        "KIND",
        "EXPIRES",
        width = key_width
    );
    for entry in &entries {
        println!(
            "{:<width$}  {:<6}  {}",
            entry.key.to_string(),
            kind_label(entry.kind),
            expiry_label(entry),
            width = key_width
        );
    }

    Ok(())
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Secret => "secret",
        EntryKind::Group => "group",
    }
}

fn expiry_label(entry: &EntryInfo) -> String {
    match entry.expires_at {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "never".to_string(),
    }
}
