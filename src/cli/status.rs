//! Quick status overview command.

use crate::cli::{describe, inspect, output};
use crate::core::config::Config;
use crate::core::persist::LoadSource;
use crate::core::secrets::Secrets;
use crate::core::store::EntryKind;
use crate::error::Result;

/// Show what the cache file holds. Never prints secret bytes or tokens.
pub fn execute(config: &Config) -> Result<()> {
    let (file, source) = inspect(config);

    output::section("sealcache status");
    output::kv("file", output::path(file.path().display()));
    output::kv("state", describe(source));
    output::kv("protector", file.protector_name());

    let (session, secrets) = file.with_state(|state| {
        let who = state.session.as_ref().map(|s| match &s.email {
            Some(email) => format!("{} <{}>", s.username, email),
            None => s.username.clone(),
        });
        (who, Secrets::from_snapshot(&state.secrets))
    });

    match session {
        Some(who) => output::kv("session", who),
        None => output::kv("session", "none"),
    }

    let entries = secrets.entries();
    let groups = entries.iter().filter(|e| e.kind == EntryKind::Group).count();
    output::kv("secrets", entries.len() - groups);
    output::kv("groups", groups);

    match source {
        LoadSource::Legacy => output::hint("run: sealcache migrate"),
        LoadSource::Failed => output::hint("run: sealcache clear"),
        _ => {}
    }

    Ok(())
}
