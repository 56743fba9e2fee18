//! Cache key type.
//!
//! A structured identifier for a cached secret or group, with a canonical
//! `:`-joined string form used both in memory and as the on-disk property
//! name.
//!
//! Fields are not escaped: a field containing `:` encodes to a string that
//! no longer parses back to the same key. Callers must keep `:` out of key
//! fields.

use std::fmt;
use std::str::FromStr;

use crate::core::constants::KEY_SEPARATOR;
use crate::error::KeyError;

/// Optional outer scope of a five-part key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Context {
    name: String,
    id: String,
}

/// Identifier of a cached secret or group.
///
/// Either `holder:holder_id:value` or
/// `context:context_id:holder:holder_id:value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    context: Option<Context>,
    holder_name: String,
    holder_id: String,
    value_name: String,
}

impl CacheKey {
    /// Create a three-part key.
    pub fn new(
        holder_name: impl Into<String>,
        holder_id: impl Into<String>,
        value_name: impl Into<String>,
    ) -> Self {
        Self {
            context: None,
            holder_name: holder_name.into(),
            holder_id: holder_id.into(),
            value_name: value_name.into(),
        }
    }

    /// Create a five-part key scoped to a context.
    pub fn with_context(
        context_name: impl Into<String>,
        context_id: impl Into<String>,
        holder_name: impl Into<String>,
        holder_id: impl Into<String>,
        value_name: impl Into<String>,
    ) -> Self {
        Self {
            context: Some(Context {
                name: context_name.into(),
                id: context_id.into(),
            }),
            holder_name: holder_name.into(),
            holder_id: holder_id.into(),
            value_name: value_name.into(),
        }
    }

    pub fn context_name(&self) -> Option<&str> {
        self.context.as_ref().map(|c| c.name.as_str())
    }

    pub fn context_id(&self) -> Option<&str> {
        self.context.as_ref().map(|c| c.id.as_str())
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn holder_id(&self) -> &str {
        &self.holder_id
    }

    pub fn value_name(&self) -> &str {
        &self.value_name
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = KEY_SEPARATOR;
        if let Some(ctx) = &self.context {
            write!(f, "{}{sep}{}{sep}", ctx.name, ctx.id)?;
        }
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.holder_name, self.holder_id, self.value_name
        )
    }
}

impl FromStr for CacheKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(KeyError::Empty);
        }

        let parts: Vec<&str> = s.split(KEY_SEPARATOR).collect();
        match parts.as_slice() {
            [holder, holder_id, value] => Ok(Self::new(*holder, *holder_id, *value)),
            [ctx, ctx_id, holder, holder_id, value] => Ok(Self::with_context(
                *ctx, *ctx_id, *holder, *holder_id, *value,
            )),
            _ => Err(KeyError::InvalidFormat {
                input: s.to_string(),
                parts: parts.len(),
            }),
        }
    }
}
