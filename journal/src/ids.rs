//! Identifier generation
//!
//! Ids come from a pluggable generator and are checked against the ids
//! already in use, so uniqueness within a list is guaranteed rather than
//! merely probable.

use crate::config::MAX_ID_ATTEMPTS;
use crate::error::{AppError, Result};
use std::collections::HashSet;
use uuid::Uuid;

/// Produces candidate identifiers
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Draw ids until one is not in `taken`
pub fn unique_id<'a, I>(generator: &dyn IdGenerator, taken: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = generator.generate();
        if !taken.clone().into_iter().any(|id| id == candidate) {
            return Ok(candidate);
        }
        tracing::warn!("Generated id collided with an existing one: {}", candidate);
    }

    Err(AppError::validation(format!(
        "Could not generate a unique id after {} attempts",
        MAX_ID_ATTEMPTS
    )))
}

/// Reject a list in which two entries share an id
pub fn ensure_distinct<'a, I>(entity: &str, ids: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(AppError::validation(format!("{} id cannot be empty", entity)));
        }
        if !seen.insert(id) {
            return Err(AppError::validation(format!("Duplicate {} id: {}", entity, id)));
        }
    }
    Ok(())
}
