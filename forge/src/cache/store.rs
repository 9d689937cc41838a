use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::forger::Forged;

/// Error type for note cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Error occurred during a store operation
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Which requests share memoized notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheScope {
    /// One cache for the whole process; identical text from any session hits it
    #[default]
    Process,
    /// Entries are partitioned by browser session
    Session,
}

impl CacheScope {
    /// Build the cache key for `input` submitted from `session`
    pub fn key(self, session: Option<&str>, input: &str) -> CacheKey {
        let session = match self {
            CacheScope::Process => None,
            CacheScope::Session => session.map(str::to_string),
        };
        CacheKey {
            session,
            input: input.to_string(),
        }
    }
}

impl FromStr for CacheScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "process" => Ok(CacheScope::Process),
            "session" => Ok(CacheScope::Session),
            other => Err(format!(
                "unknown cache scope '{}', expected 'process' or 'session'",
                other
            )),
        }
    }
}

/// Identity of a note request: the exact input text, plus the session in session scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub session: Option<String>,
    pub input: String,
}

/// Trait defining the interface for note caches
#[async_trait]
pub trait NoteCache: Send + Sync + Debug {
    /// Look up a previously forged outcome
    async fn get(&self, key: &CacheKey) -> Result<Option<Forged>, CacheError>;

    /// Store an outcome, replacing any previous entry for `key`
    async fn put(&self, key: CacheKey, value: Forged) -> Result<(), CacheError>;

    /// Number of stored entries
    async fn len(&self) -> Result<usize, CacheError>;

    /// Drop every entry
    async fn clear(&self) -> Result<(), CacheError>;
}

/// Type alias for Arc-wrapped NoteCache trait objects
pub type NoteCacheRef = Arc<dyn NoteCache>;
