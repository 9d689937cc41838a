//! Memoization of forged notes
//!
//! The forger never talks to a global map. It is handed a `NoteCache` and a
//! `CacheScope`, so whether identical text from two browser sessions shares an
//! entry is a configuration decision rather than an accident of process layout.

pub mod adapters;
pub mod store;

pub use adapters::InMemoryNoteCache;
pub use store::{CacheError, CacheKey, CacheScope, NoteCache, NoteCacheRef};
