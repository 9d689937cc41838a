//! Study-notes forge
//!
//! Takes a block of raw text, wraps it in a fixed study-notes prompt, asks
//! Gemini for Markdown notes, memoizes the outcome, and serves the result on a
//! single HTML page (plus a small JSON API).

pub mod cache;
pub mod config;
pub mod forger;
pub mod http_server;
pub mod markdown;
pub mod page;
pub mod prompt;
pub mod startup;

pub use forger::{CacheStatus, ForgeReport, Forged, NoteForger};
