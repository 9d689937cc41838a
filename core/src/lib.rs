// Core Gemini API functionality shared by the study-notes forge:
// - API client for Gemini
// - Request/response data structures
// - Client configuration and credential lookup
// - Shared error types

// Export client module - API client for Gemini
pub mod client;
pub use client::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;
