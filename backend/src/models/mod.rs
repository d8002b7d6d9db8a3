//! Database models for the Shopbook backend
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
