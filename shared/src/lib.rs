//! Shared types and models for the Shopbook bookkeeping backend
//!
//! This crate contains the domain models, pure ledger math, and validation
//! helpers used by the backend server and its tests.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
