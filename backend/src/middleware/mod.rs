//! Request middleware for the Shopbook backend

mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
