//! HTTP handlers for the Shopbook backend

mod auth;
mod backup;
mod currency;
mod debt;
mod expense;
mod health;
mod income;
mod purchase;
mod reporting;
mod shop;

pub use auth::*;
pub use backup::*;
pub use currency::*;
pub use debt::*;
pub use expense::*;
pub use health::*;
pub use income::*;
pub use purchase::*;
pub use reporting::*;
pub use shop::*;
