//! Domain models for the Shopbook bookkeeping backend

mod backup;
mod currency;
mod debt;
mod expense;
mod income;
mod purchase;
mod reporting;
mod shop;
mod user;

pub use backup::*;
pub use currency::*;
pub use debt::*;
pub use expense::*;
pub use income::*;
pub use purchase::*;
pub use reporting::*;
pub use shop::*;
pub use user::*;
