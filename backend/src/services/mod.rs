//! Business logic services for the Shopbook backend

pub mod auth;
pub mod backup;
pub mod currency;
pub mod debt;
pub mod expense;
pub mod income;
pub mod purchase;
pub mod reporting;
pub mod shop;
pub mod stock;

pub use auth::AuthService;
pub use backup::BackupService;
pub use currency::CurrencyService;
pub use debt::DebtService;
pub use expense::ExpenseService;
pub use income::IncomeService;
pub use purchase::PurchaseService;
pub use reporting::ReportingService;
pub use shop::ShopService;
