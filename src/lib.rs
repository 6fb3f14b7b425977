pub mod audit;
pub mod cashback;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod format;
pub mod loader;
pub mod market;
pub mod models;
pub mod reports;
