//! Vacancy salary normalization, currency adjustment and reporting.

pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;
pub mod workflows;

pub use error::AppError;
