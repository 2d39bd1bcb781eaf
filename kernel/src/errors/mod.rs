//! HTTP-facing error types for the Zeeky kernel.

pub mod app_error;

pub use app_error::{AppError, AppResult};
