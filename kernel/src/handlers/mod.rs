//! HTTP request handlers.

pub mod api;
pub mod intent;
pub mod plugins;
