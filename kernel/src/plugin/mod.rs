//! Plugin System for the Zeeky Kernel
//!
//! This module provides the intent routing and plugin lifecycle core:
//! - Plugin registration with duplicate-intent rejection
//! - O(1) intent name to plugin resolution
//! - Dispatch with panic isolation, deadlines and envelope normalization
//! - Ordered start/stop of all plugins as a single lifecycle unit
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Plugin Registration                        │
//! │  inventory crate ──▶ PluginConstructor ──▶ PluginRegistry     │
//! └──────────────────────────────────────────────────────────────┘
//!
//!   route(intent, ctx)
//!        │
//!        ▼
//!   PluginRegistry::resolve(intent.name) ──▶ lifecycle guard
//!        │                                        │
//!        ▼                                        ▼
//!   Plugin::handle_intent (isolated, deadlined) ──▶ Response envelope
//! ```
//!
//! The registry is the single source of truth mapping intent names to the
//! owning plugin. The router is the error-isolation boundary: nothing a
//! plugin does (error, panic, hang) escapes a dispatch as anything other
//! than a well-formed error envelope.

pub mod builtin;
pub mod isolation;
pub mod lifecycle;
#[macro_use]
pub mod macros;
pub mod manager;
pub mod registry;
pub mod router;

// Re-exports for convenience
pub use isolation::{call_plugin_safely, call_plugin_safely_async};
pub use lifecycle::{LifecycleState, PluginEntry, PluginMetrics};
pub use manager::PluginManager;
pub use registry::{PluginConstructor, PluginDescriptor, PluginRegistry, RegistryError};
pub use router::IntentRouter;
