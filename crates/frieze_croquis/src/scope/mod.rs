//! Hierarchical scopes.
//!
//! ## Module Structure
//!
//! - [`types`] - Type definitions (ScopeId, ScopeHost, Watcher, etc.)
//! - [`chain`] - Scope and Scopes implementations

mod chain;
mod types;

pub use chain::{Scope, ScopeEnv, Scopes};
pub use types::{Callback, ScopeHost, ScopeId, WatchKind, Watcher};
