//! # frieze_croquis
//!
//! Croquis - the scope layer of Frieze.
//!
//! ## Name Origin
//!
//! A **croquis** is a quick sketch that captures the essentials of a pose.
//! Scopes are that sketch of a view: the few values a template needs, plus
//! the watches that redraw it when those values move.
//!
//! ## Model
//!
//! Scopes live in a [`Scopes`] arena owned by a host type implementing
//! [`ScopeHost`]. Each scope binds variables, falls back to its parent for
//! lookups, and carries watchers in registration order. [`update_view`] runs
//! one pass over a scope's watchers, handing every callback `&mut` access to
//! the host so callbacks can touch the DOM and other scopes alike.
//!
//! ```text
//! frieze_armature (Expressions)
//!        ↓
//! frieze_croquis (Scopes)  ← This crate
//!        ↓
//! frieze_atelier (Directives)
//! ```

mod error;
mod scope;
mod update;

pub use error::ScopeError;
pub use scope::{Callback, Scope, ScopeEnv, ScopeHost, ScopeId, Scopes, WatchKind};
pub use update::update_view;
