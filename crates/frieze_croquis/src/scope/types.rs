//! Scope type definitions.

use std::fmt;

use frieze_relief::{Expr, Value};

use super::chain::Scopes;
use crate::error::ScopeError;

/// Unique identifier for a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The root scope every arena starts with
    pub const ROOT: Self = Self(0);

    /// Create a new scope ID
    #[inline(always)]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    #[inline(always)]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The owner of a scope arena.
///
/// Watch callbacks receive the host mutably, which lets them reach both the
/// scopes and whatever else the host owns (a DOM, for instance).
pub trait ScopeHost: Sized + 'static {
    /// Error type callbacks fail with.
    type Error: From<ScopeError>;

    fn scopes(&self) -> &Scopes<Self>;
    fn scopes_mut(&mut self) -> &mut Scopes<Self>;
}

/// Callback invoked with the host, the scope being updated and the value of
/// the watched expression.
pub type Callback<H> =
    Box<dyn FnMut(&mut H, ScopeId, &Value) -> Result<(), <H as ScopeHost>::Error>>;

/// How a watcher decides whether to fire.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchKind {
    /// Fires on the first pass and then only when the value changes.
    Watch { last: Option<Value> },
    /// Fires on every pass.
    Eval,
}

/// A registered expression and its callback.
pub struct Watcher<H: ScopeHost> {
    pub expr: Expr,
    pub kind: WatchKind,
    pub callback: Option<Callback<H>>,
}

impl<H: ScopeHost> Watcher<H> {
    /// Record `value` and report whether the callback should run.
    pub fn should_fire(&mut self, value: &Value) -> bool {
        match &mut self.kind {
            WatchKind::Watch { last } => {
                if last.as_ref() == Some(value) {
                    false
                } else {
                    *last = Some(value.clone());
                    true
                }
            }
            WatchKind::Eval => true,
        }
    }
}

impl<H: ScopeHost> fmt::Debug for Watcher<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("expr", &self.expr.to_string())
            .field("kind", &self.kind)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
