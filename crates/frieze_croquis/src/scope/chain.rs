//! Scope arena.
//!
//! - `Scope` - A single scope: variables, watchers and tree links
//! - `Scopes` - Owns every scope of a view, addressed by [`ScopeId`]

use frieze_armature::{evaluate, parse_expression, Environment};
use frieze_carton::{CompactString, FxHashMap, SmallVec};
use frieze_relief::{EvalResult, Expr, Value};

use super::types::{Callback, ScopeHost, ScopeId, WatchKind, Watcher};
use crate::error::ScopeError;

type Result<T> = std::result::Result<T, ScopeError>;

/// A single scope
pub struct Scope<H: ScopeHost> {
    /// Unique identifier
    pub id: ScopeId,
    /// Lexical parent, `None` for the root
    pub parent: Option<ScopeId>,
    /// Child scopes in creation order
    pub(crate) children: SmallVec<[ScopeId; 4]>,
    /// Variables bound in this scope
    vars: FxHashMap<CompactString, Value>,
    /// Watchers in registration order
    pub(crate) watchers: Vec<Watcher<H>>,
    /// Set while an update pass owns the watchers
    pub(crate) updating: bool,
}

impl<H: ScopeHost> Scope<H> {
    fn new(id: ScopeId, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            parent,
            children: SmallVec::new(),
            vars: FxHashMap::default(),
            watchers: Vec::new(),
            updating: false,
        }
    }

    /// Get a variable bound in this scope only
    #[inline]
    pub fn local(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Child scopes
    #[inline]
    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    /// Number of registered watchers
    #[inline]
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }
}

/// Arena of scopes
pub struct Scopes<H: ScopeHost> {
    scopes: FxHashMap<ScopeId, Scope<H>>,
    next_id: u32,
}

impl<H: ScopeHost> Default for Scopes<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ScopeHost> Scopes<H> {
    /// Create an arena holding only the root scope
    pub fn new() -> Self {
        let mut scopes = FxHashMap::default();
        scopes.insert(ScopeId::ROOT, Scope::new(ScopeId::ROOT, None));
        Self { scopes, next_id: 1 }
    }

    /// The root scope
    #[inline]
    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// Number of live scopes
    #[inline]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: ScopeId) -> bool {
        self.scopes.contains_key(&id)
    }

    /// Get a scope
    #[inline]
    pub fn get_scope(&self, id: ScopeId) -> Option<&Scope<H>> {
        self.scopes.get(&id)
    }

    pub(crate) fn scope(&self, id: ScopeId) -> Result<&Scope<H>> {
        self.scopes.get(&id).ok_or(ScopeError::UnknownScope(id))
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> Result<&mut Scope<H>> {
        self.scopes.get_mut(&id).ok_or(ScopeError::UnknownScope(id))
    }

    /// Parent of a scope
    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes.get(&id).and_then(|scope| scope.parent)
    }

    /// Create a scope whose lookups fall through to `parent`
    pub fn create_child(&mut self, parent: ScopeId) -> Result<ScopeId> {
        let id = ScopeId::new(self.next_id);
        self.scope_mut(parent)?.children.push(id);
        self.next_id += 1;
        self.scopes.insert(id, Scope::new(id, Some(parent)));
        Ok(id)
    }

    /// Destroy a scope and all of its descendants
    pub fn destroy(&mut self, id: ScopeId) -> Result<()> {
        let scope = self.scopes.remove(&id).ok_or(ScopeError::UnknownScope(id))?;
        if let Some(parent) = scope.parent.and_then(|p| self.scopes.get_mut(&p)) {
            parent.children.retain(|child| *child != id);
        }

        let mut stack: Vec<ScopeId> = scope.children.into_vec();
        while let Some(child) = stack.pop() {
            if let Some(removed) = self.scopes.remove(&child) {
                stack.extend(removed.children);
            }
        }
        Ok(())
    }

    /// Bind a variable in `id`
    pub fn set(&mut self, id: ScopeId, name: &str, value: Value) -> Result<()> {
        self.scope_mut(id)?.vars.insert(CompactString::from(name), value);
        Ok(())
    }

    /// Look a variable up in `id`, then its ancestors
    pub fn get(&self, id: ScopeId, name: &str) -> Option<&Value> {
        let mut current = Some(id);
        while let Some(scope) = current.and_then(|id| self.scopes.get(&id)) {
            if let Some(value) = scope.vars.get(name) {
                return Some(value);
            }
            current = scope.parent;
        }
        None
    }

    /// Evaluate a parsed expression in `id`
    ///
    /// Assignments write into `id` itself, shadowing any ancestor binding.
    pub fn eval_expr(&mut self, id: ScopeId, expr: &Expr) -> Result<Value> {
        self.scope(id)?;
        let mut env = ScopeEnv { scopes: self, id };
        Ok(evaluate(expr, &mut env)?)
    }

    /// Parse and evaluate an expression in `id`
    pub fn eval(&mut self, id: ScopeId, source: &str) -> Result<Value> {
        let expr = parse_expression(source)?;
        self.eval_expr(id, &expr)
    }

    /// Register a change-detecting watch
    pub fn watch(&mut self, id: ScopeId, source: &str, callback: Callback<H>) -> Result<()> {
        let expr = parse_expression(source)?;
        self.watch_expr(id, expr, callback)
    }

    pub fn watch_expr(&mut self, id: ScopeId, expr: Expr, callback: Callback<H>) -> Result<()> {
        self.push_watcher(
            id,
            Watcher {
                expr,
                kind: WatchKind::Watch { last: None },
                callback: Some(callback),
            },
        )
    }

    /// Register an evaluation that runs on every pass
    pub fn add_eval(
        &mut self,
        id: ScopeId,
        source: &str,
        callback: Option<Callback<H>>,
    ) -> Result<()> {
        let expr = parse_expression(source)?;
        self.add_eval_expr(id, expr, callback)
    }

    pub fn add_eval_expr(
        &mut self,
        id: ScopeId,
        expr: Expr,
        callback: Option<Callback<H>>,
    ) -> Result<()> {
        self.push_watcher(
            id,
            Watcher {
                expr,
                kind: WatchKind::Eval,
                callback,
            },
        )
    }

    fn push_watcher(&mut self, id: ScopeId, watcher: Watcher<H>) -> Result<()> {
        self.scope_mut(id)?.watchers.push(watcher);
        Ok(())
    }
}

/// Expression environment backed by one scope.
pub struct ScopeEnv<'a, H: ScopeHost> {
    scopes: &'a mut Scopes<H>,
    id: ScopeId,
}

impl<'a, H: ScopeHost> ScopeEnv<'a, H> {
    pub fn new(scopes: &'a mut Scopes<H>, id: ScopeId) -> Self {
        Self { scopes, id }
    }
}

impl<H: ScopeHost> Environment for ScopeEnv<'_, H> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.get(self.id, name)
    }

    fn assign(&mut self, name: &str, value: Value) -> EvalResult<()> {
        if let Some(scope) = self.scopes.scopes.get_mut(&self.id) {
            scope.vars.insert(CompactString::from(name), value);
        }
        Ok(())
    }
}
