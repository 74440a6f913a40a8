//! Directive registry.

use std::fmt;
use std::rc::Rc;

use frieze_carton::{bitflags, CompactString, FxHashMap};
use frieze_croquis::ScopeId;
use frieze_fresco::NodeId;

use crate::compile::CompileContext;
use crate::error::Result;
use crate::runtime::Runtime;

/// Per-instance half of a directive: runs once for every instantiation of
/// the element the directive matched, with the instance's scope and node.
pub type Activation = Rc<dyn Fn(&mut Runtime, ScopeId, NodeId) -> Result<()>>;

/// Compile-time half of a directive: receives the attribute value and the
/// matched element, and may return an activation.
pub type Factory =
    Rc<dyn Fn(&mut CompileContext<'_>, &str, NodeId) -> Result<Option<Activation>>>;

bitflags! {
    /// Directive registration options
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DirectiveFlags: u8 {
        /// When matched, no other directive on the element is activated
        const EXCLUSIVE = 1 << 0;
    }
}

/// A registered directive
#[derive(Clone)]
pub struct Directive {
    pub name: CompactString,
    pub factory: Factory,
    pub flags: DirectiveFlags,
}

impl Directive {
    #[inline]
    pub fn is_exclusive(&self) -> bool {
        self.flags.contains(DirectiveFlags::EXCLUSIVE)
    }
}

impl fmt::Debug for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directive")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Attribute name to directive lookup, passed explicitly to the compiler.
#[derive(Debug, Clone, Default)]
pub struct DirectiveRegistry {
    directives: FxHashMap<CompactString, Directive>,
}

impl DirectiveRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `ng-*` directives
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::directives::register_builtins(&mut registry);
        registry
    }

    /// Register a directive, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: &str, factory: F, flags: DirectiveFlags)
    where
        F: Fn(&mut CompileContext<'_>, &str, NodeId) -> Result<Option<Activation>> + 'static,
    {
        let name = CompactString::from(name);
        self.directives.insert(
            name.clone(),
            Directive {
                name,
                factory: Rc::new(factory),
                flags,
            },
        );
    }

    /// Find the directive bound to an attribute name
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&Directive> {
        self.directives.get(name)
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}
