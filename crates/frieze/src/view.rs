//! The `View` entry point.

use frieze_armature::parse_document;
use frieze_atelier::{compile, AtelierError, DirectiveRegistry, Runtime};
use frieze_croquis::update_view;
use frieze_fresco::{DomError, NodeId};
use frieze_relief::{Map, RenderOptions, Value};
use tracing::debug;

use crate::error::Result;

/// A parsed, compiled page bound to a root scope.
///
/// Directives are activated when the view is built; nothing renders until the
/// first [`View::update`].
pub struct View {
    rt: Runtime,
    root: NodeId,
}

impl View {
    /// Build a view with the built-in directives.
    pub fn new(markup: &str, options: RenderOptions) -> Result<Self> {
        Self::with_registry(markup, options, &DirectiveRegistry::with_builtins())
    }

    pub fn with_registry(
        markup: &str,
        options: RenderOptions,
        registry: &DirectiveRegistry,
    ) -> Result<Self> {
        let document = parse_document(markup, &options)?;
        // parsed documents always carry a fragment root
        let root = document
            .root()
            .ok_or_else(|| AtelierError::from(DomError::UnknownNode(NodeId::default())))?;

        let mut rt = Runtime::new(document, options);
        let template = compile(&mut rt.document, registry, &rt.options, root)?;
        let scope = rt.scopes.root();
        template.bind(&rt, root, scope)?.init(&mut rt)?;
        debug!(bindings = template.binding_count(), "view ready");

        Ok(Self { rt, root })
    }

    /// Bind a root-scope variable
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let scope = self.rt.scopes.root();
        self.rt
            .scopes
            .set(scope, name, value)
            .map_err(AtelierError::from)?;
        Ok(())
    }

    /// Bind every member of `values` as a root-scope variable
    pub fn assign(&mut self, values: Map<String, Value>) -> Result<()> {
        for (name, value) in values {
            self.set(&name, value)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.rt.scopes.get(self.rt.scopes.root(), name)
    }

    /// Evaluate an expression in the root scope.
    ///
    /// Assignments land in the root scope; no watch runs until the next
    /// update.
    pub fn eval(&mut self, source: &str) -> Result<Value> {
        let scope = self.rt.scopes.root();
        let value = self
            .rt
            .scopes
            .eval(scope, source)
            .map_err(AtelierError::from)?;
        Ok(value)
    }

    /// Run one update pass over the root scope's watches
    pub fn update(&mut self) -> Result<()> {
        let scope = self.rt.scopes.root();
        update_view(&mut self.rt, scope)?;
        Ok(())
    }

    /// Serialize the page
    pub fn html(&self) -> String {
        self.rt.document.to_html(self.root)
    }

    #[inline]
    pub fn runtime(&self) -> &Runtime {
        &self.rt
    }

    #[inline]
    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.rt
    }
}
