//! Template compiler.
//!
//! Compiling walks an element subtree in document order and hands every
//! attribute that names a registered directive to that directive's factory.
//! The resulting [`Template`] remembers, per element, the child-index path
//! from the template root and the activations produced there. Instantiating
//! the template resolves those paths inside a clone and runs the activations
//! against the clone's nodes.

use frieze_carton::{CompactString, SmallVec};
use frieze_croquis::ScopeId;
use frieze_fresco::{Document, DomError, NodeId, NodeKind};
use frieze_relief::RenderOptions;
use tracing::debug;

use crate::error::Result;
use crate::registry::{Activation, Directive, DirectiveRegistry};
use crate::runtime::Runtime;

/// Child indices from a template root to one of its nodes.
pub type NodePath = SmallVec<[usize; 8]>;

/// What a directive factory sees while its element is being compiled.
pub struct CompileContext<'a> {
    document: &'a mut Document,
    registry: &'a DirectiveRegistry,
    options: &'a RenderOptions,
    descend: bool,
}

impl<'a> CompileContext<'a> {
    /// The document being compiled
    #[inline]
    pub fn document(&mut self) -> &mut Document {
        self.document
    }

    #[inline]
    pub fn options(&self) -> &RenderOptions {
        self.options
    }

    /// Compile a subtree into its own template
    pub fn compile(&mut self, root: NodeId) -> Result<Template> {
        compile(self.document, self.registry, self.options, root)
    }

    /// Create a detached comment node to mark a position in the document
    pub fn reference(&mut self, text: &str) -> NodeId {
        self.document.create_comment(text)
    }

    /// Whether the compiler continues into the current element's children
    #[inline]
    pub fn descend(&mut self, descend: bool) {
        self.descend = descend;
    }
}

/// Activations recorded for one node of a template
struct Binding {
    path: NodePath,
    activations: SmallVec<[Activation; 2]>,
}

/// A compiled, reusable element subtree
pub struct Template {
    root: NodeId,
    bindings: Vec<Binding>,
}

impl Template {
    /// The compiled subtree, to be cloned per instance
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes that carry activations
    #[inline]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Paths of the nodes that carry activations, in document order
    pub fn binding_paths(&self) -> impl Iterator<Item = &[usize]> {
        self.bindings.iter().map(|binding| binding.path.as_slice())
    }

    /// Bind `element` (a clone of [`Template::root`]) to a new child scope of
    /// `parent`. Activations run on [`ChildInstance::init`].
    pub fn instantiate(
        &self,
        rt: &mut Runtime,
        element: NodeId,
        parent: ScopeId,
    ) -> Result<ChildInstance> {
        let scope = rt.scopes.create_child(parent)?;
        let bound = self.bind(rt, element, scope);
        if bound.is_err() {
            let _ = rt.scopes.destroy(scope);
        }
        bound
    }

    /// Bind `element` to an existing scope.
    ///
    /// Used to link a page root, which is not cloned and lives in the root
    /// scope.
    pub fn bind(&self, rt: &Runtime, element: NodeId, scope: ScopeId) -> Result<ChildInstance> {
        let mut pending = Vec::new();
        for binding in &self.bindings {
            let node = rt
                .document
                .child_at_path(element, &binding.path)
                .ok_or(DomError::UnknownNode(element))?;
            for activation in &binding.activations {
                pending.push((node, activation.clone()));
            }
        }
        Ok(ChildInstance {
            scope,
            element,
            pending,
        })
    }
}

/// One instantiation of a template: a scope paired with an element.
pub struct ChildInstance {
    pub scope: ScopeId,
    pub element: NodeId,
    pending: Vec<(NodeId, Activation)>,
}

impl ChildInstance {
    /// Run the activations collected at instantiation
    pub fn init(&mut self, rt: &mut Runtime) -> Result<()> {
        for (node, activation) in std::mem::take(&mut self.pending) {
            activation(rt, self.scope, node)?;
        }
        Ok(())
    }
}

/// Compile the subtree rooted at `root`.
///
/// Factories may rewrite the document while it is walked, but must leave the
/// position of the element they were called for occupied (replacing it is
/// fine) so recorded paths stay valid.
pub fn compile(
    document: &mut Document,
    registry: &DirectiveRegistry,
    options: &RenderOptions,
    root: NodeId,
) -> Result<Template> {
    let mut ctx = CompileContext {
        document,
        registry,
        options,
        descend: true,
    };
    let mut bindings = Vec::new();
    let mut path = NodePath::new();
    compile_node(&mut ctx, root, &mut path, &mut bindings)?;
    debug!(root, bindings = bindings.len(), "compiled template");
    Ok(Template { root, bindings })
}

fn compile_node(
    ctx: &mut CompileContext<'_>,
    node: NodeId,
    path: &mut NodePath,
    bindings: &mut Vec<Binding>,
) -> Result<()> {
    let is_element = match ctx.document.get(node).map(|dom_node| &dom_node.kind) {
        Some(NodeKind::Element(_)) => true,
        Some(NodeKind::Fragment) => false,
        Some(NodeKind::Text(_) | NodeKind::Comment(_)) | None => return Ok(()),
    };

    if is_element {
        let matched = match_directives(ctx, node)?;
        ctx.descend = true;
        let mut activations = SmallVec::new();
        for (directive, expression) in matched {
            if let Some(activation) = (directive.factory)(ctx, expression.as_str(), node)? {
                activations.push(activation);
            }
        }
        if !activations.is_empty() {
            bindings.push(Binding {
                path: path.clone(),
                activations,
            });
        }
        if !ctx.descend {
            return Ok(());
        }
    }

    let mut index = 0;
    while let Some(&child) = ctx.document.children(node).get(index) {
        path.push(index);
        compile_node(ctx, child, path, bindings)?;
        path.pop();
        index += 1;
    }
    Ok(())
}

/// Directives named by the element's attributes, in attribute order.
///
/// If any of them is exclusive, only the first exclusive one is kept.
fn match_directives<'r>(
    ctx: &CompileContext<'r>,
    node: NodeId,
) -> Result<Vec<(&'r Directive, CompactString)>> {
    let registry = ctx.registry;
    let mut matched: Vec<(&'r Directive, CompactString)> = ctx
        .document
        .attributes(node)?
        .iter()
        .filter_map(|attr| {
            registry
                .lookup(&attr.name)
                .map(|directive| (directive, attr.value.clone()))
        })
        .collect();

    if let Some(pos) = matched.iter().position(|(directive, _)| directive.is_exclusive()) {
        let exclusive = matched.swap_remove(pos);
        matched = vec![exclusive];
    }
    Ok(matched)
}
