//! # frieze_atelier
//!
//! Atelier - the workshop where templates come alive.
//!
//! - [`compile()`] turns an element subtree into a [`Template`] by handing
//!   directive attributes to the factories in a [`DirectiveRegistry`].
//! - A [`Template`] is instantiated per element (a clone for repeated items,
//!   the element itself for a page root) into a [`ChildInstance`] whose
//!   activations register watches on the instance scope.
//! - [`ListReconciler`] keeps the instances of an `ng-repeat` site in step
//!   with the collection it iterates.
//!
//! Everything runs against a [`Runtime`], which owns the document and the
//! scopes.

pub mod compile;
pub mod directives;
mod error;
pub mod reconciler;
pub mod registry;
mod runtime;

pub use compile::{compile, ChildInstance, CompileContext, NodePath, Template};
pub use directives::RepeatExpression;
pub use error::{AtelierError, Result};
pub use reconciler::{ListReconciler, ReconcileStats, INDEX_VAR};
pub use registry::{Activation, Directive, DirectiveFlags, DirectiveRegistry, Factory};
pub use runtime::Runtime;
