//! The host that owns a live view.

use frieze_croquis::{ScopeHost, Scopes};
use frieze_fresco::Document;
use frieze_relief::RenderOptions;

use crate::error::AtelierError;

/// A document together with the scopes bound to it.
///
/// Activations and watch callbacks receive the runtime mutably.
pub struct Runtime {
    pub document: Document,
    pub scopes: Scopes<Runtime>,
    pub options: RenderOptions,
}

impl Runtime {
    pub fn new(document: Document, options: RenderOptions) -> Self {
        Self {
            document,
            scopes: Scopes::new(),
            options,
        }
    }
}

impl ScopeHost for Runtime {
    type Error = AtelierError;

    fn scopes(&self) -> &Scopes<Self> {
        &self.scopes
    }

    fn scopes_mut(&mut self) -> &mut Scopes<Self> {
        &mut self.scopes
    }
}
