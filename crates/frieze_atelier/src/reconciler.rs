//! Positional list reconciliation.
//!
//! A [`ListReconciler`] owns the instances stamped out for one repeat site.
//! Every pass receives the whole collection and walks it in order: position
//! `i` is always served by pool entry `i`, reusing it when it exists and
//! growing the pool otherwise. Surplus entries at the end are removed. Values
//! are never matched by identity, so inserting at the front rebinds every
//! instance after it.

use std::rc::Rc;

use frieze_carton::CompactString;
use frieze_croquis::{update_view, ScopeId};
use frieze_fresco::NodeId;
use frieze_relief::{Entries, Value};
use tracing::debug;

use crate::compile::{ChildInstance, Template};
use crate::error::Result;
use crate::runtime::Runtime;

/// Loop variable bound to each instance's position
pub const INDEX_VAR: &str = "$index";

/// Counts from one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub reused: usize,
    pub created: usize,
    pub removed: usize,
}

/// Pool of instances for one repeat site.
pub struct ListReconciler {
    /// Loop variable name
    lhs: CompactString,
    /// Template cloned for every new instance
    template: Rc<Template>,
    /// Marker the first instance is inserted after
    reference: NodeId,
    /// Scope that owns the repeat site; instance scopes are its children
    scope: ScopeId,
    /// Instances in collection order
    pool: Vec<ChildInstance>,
}

impl ListReconciler {
    pub fn new(
        lhs: impl Into<CompactString>,
        template: Rc<Template>,
        reference: NodeId,
        scope: ScopeId,
    ) -> Self {
        Self {
            lhs: lhs.into(),
            template,
            reference,
            scope,
            pool: Vec::new(),
        }
    }

    /// Number of live instances
    #[inline]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Live instances in collection order
    #[inline]
    pub fn instances(&self) -> &[ChildInstance] {
        &self.pool
    }

    /// The marker node
    #[inline]
    pub fn reference(&self) -> NodeId {
        self.reference
    }

    /// Bring the pool and its DOM in line with `items`.
    ///
    /// Fails without touching pool or DOM if `items` is not a collection.
    /// An error from a child update stops the pass at that position.
    pub fn reconcile(&mut self, rt: &mut Runtime, items: &Value) -> Result<ReconcileStats> {
        let entries = Entries::from_value(items)?;
        let mut stats = ReconcileStats::default();
        let mut last_element = self.reference;

        for (index, (_key, value)) in entries.iter().enumerate() {
            if index < self.pool.len() {
                stats.reused += 1;
            } else {
                let child = self.grow(rt, index, last_element)?;
                self.pool.push(child);
                stats.created += 1;
            }

            let child = &self.pool[index];
            rt.scopes.set(child.scope, &self.lhs, value.clone())?;
            update_view(rt, child.scope)?;
            last_element = child.element;
        }

        while self.pool.len() > entries.len() {
            if let Some(child) = self.pool.pop() {
                rt.document.remove(child.element)?;
                rt.scopes.destroy(child.scope)?;
                stats.removed += 1;
            }
        }

        debug!(
            lhs = %self.lhs,
            reused = stats.reused,
            created = stats.created,
            removed = stats.removed,
            "reconciled list"
        );
        Ok(stats)
    }

    /// Stamp out the instance for `index` and place it after `after`.
    ///
    /// A failure leaves neither a scope nor a clone behind.
    fn grow(&self, rt: &mut Runtime, index: usize, after: NodeId) -> Result<ChildInstance> {
        let element = rt.document.clone_node(self.template.root())?;
        let mut child = match self.template.instantiate(rt, element, self.scope) {
            Ok(child) => child,
            Err(err) => {
                let _ = rt.document.remove(element);
                return Err(err);
            }
        };
        if let Err(err) = Self::attach(rt, &mut child, index, after) {
            let _ = rt.scopes.destroy(child.scope);
            let _ = rt.document.remove(element);
            return Err(err);
        }
        Ok(child)
    }

    fn attach(
        rt: &mut Runtime,
        child: &mut ChildInstance,
        index: usize,
        after: NodeId,
    ) -> Result<()> {
        child.init(rt)?;
        rt.scopes.set(child.scope, INDEX_VAR, Value::from(index))?;
        if rt.document.get(child.element).is_some_and(|node| node.is_element()) {
            rt.document
                .set_attr(child.element, &rt.options.index_attribute, index.to_string())?;
        }
        rt.document.after(after, child.element)?;
        Ok(())
    }
}
