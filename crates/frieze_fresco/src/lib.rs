//! Fresco - In-memory DOM for Frieze.
//!
//! The directive layer never touches a browser. It works against this small
//! document model, which offers exactly the element operations directives rely
//! on:
//!
//! - `clone` ([`Document::clone_node`])
//! - `attr` / `removeAttr` ([`Document::attr`], [`Document::set_attr`],
//!   [`Document::remove_attr`])
//! - `parent` ([`Document::parent`])
//! - `replaceWith` ([`Document::replace_with`])
//! - `after` ([`Document::after`])
//! - `remove` ([`Document::remove`])
//! - `text` ([`Document::set_text`])
//!
//! Nodes live in an arena keyed by [`NodeId`]; ids stay valid until the node is
//! removed, so a detached subtree (a template's original element) can be
//! cloned repeatedly.

mod document;
mod error;
mod node;
mod serialize;

pub use document::{Document, TreeWalker};
pub use error::{DomError, DomResult};
pub use node::{Attribute, DomNode, ElementData, NodeId, NodeKind};
