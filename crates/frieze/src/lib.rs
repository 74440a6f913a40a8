//! # Frieze
//!
//! Live templates over an in-memory DOM.
//!
//! ## Name Origin
//!
//! A **frieze** is a band of repeated relief running along a wall: one motif,
//! stamped again and again. That is what `ng-repeat` does to an element, and
//! the rest of the toolkit grew around it.
//!
//! ## Usage
//!
//! ```no_run
//! use frieze::{RenderOptions, View};
//! use serde_json::json;
//!
//! let mut view = View::new(
//!     r#"<ul><li ng-repeat="book in books" ng-bind="book.title"></li></ul>"#,
//!     RenderOptions::default(),
//! )?;
//! view.set("books", json!([{ "title": "Moby" }]))?;
//! view.update()?;
//! println!("{}", view.html());
//! # Ok::<(), frieze::FriezeError>(())
//! ```
//!
//! ## Crates
//!
//! - [`carton`] - Shared utilities and re-exported collections
//! - [`relief`] - Values, expression AST and render options
//! - [`fresco`] - In-memory DOM
//! - [`armature`] - Expression and markup parsers
//! - [`croquis`] - Scopes and watches
//! - [`atelier`] - Template compiler, directives and list reconciliation

pub mod config;
mod error;
mod view;

pub use error::{FriezeError, Result};
pub use view::View;

pub use frieze_relief::RenderOptions;

/// Shared utilities and re-exported collections.
pub use frieze_carton as carton;

/// Values, expression AST and render options.
pub use frieze_relief as relief;

/// In-memory DOM.
pub use frieze_fresco as fresco;

/// Expression and markup parsers.
pub use frieze_armature as armature;

/// Scopes and watches.
pub use frieze_croquis as croquis;

/// Template compiler, directives and list reconciliation.
pub use frieze_atelier as atelier;
