//! Carton - The shared toolbox for Frieze.
//!
//! This crate holds the small utilities and collection types every other Frieze
//! crate reaches for, the way a carton (an artist's portfolio case) holds the
//! tools shared across a whole workshop.
//!
//! # Modules
//!
//! - **dom_tag_config**: HTML tag classification (void elements)
//! - **general**: identifier checks and HTML escaping
//!
//! # Example
//!
//! ```
//! use frieze_carton::{is_simple_identifier, is_void_tag, FxHashMap};
//!
//! assert!(is_simple_identifier("book"));
//! assert!(is_void_tag("br"));
//!
//! let mut map = FxHashMap::default();
//! map.insert("title", 1);
//! assert_eq!(map.len(), 1);
//! ```

pub mod dom_tag_config;
pub mod general;

// Re-export compact_str::CompactString for convenience
pub use compact_str::{format_compact, CompactString, ToCompactString};

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export bitflags for flag types
pub use bitflags::bitflags;

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

// Re-export phf for compile-time perfect hash functions
pub use phf::{phf_set, Set as PhfSet};

// Re-export shared utilities
pub use dom_tag_config::*;
pub use general::*;
