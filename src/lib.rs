// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # amor
//!
//! Thread-safe access to shared ontology + reasoner pairs.
//!
//! ## Architecture
//!
//! - **Registry** (`registry`): name-keyed table of live references
//! - **Coordinator** (`reference`): one reasoner lock serializing every read, write and synchronization
//! - **Enquirer** (`enquirer`): reads merging asserted facts with reasoner answers
//! - **Manipulator** (`manipulator`): writes as ordered change lists, immediate or buffered
//! - **Consistency monitor** (`consistency`): sticky consistency flag and explanation hook
//! - **Store and reasoners** (`ontology`, `reasoner`): in-memory axiom set, RDF I/O via oxigraph,
//!   taxonomy saturation via petgraph
//!
//! ## Library usage
//!
//! ```no_run
//! use amor::config::ReferenceConfig;
//! use amor::registry::ReferenceRegistry;
//!
//! let registry = ReferenceRegistry::new();
//! let kitchen = registry
//!     .create("kitchen", ReferenceConfig::new("http://www.semanticweb.org/kitchen"))
//!     .unwrap();
//! kitchen.add_sub_class("Mug", "Cup");
//! kitchen.add_individual_to_class("mug1", "Mug");
//! kitchen.synchronize();
//! assert!(kitchen.individuals_of("Cup").contains(&kitchen.namer().individual("mug1")));
//! ```

pub mod config;
pub mod consistency;
pub mod enquirer;
pub mod entity;
pub mod error;
pub mod explain;
pub mod manipulator;
pub mod naming;
pub mod ontology;
pub mod reasoner;
pub mod reference;
pub mod registry;

pub use config::{CreateMode, ReferenceConfig};
pub use consistency::ConsistencyState;
pub use error::{AmorError, AmorResult};
pub use reasoner::Completeness;
pub use reference::Reference;
pub use registry::ReferenceRegistry;
