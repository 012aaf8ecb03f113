//! Slot-level annotation introspection.
//!
//! Given a subject type and a requested annotation kind, `annoscope` answers
//! two questions over an immutable declaration graph:
//!
//! - does the subject itself carry an annotation of that kind
//!   ([`resolve`]), and
//! - which of the subject's slots carry one ([`resolve_slots`]). Slots are
//!   the primary constructor parameters of a product type or the variants of
//!   a sum type, in declaration order.
//!
//! Matching is subtype-aware: an instance attached with a more specific kind
//! satisfies a request for any of its super-kinds.
//!
//! # Entry Point
//!
//! ```
//! use annoscope::{resolve_slots, Annotation, Catalog, KindDecl, SlotDecl, TypeDecl};
//! use serde_json::json;
//!
//! let mut catalog = Catalog::new();
//! catalog.declare_kind(KindDecl::concrete("Label"));
//! catalog.declare_type(TypeDecl::product(
//!     "Pair",
//!     vec![
//!         SlotDecl::new("i", "Int"),
//!         SlotDecl::new("s", "String").with_annotation(Annotation::new("Label", json!("a"))),
//!     ],
//! ));
//!
//! let tuple = resolve_slots(&catalog, "Label", "Pair").unwrap();
//! assert_eq!(tuple.present_mask(), vec![false, true]);
//! ```
//!
//! # Rust declarations
//!
//! With the `derive` feature (on by default), `#[derive(Reflect)]` and
//! `#[derive(AnnotationKind)]` build the same catalog from Rust structs and
//! enums; see [`resolve_as`] and [`resolve_slots_as`].

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod aggregator;
pub mod error;
pub mod kinds;
pub mod mirror;
pub mod model;
pub mod resolver;
pub mod serializer;
pub mod tuple;
pub mod typed;
pub mod validate;

pub use aggregator::{resolve_slots, resolve_slots_with};
pub use error::{ResolveError, Result};
pub use kinds::KindHierarchy;
pub use mirror::{AnnotationTable, DeclarationSite, Introspect, Mirror, StructuralMirror};
pub use model::{Annotation, Catalog, KindDecl, Shape, SlotDecl, TypeDecl};
pub use resolver::{match_site, resolve, resolve_with, MatchPolicy};
pub use tuple::{ResultTuple, SlotEntry, SlotResult, TupleShape};
pub use typed::{resolve_as, resolve_slots_as, AnnotationKind, Reflect};
pub use validate::{validate, Check, Severity, ValidationReport};

#[cfg(feature = "derive")]
pub use annoscope_derive::{AnnotationKind, Reflect};
