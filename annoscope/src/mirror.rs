//! Structural mirror and annotation table seams.
//!
//! Resolvers never look at a [`Catalog`] directly. They ask a
//! [`StructuralMirror`] how a subject decomposes and an [`AnnotationTable`]
//! what is attached to a declaration site, so any declaration source (a
//! JSON catalog, derive-generated declarations, a compiler's metadata) can
//! sit behind them.

use std::fmt;

use tracing::debug;

use crate::kinds::KindHierarchy;
use crate::model::{Annotation, Catalog, Shape, SlotDecl, TypeDecl};

/// A point in the declarations that can carry annotations.
#[derive(Debug, Clone, Copy)]
pub enum DeclarationSite<'a> {
    /// A type declaration itself.
    Type(&'a TypeDecl),
    /// One value parameter of a product type.
    Slot {
        /// The product type owning the parameter.
        owner: &'a TypeDecl,
        /// The parameter.
        slot: &'a SlotDecl,
    },
    /// A variant of a sum type; annotations come from the variant's own
    /// type declaration.
    Variant {
        /// The sum type.
        owner: &'a TypeDecl,
        /// The variant's type declaration.
        variant: &'a TypeDecl,
    },
}

impl fmt::Display for DeclarationSite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationSite::Type(decl) => write!(f, "{}", decl.id),
            DeclarationSite::Slot { owner, slot } => write!(f, "{}.{}", owner.id, slot.name),
            DeclarationSite::Variant { variant, .. } => write!(f, "{}", variant.id),
        }
    }
}

/// Structural decomposition of a subject type.
#[derive(Debug, Clone)]
pub enum Mirror<'a> {
    /// Neither product- nor sum-shaped.
    NotStructural,
    /// The primary parameter list, in declaration order.
    Product {
        /// Primary slots.
        slots: &'a [SlotDecl],
    },
    /// The variant declarations, in declaration order, or `None` when they
    /// cannot be enumerated.
    Sum {
        /// Variant declarations.
        variants: Option<Vec<&'a TypeDecl>>,
    },
}

/// Classifies and decomposes subject types.
pub trait StructuralMirror {
    /// Looks up a subject type declaration.
    fn declaration(&self, subject: &str) -> Option<&TypeDecl>;

    /// Decomposes `subject` into its slots or variants.
    fn mirror<'a>(&'a self, subject: &'a TypeDecl) -> Mirror<'a>;
}

/// Lists the annotation instances attached to a declaration site.
pub trait AnnotationTable {
    /// Instances attached to `site`, in declaration order.
    fn annotations<'a>(&'a self, site: &DeclarationSite<'a>) -> &'a [Annotation];
}

/// Everything a resolution needs from its declaration source.
pub trait Introspect: StructuralMirror + AnnotationTable + KindHierarchy {}

impl<T: StructuralMirror + AnnotationTable + KindHierarchy + ?Sized> Introspect for T {}

impl StructuralMirror for Catalog {
    fn declaration(&self, subject: &str) -> Option<&TypeDecl> {
        self.find_type(subject)
    }

    fn mirror<'a>(&'a self, subject: &'a TypeDecl) -> Mirror<'a> {
        match &subject.shape {
            Shape::Opaque => Mirror::NotStructural,
            Shape::Product { slots, .. } => Mirror::Product {
                slots: slots.as_slice(),
            },
            Shape::Sum { variants: None } => Mirror::Sum { variants: None },
            Shape::Sum {
                variants: Some(ids),
            } => {
                let mut variants = Vec::with_capacity(ids.len());
                for id in ids {
                    match self.find_type(id) {
                        Some(decl) => variants.push(decl),
                        None => {
                            debug!(subject = %subject.id, variant = %id, "undeclared variant");
                            return Mirror::Sum { variants: None };
                        }
                    }
                }
                Mirror::Sum {
                    variants: Some(variants),
                }
            }
        }
    }
}

impl AnnotationTable for Catalog {
    fn annotations<'a>(&'a self, site: &DeclarationSite<'a>) -> &'a [Annotation] {
        match *site {
            DeclarationSite::Type(decl) => &decl.annotations,
            DeclarationSite::Slot { slot, .. } => &slot.annotations,
            DeclarationSite::Variant { variant, .. } => &variant.annotations,
        }
    }
}
