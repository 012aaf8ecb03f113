//! Derive macros for `annoscope`.
//!
//! - `#[derive(Reflect)]` turns a struct or enum declaration into its
//!   catalog declaration: structs are products over their fields, enums are
//!   sums whose variants are declared as `Enum::Variant` products over the
//!   variant's fields. `#[annotate(expr)]` attaches an annotation instance
//!   at type, field or variant level; it may be repeated and order is kept.
//!   `#[reflect(name = "..")]` overrides a type or variant id.
//! - `#[derive(AnnotationKind)]` declares an annotation payload type:
//!   `#[kind(name = "..", extends(Parent, ..), abstract)]`. Every parent
//!   must implement `From<Self>`; typed resolution uses it to convert a
//!   sub-kind instance into the requested kind.
//!
//! The generated code refers to `::annoscope`; use these macros through the
//! re-exports in that crate.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

mod attrs;
mod kind;
mod reflect;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `annoscope::Reflect`.
#[proc_macro_derive(Reflect, attributes(annotate, reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    reflect::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives `annoscope::AnnotationKind`.
#[proc_macro_derive(AnnotationKind, attributes(kind))]
pub fn derive_annotation_kind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    kind::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
