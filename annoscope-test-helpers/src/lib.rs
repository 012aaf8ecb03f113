//! Test-only catalogs for `annoscope`.
//!
//! Not published. Integration tests build on [`labels`], a small catalog
//! with a kind hierarchy and one subject type for every shape the resolvers
//! distinguish, and on [`record`] for generated products.
//!
//! Kinds in [`labels`]:
//!
//! | Kind | Abstract | Extends |
//! |------|----------|---------|
//! | `Tag` | yes | |
//! | `Label` | | `Tag` |
//! | `DisplayLabel` | | `Label` |
//! | `Note` | | |

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use annoscope::{Annotation, Catalog, KindDecl, SlotDecl, TypeDecl};
use serde_json::json;

/// A `Label` instance.
pub fn label(text: &str) -> Annotation {
    Annotation::new("Label", json!(text))
}

/// A `DisplayLabel` instance.
pub fn display_label(text: &str) -> Annotation {
    Annotation::new("DisplayLabel", json!(text))
}

/// A `Note` instance.
pub fn note(text: &str) -> Annotation {
    Annotation::new("Note", json!(text))
}

/// The kind hierarchy shared by every fixture.
pub fn kinds() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.declare_kind(KindDecl::open("Tag"));
    catalog.declare_kind(KindDecl::concrete("Label").extending("Tag"));
    catalog.declare_kind(KindDecl::concrete("DisplayLabel").extending("Label"));
    catalog.declare_kind(KindDecl::concrete("Note"));
    catalog
}

/// The shared fixture catalog.
///
/// - `Pair(i: Int, s: String)`, `s` labelled `"a"`.
/// - `Choice = X | Y`, `X` labelled `"b"`.
/// - `Triad = V1 | V2 | V3`, `V2` labelled `"x"`.
/// - `Titled`, carrying `[Note("n"), DisplayLabel("d"), Label("l")]`.
/// - `Curried(a: Int)(b: Int)`, only `b` labelled.
/// - `Int`, `String`: opaque. `Expr`: open sum. `Dangling`: sum over an
///   undeclared variant.
pub fn labels() -> Catalog {
    let mut catalog = kinds();
    catalog.declare_type(TypeDecl::opaque("Int"));
    catalog.declare_type(TypeDecl::opaque("String"));
    catalog.declare_type(TypeDecl::product(
        "Pair",
        vec![
            SlotDecl::new("i", "Int"),
            SlotDecl::new("s", "String").with_annotation(label("a")),
        ],
    ));

    catalog.declare_type(TypeDecl::product("X", Vec::new()).with_annotation(label("b")));
    catalog.declare_type(TypeDecl::product("Y", Vec::new()));
    catalog.declare_type(TypeDecl::sum("Choice", ["X", "Y"]));

    catalog.declare_type(TypeDecl::product("V1", Vec::new()).with_annotation(note("v1")));
    catalog.declare_type(TypeDecl::product("V2", Vec::new()).with_annotation(label("x")));
    catalog.declare_type(TypeDecl::opaque("V3"));
    catalog.declare_type(TypeDecl::sum("Triad", ["V1", "V2", "V3"]));

    catalog.declare_type(
        TypeDecl::opaque("Titled")
            .with_annotation(note("n"))
            .with_annotation(display_label("d"))
            .with_annotation(label("l")),
    );

    catalog.declare_type(
        TypeDecl::product("Curried", vec![SlotDecl::new("a", "Int")])
            .with_secondary_list(vec![SlotDecl::new("b", "Int").with_annotation(label("b"))]),
    );

    catalog.declare_type(TypeDecl::open_sum("Expr"));
    catalog.declare_type(TypeDecl::sum("Dangling", ["X", "Missing"]));
    catalog
}

/// A catalog holding the shared kinds and one product `Record` with
/// `arity` slots `f0..`, where only slot `labelled` carries `Label("k")`
/// and every slot listed in `noted` carries `Note`.
pub fn record(arity: usize, labelled: Option<usize>, noted: &[usize]) -> Catalog {
    let slots = (0..arity)
        .map(|i| {
            let mut slot = SlotDecl::new(format!("f{i}"), "Int");
            if noted.contains(&i) {
                slot = slot.with_annotation(note(&format!("note {i}")));
            }
            if labelled == Some(i) {
                slot = slot.with_annotation(label("k"));
            }
            slot
        })
        .collect();
    let mut catalog = kinds();
    catalog.declare_type(TypeDecl::product("Record", slots));
    catalog
}
