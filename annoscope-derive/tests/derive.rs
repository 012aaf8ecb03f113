//! End-to-end behaviour of the derived `Reflect` and `AnnotationKind` impls.

use annoscope::{
    resolve, resolve_as, resolve_slots, resolve_slots_as, AnnotationKind, Catalog, Reflect,
    ResolveError, Shape, SlotResult, TupleShape,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, AnnotationKind)]
#[kind(abstract)]
struct Tag;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, AnnotationKind)]
#[kind(extends(Tag))]
struct Label(String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, AnnotationKind)]
#[kind(name = "display-label", extends(Label))]
struct DisplayLabel(String);

impl From<Label> for Tag {
    fn from(_: Label) -> Self {
        Tag
    }
}

impl From<DisplayLabel> for Label {
    fn from(label: DisplayLabel) -> Self {
        Label(label.0)
    }
}

/// Payload shaped differently from its parent's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, AnnotationKind)]
#[kind(extends(Label))]
struct Heading(String, u8);

impl From<Heading> for Label {
    fn from(heading: Heading) -> Self {
        Label(format!("{} (level {})", heading.0, heading.1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, AnnotationKind)]
struct Note {
    text: String,
}

fn note(text: &str) -> Note {
    Note { text: text.into() }
}

#[derive(Reflect)]
#[allow(dead_code)]
struct Pair {
    i: i64,
    #[annotate(Label("a".into()))]
    s: String,
}

#[derive(Reflect)]
#[allow(dead_code)]
struct Doc {
    #[annotate(Heading("Intro".into(), 1))]
    title: String,
    body: String,
}

#[derive(Reflect)]
#[allow(dead_code)]
enum Choice {
    #[annotate(Label("b".into()))]
    X,
    Y,
}

#[derive(Reflect)]
#[allow(dead_code)]
#[annotate(note("n"))]
#[annotate(DisplayLabel("d".into()))]
#[annotate(Label("l".into()))]
struct Titled;

#[derive(Reflect)]
#[allow(dead_code)]
struct Record {
    #[annotate(note("first"))]
    a: u8,
    b: Vec<u8>,
    #[annotate(note("third"))]
    #[annotate(Label("k".into()))]
    c: Option<String>,
    d: (),
}

#[derive(Reflect)]
#[reflect(name = "geometry.Shape")]
#[allow(dead_code)]
enum Figure {
    Circle { radius: f64 },
    #[annotate(DisplayLabel("square".into()))]
    Square(#[annotate(note("side"))] f64),
}

#[derive(Reflect)]
#[allow(dead_code)]
struct Wrapper<T> {
    #[annotate(Label("inner".into()))]
    inner: T,
}

#[test]
fn product_end_to_end() {
    let slots = resolve_slots_as::<Label, Pair>().unwrap();
    assert_eq!(slots, vec![None, Some(Label("a".into()))]);
}

#[test]
fn sum_end_to_end() {
    let slots = resolve_slots_as::<Label, Choice>().unwrap();
    assert_eq!(slots, vec![Some(Label("b".into())), None]);
}

#[test]
fn sub_kind_with_its_own_payload_shape() {
    let labels = resolve_slots_as::<Label, Doc>().unwrap();
    assert_eq!(labels, vec![Some(Label("Intro (level 1)".into())), None]);

    let headings = resolve_slots_as::<Heading, Doc>().unwrap();
    assert_eq!(headings, vec![Some(Heading("Intro".into(), 1)), None]);

    let tuple = {
        let mut catalog = Catalog::new();
        catalog.register::<Doc>().unwrap();
        resolve_slots(&catalog, "Label", "Doc").unwrap()
    };
    assert_eq!(tuple.values(), vec![Some(&json!(["Intro", 1])), None]);
}

#[test]
fn upcast_walks_the_declared_hierarchy() {
    assert!(DisplayLabel::reaches("Tag"));
    assert!(!Label::reaches("display-label"));
    let upcast = DisplayLabel("d".into()).upcast("Label").unwrap();
    assert_eq!(upcast.downcast::<Label>().ok().map(|b| *b), Some(Label("d".into())));
    assert!(Note { text: "n".into() }.upcast("Label").is_none());
}

#[test]
fn type_level_first_declared_match_wins() {
    assert_eq!(resolve_as::<Label, Titled>().unwrap(), Label("d".into()));
    assert_eq!(resolve_as::<Note, Titled>().unwrap(), note("n"));
    assert_eq!(
        resolve_as::<DisplayLabel, Titled>().unwrap(),
        DisplayLabel("d".into())
    );
}

#[test]
fn only_the_annotated_slot_is_present() {
    let mut catalog = Catalog::new();
    catalog.register_kind::<Label>();
    catalog.register::<Record>().unwrap();

    let tuple = resolve_slots(&catalog, "Label", "Record").unwrap();
    assert_eq!(tuple.arity(), Record::SLOT_COUNT);
    assert_eq!(tuple.present_positions(), vec![2]);
    assert_eq!(
        tuple.get(2).and_then(SlotResult::annotation).map(|a| &a.value),
        Some(&json!("k"))
    );

    let notes = resolve_slots_as::<Note, Record>().unwrap();
    assert_eq!(notes, vec![Some(note("first")), None, Some(note("third")), None]);
}

#[test]
fn abstract_kind_is_rejected() {
    let err = resolve_slots_as::<Tag, Pair>().unwrap_err();
    assert_eq!(
        err,
        ResolveError::InvalidAnnotationKind {
            kind: "Tag".into(),
            subject: "Pair".into(),
        }
    );
    assert!(matches!(
        resolve_as::<Tag, Titled>(),
        Err(ResolveError::InvalidAnnotationKind { .. })
    ));
}

#[test]
fn missing_type_annotation_is_not_found() {
    assert_eq!(
        resolve_as::<Note, Pair>(),
        Err(ResolveError::NotFound {
            kind: "Note".into(),
            site: "Pair".into(),
        })
    );
}

#[test]
fn renamed_enum_and_variant_declarations() {
    let mut catalog = Catalog::new();
    catalog.register::<Figure>().unwrap();

    assert_eq!(<Figure as Reflect>::TYPE_ID, "geometry.Shape");
    let decl = catalog.find_type("geometry.Shape").unwrap();
    assert_eq!(
        decl.shape,
        Shape::Sum {
            variants: Some(vec![
                "geometry.Shape::Circle".into(),
                "geometry.Shape::Square".into(),
            ]),
        }
    );

    let square = catalog.find_type("geometry.Shape::Square").unwrap();
    let Shape::Product { slots, .. } = &square.shape else {
        panic!("variants are products over their fields");
    };
    assert_eq!(slots[0].name, "0");
    assert_eq!(slots[0].type_ref, "f64");

    let tuple = resolve_slots(&catalog, "Label", "geometry.Shape").unwrap();
    assert_eq!(tuple.shape(), TupleShape::Sum);
    assert_eq!(tuple.present_mask(), vec![false, true]);

    let fields = resolve_slots(&catalog, "Note", "geometry.Shape::Square").unwrap();
    assert_eq!(fields.present_positions(), vec![0]);
}

#[test]
fn derived_kind_declarations() {
    let mut catalog = Catalog::new();
    catalog.register_kind::<DisplayLabel>();

    assert_eq!(DisplayLabel::KIND, "display-label");
    assert!(Tag::ABSTRACT);
    let ids: Vec<&str> = catalog.kinds.iter().map(|k| k.id.as_str()).collect();
    assert_eq!(ids, vec!["display-label", "Label", "Tag"]);
    assert_eq!(catalog.find_kind("display-label").unwrap().extends, vec!["Label"]);
    assert_eq!(catalog.find_kind("display-label").unwrap().label, "DisplayLabel");
}

#[test]
fn generic_subjects() {
    let slots = resolve_slots_as::<Label, Wrapper<u32>>().unwrap();
    assert_eq!(slots, vec![Some(Label("inner".into()))]);
    assert_eq!(<Wrapper<u32> as Reflect>::TYPE_ID, "Wrapper");
}

#[test]
fn repeated_resolution_is_identical() {
    let mut catalog = Catalog::new();
    catalog.register_kind::<Label>();
    catalog.register::<Record>().unwrap();
    let first = resolve_slots(&catalog, "Label", "Record").unwrap();
    let second = resolve_slots(&catalog, "Label", "Record").unwrap();
    assert_eq!(first, second);
    assert_eq!(
        resolve(&catalog, "Label", "Record"),
        resolve(&catalog, "Label", "Record")
    );
}
