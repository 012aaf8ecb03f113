use annoscope::{resolve_slots_as, AnnotationKind, Reflect};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize, AnnotationKind)]
struct Label(String);

fn annotations() -> String {
    "annotations".into()
}

fn slots() -> String {
    "slots".into()
}

fn catalog() -> String {
    "catalog".into()
}

#[derive(Reflect)]
#[annotate(Label(catalog()))]
#[allow(dead_code)]
struct Names {
    #[annotate(Label(annotations()))]
    a: u8,
    #[annotate(Label(slots()))]
    b: u8,
}

#[derive(Reflect)]
#[allow(dead_code)]
enum Picks {
    #[annotate(Label(annotations()))]
    First,
    Second(#[annotate(Label(catalog()))] u8),
}

fn main() {
    let labels = resolve_slots_as::<Label, Names>().unwrap();
    assert_eq!(
        labels,
        vec![Some(Label("annotations".into())), Some(Label("slots".into()))]
    );
    let picks = resolve_slots_as::<Label, Picks>().unwrap();
    assert_eq!(picks, vec![Some(Label("annotations".into())), None]);
}
