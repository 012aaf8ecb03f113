use annoscope::{AnnotationKind, Reflect};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, AnnotationKind)]
struct Label(String);

#[derive(Reflect)]
struct Unit;

#[derive(Reflect)]
struct Tuple(#[annotate(Label("0".into()))] u8, String);

#[derive(Reflect)]
struct Borrowed<'a> {
    #[annotate(Label("text".into()))]
    text: &'a str,
}

#[derive(Reflect)]
enum Empty {}

#[derive(Reflect)]
enum Mixed {
    Unit,
    Tuple(u8),
    Named { value: Vec<u8> },
}

fn main() {
    assert_eq!(<Unit as Reflect>::SLOT_COUNT, 0);
    assert_eq!(<Tuple as Reflect>::SLOT_COUNT, 2);
    assert_eq!(<Borrowed<'static> as Reflect>::SLOT_COUNT, 1);
    assert_eq!(<Empty as Reflect>::SLOT_COUNT, 0);
    assert_eq!(<Mixed as Reflect>::SLOT_COUNT, 3);
    assert_eq!(<Label as AnnotationKind>::KIND, "Label");
}
