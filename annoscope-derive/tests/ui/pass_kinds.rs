use annoscope::{AnnotationKind, Catalog};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, AnnotationKind)]
#[kind(abstract)]
struct Marker;

#[derive(Serialize, Deserialize, AnnotationKind)]
#[kind(extends(Marker))]
struct Deprecated {
    since: String,
}

#[derive(Serialize, Deserialize, AnnotationKind)]
#[kind(name = "serde.rename", extends(Marker, Deprecated))]
struct Rename {
    to: String,
}

impl From<Deprecated> for Marker {
    fn from(_: Deprecated) -> Self {
        Marker
    }
}

impl From<Rename> for Marker {
    fn from(_: Rename) -> Self {
        Marker
    }
}

impl From<Rename> for Deprecated {
    fn from(rename: Rename) -> Self {
        Deprecated { since: rename.to }
    }
}

fn main() {
    let mut catalog = Catalog::new();
    catalog.register_kind::<Rename>();
    assert_eq!(catalog.kind_count(), 3);
    assert!(<Marker as AnnotationKind>::ABSTRACT);
    assert_eq!(<Rename as AnnotationKind>::KIND, "serde.rename");
}
