//! Declaration model.
//!
//! These types are the read-only declaration graph every resolution works
//! over: annotation kinds with their super-kinds, and subject types with
//! their shape and the annotation instances attached to each declaration
//! site. All collections keep declaration order; nothing here is ever
//! reordered or deduplicated implicitly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::typed::KindCodecs;

/// An annotation kind declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindDecl {
    /// Unique kind identifier (e.g. `"Label"`).
    pub id: String,
    /// Human-readable label.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Abstract kinds group other kinds and may not be requested.
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Identifiers of the direct super-kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
}

impl KindDecl {
    /// A concrete kind with no super-kinds.
    pub fn concrete(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            is_abstract: false,
            extends: Vec::new(),
        }
    }

    /// An abstract kind with no super-kinds.
    pub fn open(id: impl Into<String>) -> Self {
        Self {
            is_abstract: true,
            ..Self::concrete(id)
        }
    }

    /// Adds a direct super-kind.
    #[must_use]
    pub fn extending(mut self, parent: impl Into<String>) -> Self {
        self.extends.push(parent.into());
        self
    }

    /// Sets the human-readable label.
    #[must_use]
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// An annotation instance attached to one declaration site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Concrete kind of the instance.
    pub kind: String,
    /// Payload.
    #[serde(default)]
    pub value: Value,
}

impl Annotation {
    /// Creates an instance of `kind` carrying `value`.
    pub fn new(kind: impl Into<String>, value: Value) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }
}

/// One value parameter of a product type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDecl {
    /// Parameter name (`"0"`, `"1"`, ... for positional fields).
    pub name: String,
    /// Declared type of the parameter, as written.
    #[serde(rename = "type")]
    pub type_ref: String,
    /// Annotations attached to the parameter declaration, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl SlotDecl {
    /// Creates an unannotated slot.
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            annotations: Vec::new(),
        }
    }

    /// Appends an annotation instance.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Structural shape of a declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum Shape {
    /// Record-like: one primary parameter list.
    Product {
        /// The primary parameter list.
        #[serde(default)]
        slots: Vec<SlotDecl>,
        /// Further parameter lists; never inspected.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        secondary: Vec<Vec<SlotDecl>>,
    },
    /// A closed set of alternative types.
    Sum {
        /// Variant type identifiers, or `None` when the set is open and
        /// cannot be enumerated.
        #[serde(default)]
        variants: Option<Vec<String>>,
    },
    /// Neither product nor sum.
    Opaque,
}

/// A subject type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Unique type identifier.
    pub id: String,
    /// Annotations attached to the type declaration itself, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    /// Structural shape.
    pub shape: Shape,
}

impl TypeDecl {
    /// A product type with a single parameter list.
    pub fn product(id: impl Into<String>, slots: Vec<SlotDecl>) -> Self {
        Self {
            id: id.into(),
            annotations: Vec::new(),
            shape: Shape::Product {
                slots,
                secondary: Vec::new(),
            },
        }
    }

    /// A closed sum type over the given variant type identifiers.
    pub fn sum<I, S>(id: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            annotations: Vec::new(),
            shape: Shape::Sum {
                variants: Some(variants.into_iter().map(Into::into).collect()),
            },
        }
    }

    /// A sum type whose variants cannot be enumerated.
    pub fn open_sum(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            annotations: Vec::new(),
            shape: Shape::Sum { variants: None },
        }
    }

    /// A type that is neither product- nor sum-shaped.
    pub fn opaque(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            annotations: Vec::new(),
            shape: Shape::Opaque,
        }
    }

    /// Appends an annotation instance to the type declaration.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Appends a secondary parameter list. Has no effect on non-product types.
    #[must_use]
    pub fn with_secondary_list(mut self, list: Vec<SlotDecl>) -> Self {
        if let Shape::Product { secondary, .. } = &mut self.shape {
            secondary.push(list);
        }
        self
    }
}

/// The complete declaration graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Annotation kinds in declaration order.
    #[serde(default)]
    pub kinds: Vec<KindDecl>,
    /// Subject types in declaration order.
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    /// Payload decoders for kinds registered from Rust types.
    #[serde(skip)]
    pub(crate) codecs: KindCodecs,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid catalog document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Renders the catalog as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a payload cannot be serialized.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Declares a kind. A kind with the same id is replaced in place.
    pub fn declare_kind(&mut self, kind: KindDecl) {
        match self.kinds.iter_mut().find(|k| k.id == kind.id) {
            Some(existing) => *existing = kind,
            None => self.kinds.push(kind),
        }
    }

    /// Declares a type. A type with the same id is replaced in place.
    pub fn declare_type(&mut self, decl: TypeDecl) {
        match self.types.iter_mut().find(|t| t.id == decl.id) {
            Some(existing) => *existing = decl,
            None => self.types.push(decl),
        }
    }

    /// Looks up a kind by id. Returns `None` if not found.
    #[must_use]
    pub fn find_kind(&self, id: &str) -> Option<&KindDecl> {
        self.kinds.iter().find(|k| k.id == id)
    }

    /// Looks up a type by id. Returns `None` if not found.
    #[must_use]
    pub fn find_type(&self, id: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.id == id)
    }

    /// Returns the number of declared kinds.
    #[must_use]
    pub fn kind_count(&self) -> usize {
        self.kinds.len()
    }

    /// Returns the number of declared types.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
