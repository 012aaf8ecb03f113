//! Rust-typed annotation kinds and subject types.
//!
//! [`AnnotationKind`] and [`Reflect`] are normally derived. A derived
//! [`Reflect`] impl registers the subject's declaration (and the kinds of
//! every attached instance) into a [`Catalog`], after which the ordinary
//! string-keyed resolvers run over it. [`resolve_as`] and
//! [`resolve_slots_as`] wrap that round trip and decode payloads back into
//! the requested Rust type.
//!
//! ```
//! use annoscope::{resolve_slots_as, AnnotationKind, Reflect};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize, AnnotationKind)]
//! struct Label(String);
//!
//! #[derive(Reflect)]
//! struct Pair {
//!     i: i64,
//!     #[annotate(Label("a".into()))]
//!     s: String,
//! }
//!
//! let slots = resolve_slots_as::<Label, Pair>().unwrap();
//! assert_eq!(slots, vec![None, Some(Label("a".into()))]);
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::aggregator::resolve_slots;
use crate::error::{ResolveError, Result};
use crate::model::{Annotation, Catalog, KindDecl};
use crate::resolver::resolve;

/// A Rust type whose values are annotation payloads.
///
/// A kind that extends another converts into it: the derive requires
/// `From<Self>` for every `extends(..)` parent, so an instance of a sub-kind
/// decodes as itself and is then upcast into the requested kind.
pub trait AnnotationKind: Serialize + DeserializeOwned + 'static {
    /// Kind identifier.
    const KIND: &'static str;

    /// Whether the kind is abstract.
    const ABSTRACT: bool = false;

    /// The kind's declaration, listing its direct super-kinds.
    fn declaration() -> KindDecl;

    /// Registers the direct super-kinds (and transitively theirs).
    fn register_supers(catalog: &mut Catalog);

    /// Returns `true` if `target` is this kind or one of its super-kinds.
    fn reaches(target: &str) -> bool {
        target == Self::KIND
    }

    /// Converts `self` into the kind `target`, or `None` if `target` is not
    /// reachable. The box holds the Rust type of `target`.
    fn upcast(self, target: &str) -> Option<Box<dyn Any>> {
        (target == Self::KIND).then(|| Box::new(self) as Box<dyn Any>)
    }

    /// Registers this kind and its super-kinds. Kinds already present are
    /// left untouched, so registration terminates on cyclic hierarchies.
    fn register(catalog: &mut Catalog) {
        catalog.codecs.insert::<Self>();
        if catalog.find_kind(Self::KIND).is_some() {
            return;
        }
        catalog.declare_kind(Self::declaration());
        Self::register_supers(catalog);
    }
}

type Upcast = fn(Value, &str) -> serde_json::Result<Option<Box<dyn Any>>>;

fn upcast_payload<K: AnnotationKind>(
    payload: Value,
    target: &str,
) -> serde_json::Result<Option<Box<dyn Any>>> {
    let value: K = serde_json::from_value(payload)?;
    Ok(value.upcast(target))
}

/// Per-kind payload decoders, keyed by kind id. The first Rust type
/// registered for an id keeps it.
#[derive(Clone, Default)]
pub(crate) struct KindCodecs(BTreeMap<String, Upcast>);

impl KindCodecs {
    fn insert<K: AnnotationKind>(&mut self) {
        self.0
            .entry(K::KIND.to_owned())
            .or_insert(upcast_payload::<K> as Upcast);
    }

    fn get(&self, kind: &str) -> Option<Upcast> {
        self.0.get(kind).copied()
    }
}

impl fmt::Debug for KindCodecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

// Decoders are derived from the kind ids; comparing the ids is enough.
impl PartialEq for KindCodecs {
    fn eq(&self, other: &Self) -> bool {
        self.0.keys().eq(other.0.keys())
    }
}

/// A Rust type that can describe its own declaration.
pub trait Reflect {
    /// Declared type identifier.
    const TYPE_ID: &'static str;

    /// Number of slots: fields of a struct, variants of an enum.
    const SLOT_COUNT: usize;

    /// Registers the type's declaration, its variants' declarations and the
    /// kinds of every attached annotation instance.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Encode`] if an annotation value cannot be
    /// serialized.
    fn register(catalog: &mut Catalog) -> Result<()>;
}

impl Annotation {
    /// Builds an instance from a typed annotation value.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Encode`] if `value` does not serialize to
    /// JSON (for example a map with non-string keys).
    pub fn of<K: AnnotationKind>(value: &K, site: &str) -> Result<Self> {
        let payload = serde_json::to_value(value).map_err(|err| ResolveError::Encode {
            kind: K::KIND.to_owned(),
            site: site.to_owned(),
            message: err.to_string(),
        })?;
        Ok(Annotation::new(K::KIND, payload))
    }
}

impl Catalog {
    /// Builds an instance from `value` and registers its kind.
    ///
    /// # Errors
    ///
    /// As [`Annotation::of`].
    pub fn attach<K: AnnotationKind>(&mut self, value: &K, site: &str) -> Result<Annotation> {
        K::register(self);
        Annotation::of(value, site)
    }

    /// Registers the declarations of `T`.
    ///
    /// # Errors
    ///
    /// As [`Reflect::register`].
    pub fn register<T: Reflect>(&mut self) -> Result<()> {
        T::register(self)
    }

    /// Registers the kind `K` and its super-kinds.
    pub fn register_kind<K: AnnotationKind>(&mut self) {
        K::register(self);
    }
}

/// Builds a catalog holding `A` and everything `T` declares.
fn catalog_for<A: AnnotationKind, T: Reflect>() -> Result<Catalog> {
    let mut catalog = Catalog::new();
    catalog.register_kind::<A>();
    catalog.register::<T>()?;
    Ok(catalog)
}

/// Decodes `annotation` as `A`.
///
/// An instance of another kind registered from Rust is decoded as that kind
/// and upcast. Payloads of kinds without a Rust type (catalogs loaded from
/// JSON) are decoded as `A` directly.
pub(crate) fn decode_annotation<A: AnnotationKind>(
    catalog: &Catalog,
    annotation: &Annotation,
    site: &str,
) -> Result<A> {
    let decode_error = |message: String| ResolveError::Decode {
        kind: annotation.kind.clone(),
        site: site.to_owned(),
        target: std::any::type_name::<A>().to_owned(),
        message,
    };

    if annotation.kind != A::KIND {
        if let Some(upcast) = catalog.codecs.get(&annotation.kind) {
            let upcast = upcast(annotation.value.clone(), A::KIND)
                .map_err(|err| decode_error(err.to_string()))?
                .ok_or_else(|| {
                    decode_error(format!(
                        "`{}` does not convert into `{}`",
                        annotation.kind,
                        A::KIND
                    ))
                })?;
            return upcast.downcast::<A>().map(|value| *value).map_err(|_| {
                decode_error(format!("kind `{}` is bound to another Rust type", A::KIND))
            });
        }
    }
    serde_json::from_value(annotation.value.clone()).map_err(|err| decode_error(err.to_string()))
}

/// Resolves the `A` annotation attached to `T` itself.
///
/// An instance of a sub-kind of `A` is decoded as its own kind and
/// converted into `A`.
///
/// # Errors
///
/// As [`resolve`], plus [`ResolveError::Decode`] if the payload does not
/// deserialize and [`ResolveError::Encode`] from registration.
pub fn resolve_as<A: AnnotationKind, T: Reflect>() -> Result<A> {
    let catalog = catalog_for::<A, T>()?;
    let annotation = resolve(&catalog, A::KIND, T::TYPE_ID)?;
    decode_annotation(&catalog, annotation, T::TYPE_ID)
}

/// Resolves the `A` annotation on every slot of `T`, positionally.
///
/// The returned vector always has [`Reflect::SLOT_COUNT`] entries.
///
/// # Errors
///
/// As [`resolve_slots`], plus [`ResolveError::Decode`] and
/// [`ResolveError::Encode`].
pub fn resolve_slots_as<A: AnnotationKind, T: Reflect>() -> Result<Vec<Option<A>>> {
    let catalog = catalog_for::<A, T>()?;
    resolve_slots(&catalog, A::KIND, T::TYPE_ID)?.decode::<A>(&catalog)
}
