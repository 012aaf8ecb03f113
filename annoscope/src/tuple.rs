//! Per-slot resolution results.

use serde::Serialize;
use serde_json::Value;

use crate::error::{ResolveError, Result};
use crate::model::{Annotation, Catalog};
use crate::typed::{decode_annotation, AnnotationKind};

/// Outcome for one slot: absent, or the matching instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "annotation", rename_all = "snake_case")]
pub enum SlotResult {
    /// No conforming instance is attached to the slot.
    Absent,
    /// The conforming instance attached to the slot.
    Present(Annotation),
}

impl SlotResult {
    /// Returns `true` for [`SlotResult::Present`].
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, SlotResult::Present(_))
    }

    /// The matched instance, if any.
    #[must_use]
    pub fn annotation(&self) -> Option<&Annotation> {
        match self {
            SlotResult::Present(annotation) => Some(annotation),
            SlotResult::Absent => None,
        }
    }
}

impl From<Option<&Annotation>> for SlotResult {
    fn from(found: Option<&Annotation>) -> Self {
        match found {
            Some(annotation) => SlotResult::Present(annotation.clone()),
            None => SlotResult::Absent,
        }
    }
}

/// Which decomposition produced a tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TupleShape {
    /// One entry per primary constructor parameter.
    Product,
    /// One entry per variant.
    Sum,
}

/// One positioned entry of a [`ResultTuple`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotEntry {
    /// Parameter name or variant id.
    pub label: String,
    /// Resolution outcome for this slot.
    pub result: SlotResult,
}

/// Slot results aligned positionally with the subject's slots.
///
/// The length is fixed when the tuple is built and equals the subject's slot
/// or variant count; there is no way to add or remove entries afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTuple {
    kind: String,
    subject: String,
    shape: TupleShape,
    entries: Vec<SlotEntry>,
}

impl ResultTuple {
    pub(crate) fn new(
        kind: impl Into<String>,
        subject: impl Into<String>,
        shape: TupleShape,
        entries: Vec<SlotEntry>,
    ) -> Self {
        Self {
            kind: kind.into(),
            subject: subject.into(),
            shape,
            entries,
        }
    }

    /// Requested kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Subject type.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Product or sum.
    #[must_use]
    pub fn shape(&self) -> TupleShape {
        self.shape
    }

    /// Number of slots.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.entries.len()
    }

    /// Result at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SlotResult> {
        self.entries.get(index).map(|entry| &entry.result)
    }

    /// All entries in slot order.
    #[must_use]
    pub fn entries(&self) -> &[SlotEntry] {
        &self.entries
    }

    /// Iterates over the results in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &SlotResult> {
        self.entries.iter().map(|entry| &entry.result)
    }

    /// `true` at each position whose slot carries a conforming instance.
    #[must_use]
    pub fn present_mask(&self) -> Vec<bool> {
        self.iter().map(SlotResult::is_present).collect()
    }

    /// Indices of the present slots, ascending.
    #[must_use]
    pub fn present_positions(&self) -> Vec<usize> {
        self.iter()
            .enumerate()
            .filter_map(|(i, result)| result.is_present().then_some(i))
            .collect()
    }

    /// Payloads of the matched instances, `None` for absent slots.
    #[must_use]
    pub fn values(&self) -> Vec<Option<&Value>> {
        self.iter()
            .map(|result| result.annotation().map(|a| &a.value))
            .collect()
    }

    /// Decodes every present payload into `A`. Instances of sub-kinds that
    /// `catalog` knows as Rust types are decoded as their own kind and
    /// converted into `A`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Decode`] for the first payload that does not
    /// deserialize or convert into `A`.
    pub fn decode<A: AnnotationKind>(&self, catalog: &Catalog) -> Result<Vec<Option<A>>> {
        self.entries
            .iter()
            .map(|entry| match &entry.result {
                SlotResult::Absent => Ok(None),
                SlotResult::Present(annotation) => {
                    let site = match self.shape {
                        TupleShape::Product => format!("{}.{}", self.subject, entry.label),
                        TupleShape::Sum => entry.label.clone(),
                    };
                    decode_annotation::<A>(catalog, annotation, &site).map(Some)
                }
            })
            .collect::<std::result::Result<Vec<_>, ResolveError>>()
    }
}
