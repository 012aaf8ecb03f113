//! JSON rendering.
//!
//! Produces `serde_json::Value` documents for result tuples, resolution
//! errors, validation reports and catalog summaries. The values can be
//! pretty-printed with [`serde_json::to_string_pretty`].

use serde_json::{json, Value};

use crate::error::ResolveError;
use crate::mirror::{Mirror, StructuralMirror};
use crate::model::{Annotation, Catalog};
use crate::tuple::ResultTuple;
use crate::validate::{Severity, ValidationReport};

/// Renders a slot resolution as `{ kind, subject, shape, arity, slots }`.
#[must_use]
pub fn tuple_to_json(tuple: &ResultTuple) -> Value {
    let slots: Vec<Value> = tuple
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry.result.annotation() {
            Some(annotation) => json!({
                "index": index,
                "label": entry.label,
                "present": true,
                "annotation": annotation_to_json(annotation),
            }),
            None => json!({
                "index": index,
                "label": entry.label,
                "present": false,
            }),
        })
        .collect();
    json!({
        "kind": tuple.kind(),
        "subject": tuple.subject(),
        "shape": tuple.shape(),
        "arity": tuple.arity(),
        "slots": slots,
    })
}

/// Renders one attached instance as `{ kind, value }`.
#[must_use]
pub fn annotation_to_json(annotation: &Annotation) -> Value {
    json!({
        "kind": annotation.kind,
        "value": annotation.value,
    })
}

/// Renders an error as `{ error: code, message }`.
#[must_use]
pub fn error_to_json(err: &ResolveError) -> Value {
    json!({
        "error": err.code(),
        "message": err.to_string(),
    })
}

/// Renders a validation report as `{ passed, failures, warnings, checks }`.
#[must_use]
pub fn report_to_json(report: &ValidationReport) -> Value {
    let checks: Vec<Value> = report
        .results
        .iter()
        .map(|check| {
            let severity = match check.severity {
                Severity::Pass => "pass",
                Severity::Warning => "warning",
                Severity::Failure => "failure",
            };
            json!({
                "validator": check.validator,
                "severity": severity,
                "message": check.message,
                "details": check.details,
            })
        })
        .collect();
    json!({
        "passed": report.all_passed(),
        "failures": report.failure_count(),
        "warnings": report.warning_count(),
        "checks": checks,
    })
}

/// Summarizes a catalog: every kind with its ancestry, every type with the
/// shape its mirror reports.
#[must_use]
pub fn catalog_summary(catalog: &Catalog) -> Value {
    use crate::kinds::KindHierarchy;

    let kinds: Vec<Value> = catalog
        .kinds
        .iter()
        .map(|kind| {
            json!({
                "id": kind.id,
                "abstract": kind.is_abstract,
                "ancestors": catalog.ancestors(&kind.id),
            })
        })
        .collect();
    let types: Vec<Value> = catalog
        .types
        .iter()
        .map(|decl| {
            let (shape, slots) = match catalog.mirror(decl) {
                Mirror::NotStructural => ("opaque", Value::Null),
                Mirror::Product { slots } => (
                    "product",
                    json!(slots.iter().map(|s| s.name.as_str()).collect::<Vec<_>>()),
                ),
                Mirror::Sum {
                    variants: Some(variants),
                } => (
                    "sum",
                    json!(variants.iter().map(|v| v.id.as_str()).collect::<Vec<_>>()),
                ),
                Mirror::Sum { variants: None } => ("sum", Value::Null),
            };
            json!({
                "id": decl.id,
                "shape": shape,
                "slots": slots,
                "annotations": decl.annotations.len(),
            })
        })
        .collect();
    json!({
        "kinds": kinds,
        "types": types,
    })
}
