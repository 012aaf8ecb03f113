//! Catalog validation.
//!
//! Structural checks over a declaration graph, run before trusting it for
//! resolution:
//! - type and kind ids are unique
//! - `extends` targets are declared kinds
//! - the kind hierarchy is acyclic
//! - attached instances reference declared, concrete kinds
//! - sum variants reference declared types
//! - secondary parameter lists (ignored by slot resolution) are flagged

use std::collections::{HashMap, HashSet};

use crate::model::{Annotation, Catalog, Shape};

/// Severity level of a check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The check passed.
    Pass,
    /// The check identified a warning (non-blocking).
    Warning,
    /// The check failed.
    Failure,
}

/// A single check result.
#[derive(Debug, Clone)]
pub struct Check {
    /// Short identifier of the check that produced this result.
    pub validator: String,
    /// Human-readable message describing the outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Offending declarations, one per line.
    pub details: Vec<String>,
}

impl Check {
    /// Creates a passing result.
    pub fn pass(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity: Severity::Pass,
            details: Vec::new(),
        }
    }

    /// Creates a failure result with detail lines.
    pub fn fail_with_details(
        validator: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity: Severity::Failure,
            details,
        }
    }

    /// Creates a warning result with detail lines.
    pub fn warn_with_details(
        validator: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity: Severity::Warning,
            details,
        }
    }

    /// Returns true if this result represents a failure.
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Aggregated results of every check.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Individual results in check order.
    pub results: Vec<Check>,
}

impl ValidationReport {
    /// Appends a result.
    pub fn push(&mut self, result: Check) {
        self.results.push(result);
    }

    /// Returns the count of failed checks.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Returns the count of warnings.
    pub fn warning_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Warning)
            .count()
    }

    /// Returns true if no check failed.
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    /// Records a pass, or a failure carrying `violations`.
    fn record(&mut self, validator: &str, ok: &str, failed: &str, violations: Vec<String>) {
        if violations.is_empty() {
            self.push(Check::pass(validator, ok));
        } else {
            self.push(Check::fail_with_details(validator, failed, violations));
        }
    }
}

/// Runs every check against `catalog`.
#[must_use]
pub fn validate(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_unique_ids(catalog, &mut report);
    check_kind_references(catalog, &mut report);
    check_kind_cycles(catalog, &mut report);
    check_attached_instances(catalog, &mut report);
    check_variants(catalog, &mut report);
    check_secondary_lists(catalog, &mut report);

    report
}

fn check_unique_ids(catalog: &Catalog, report: &mut ValidationReport) {
    let mut violations = Vec::new();
    let mut kinds = HashSet::new();
    for kind in &catalog.kinds {
        if !kinds.insert(kind.id.as_str()) {
            violations.push(format!("Duplicate kind id: {}", kind.id));
        }
    }
    let mut types = HashSet::new();
    for decl in &catalog.types {
        if !types.insert(decl.id.as_str()) {
            violations.push(format!("Duplicate type id: {}", decl.id));
        }
    }
    report.record(
        "catalog/ids",
        "All kind and type ids are unique",
        "Duplicate ids detected",
        violations,
    );
}

fn check_kind_references(catalog: &Catalog, report: &mut ValidationReport) {
    let mut violations = Vec::new();
    for kind in &catalog.kinds {
        for parent in &kind.extends {
            if catalog.find_kind(parent).is_none() {
                violations.push(format!("Kind {} extends unknown kind {}", kind.id, parent));
            }
        }
    }
    report.record(
        "catalog/kinds",
        "All super-kinds are declared",
        "Unknown super-kinds referenced",
        violations,
    );
}

fn check_kind_cycles(catalog: &Catalog, report: &mut ValidationReport) {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    fn visit<'a>(
        id: &'a str,
        edges: &HashMap<&'a str, Vec<&'a str>>,
        marks: &mut HashMap<&'a str, Mark>,
        path: &mut Vec<&'a str>,
        cycles: &mut Vec<String>,
    ) {
        match marks.get(id) {
            Some(Mark::Done) => return,
            Some(Mark::Visiting) => {
                let start = path.iter().position(|p| *p == id).unwrap_or(0);
                let mut cycle: Vec<&str> = path[start..].to_vec();
                cycle.push(id);
                cycles.push(cycle.join(" -> "));
                return;
            }
            None => {}
        }
        marks.insert(id, Mark::Visiting);
        path.push(id);
        if let Some(parents) = edges.get(id) {
            for &parent in parents {
                visit(parent, edges, marks, path, cycles);
            }
        }
        path.pop();
        marks.insert(id, Mark::Done);
    }

    let edges: HashMap<&str, Vec<&str>> = catalog
        .kinds
        .iter()
        .map(|k| (k.id.as_str(), k.extends.iter().map(String::as_str).collect()))
        .collect();
    let mut marks = HashMap::new();
    let mut cycles = Vec::new();
    for kind in &catalog.kinds {
        visit(&kind.id, &edges, &mut marks, &mut Vec::new(), &mut cycles);
    }
    report.record(
        "catalog/kind-cycles",
        "Kind hierarchy is acyclic",
        "Cycles in the kind hierarchy",
        cycles,
    );
}

fn check_attached_instances(catalog: &Catalog, report: &mut ValidationReport) {
    let mut violations = Vec::new();
    let mut check = |site: String, annotations: &[Annotation]| {
        for instance in annotations {
            match catalog.find_kind(&instance.kind) {
                None => violations.push(format!(
                    "{site} carries an instance of unknown kind {}",
                    instance.kind
                )),
                Some(kind) if kind.is_abstract => violations.push(format!(
                    "{site} carries an instance of abstract kind {}",
                    instance.kind
                )),
                Some(_) => {}
            }
        }
    };
    for decl in &catalog.types {
        check(decl.id.clone(), &decl.annotations);
        if let Shape::Product { slots, secondary } = &decl.shape {
            for slot in slots.iter().chain(secondary.iter().flatten()) {
                check(format!("{}.{}", decl.id, slot.name), &slot.annotations);
            }
        }
    }
    report.record(
        "catalog/instances",
        "All attached instances have declared concrete kinds",
        "Attached instances with unusable kinds",
        violations,
    );
}

fn check_variants(catalog: &Catalog, report: &mut ValidationReport) {
    let mut violations = Vec::new();
    for decl in &catalog.types {
        if let Shape::Sum {
            variants: Some(variants),
        } = &decl.shape
        {
            for variant in variants {
                if catalog.find_type(variant).is_none() {
                    violations.push(format!(
                        "Sum type {} lists undeclared variant {}",
                        decl.id, variant
                    ));
                }
            }
        }
    }
    report.record(
        "catalog/variants",
        "All sum variants are declared",
        "Undeclared sum variants",
        violations,
    );
}

fn check_secondary_lists(catalog: &Catalog, report: &mut ValidationReport) {
    let flagged: Vec<String> = catalog
        .types
        .iter()
        .filter_map(|decl| match &decl.shape {
            Shape::Product { secondary, .. } if !secondary.is_empty() => Some(format!(
                "{} has {} secondary parameter list(s)",
                decl.id,
                secondary.len()
            )),
            _ => None,
        })
        .collect();
    if flagged.is_empty() {
        report.push(Check::pass(
            "catalog/products",
            "No product type declares secondary parameter lists",
        ));
    } else {
        report.push(Check::warn_with_details(
            "catalog/products",
            "Secondary parameter lists are ignored by slot resolution",
            flagged,
        ));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{KindDecl, SlotDecl, TypeDecl};

    #[test]
    fn clean_catalog_passes() {
        let mut catalog = Catalog::new();
        catalog.declare_kind(KindDecl::open("Tag"));
        catalog.declare_kind(KindDecl::concrete("Label").extending("Tag"));
        catalog.declare_type(TypeDecl::product(
            "Pair",
            vec![SlotDecl::new("s", "String")
                .with_annotation(Annotation::new("Label", json!("a")))],
        ));
        let report = validate(&catalog);
        assert!(report.all_passed());
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn broken_catalog_fails() {
        let mut catalog = Catalog::new();
        catalog.kinds.push(KindDecl::concrete("A").extending("B"));
        catalog.kinds.push(KindDecl::concrete("B").extending("A"));
        catalog.kinds.push(KindDecl::concrete("C").extending("Missing"));
        catalog.kinds.push(KindDecl::open("Tag"));
        catalog.types.push(TypeDecl::sum("S", ["Nope"]));
        catalog
            .types
            .push(TypeDecl::opaque("T").with_annotation(Annotation::new("Tag", json!(null))));
        catalog.types.push(TypeDecl::opaque("T"));

        let report = validate(&catalog);
        let failed: Vec<&str> = report
            .results
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| r.message.as_str())
            .collect();
        assert_eq!(
            failed,
            vec![
                "Duplicate ids detected",
                "Unknown super-kinds referenced",
                "Cycles in the kind hierarchy",
                "Attached instances with unusable kinds",
                "Undeclared sum variants",
            ]
        );

        let validators: Vec<&str> = report.results.iter().map(|r| r.validator.as_str()).collect();
        assert_eq!(
            validators,
            vec![
                "catalog/ids",
                "catalog/kinds",
                "catalog/kind-cycles",
                "catalog/instances",
                "catalog/variants",
                "catalog/products",
            ]
        );
    }

    #[test]
    fn secondary_lists_warn() {
        let mut catalog = Catalog::new();
        catalog.declare_type(
            TypeDecl::product("Curried", vec![SlotDecl::new("a", "Int")])
                .with_secondary_list(vec![SlotDecl::new("b", "Int")]),
        );
        let report = validate(&catalog);
        assert!(report.all_passed());
        assert_eq!(report.warning_count(), 1);
    }
}
