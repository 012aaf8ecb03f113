//! Single-site annotation resolution.
//!
//! [`match_site`] is the matching primitive shared by [`resolve`] and the
//! slot aggregator: walk the instances attached to one declaration site in
//! declaration order and pick the one whose concrete kind conforms to the
//! requested kind.

use tracing::debug;

use crate::error::{ResolveError, Result};
use crate::mirror::{DeclarationSite, Introspect};
use crate::model::{Annotation, KindDecl};

/// What to do when several attached instances conform to the requested kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// The first conforming instance in declaration order wins.
    #[default]
    FirstDeclared,
    /// More than one conforming instance is an [`ResolveError::Ambiguous`] error.
    RejectAmbiguous,
}

/// Looks up the requested kind and rejects abstract kinds.
///
/// Runs before the subject is looked at, so an abstract kind fails the same
/// way for every subject.
pub(crate) fn requested_kind<'a, E: Introspect + ?Sized>(
    env: &'a E,
    kind: &str,
    subject: &str,
) -> Result<&'a KindDecl> {
    let decl = env.kind(kind).ok_or_else(|| ResolveError::UnknownKind {
        kind: kind.to_owned(),
    })?;
    if decl.is_abstract {
        return Err(ResolveError::InvalidAnnotationKind {
            kind: kind.to_owned(),
            subject: subject.to_owned(),
        });
    }
    Ok(decl)
}

/// Finds the instance attached to `site` that conforms to `kind`.
///
/// Returns `Ok(None)` when nothing conforms.
///
/// # Errors
///
/// Returns [`ResolveError::Ambiguous`] under [`MatchPolicy::RejectAmbiguous`]
/// when more than one instance conforms.
pub fn match_site<'a, E: Introspect + ?Sized>(
    env: &'a E,
    kind: &KindDecl,
    site: &DeclarationSite<'a>,
    policy: MatchPolicy,
) -> Result<Option<&'a Annotation>> {
    let mut matching = env
        .annotations(site)
        .iter()
        .filter(|instance| env.conforms(&instance.kind, &kind.id));

    let first = matching.next();
    if policy == MatchPolicy::RejectAmbiguous && first.is_some() {
        let extra = matching.count();
        if extra > 0 {
            return Err(ResolveError::Ambiguous {
                kind: kind.id.clone(),
                site: site.to_string(),
                count: extra + 1,
            });
        }
    }
    Ok(first)
}

/// Resolves the annotation of kind `kind` attached directly to `subject`.
///
/// # Errors
///
/// - [`ResolveError::UnknownKind`] / [`ResolveError::UnknownType`] for
///   undeclared ids.
/// - [`ResolveError::InvalidAnnotationKind`] if `kind` is abstract.
/// - [`ResolveError::NotFound`] if no attached instance conforms.
pub fn resolve<'a, E: Introspect + ?Sized>(
    env: &'a E,
    kind: &str,
    subject: &str,
) -> Result<&'a Annotation> {
    resolve_with(env, kind, subject, MatchPolicy::default())
}

/// [`resolve`] with an explicit [`MatchPolicy`].
///
/// # Errors
///
/// As [`resolve`], plus [`ResolveError::Ambiguous`] under
/// [`MatchPolicy::RejectAmbiguous`].
pub fn resolve_with<'a, E: Introspect + ?Sized>(
    env: &'a E,
    kind: &str,
    subject: &str,
    policy: MatchPolicy,
) -> Result<&'a Annotation> {
    debug!(kind, subject, ?policy, "resolving type annotation");
    let outcome = resolve_inner(env, kind, subject, policy);
    if let Err(err) = &outcome {
        debug!(kind, subject, code = err.code(), "{err}");
    }
    outcome
}

fn resolve_inner<'a, E: Introspect + ?Sized>(
    env: &'a E,
    kind: &str,
    subject: &str,
    policy: MatchPolicy,
) -> Result<&'a Annotation> {
    let requested = requested_kind(env, kind, subject)?;
    let decl = env
        .declaration(subject)
        .ok_or_else(|| ResolveError::UnknownType {
            subject: subject.to_owned(),
        })?;
    let site = DeclarationSite::Type(decl);
    match_site(env, requested, &site, policy)?.ok_or_else(|| ResolveError::NotFound {
        kind: kind.to_owned(),
        site: site.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{Catalog, TypeDecl};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.declare_kind(KindDecl::open("Tag"));
        catalog.declare_kind(KindDecl::concrete("Label").extending("Tag"));
        catalog.declare_kind(KindDecl::concrete("DisplayLabel").extending("Label"));
        catalog.declare_kind(KindDecl::concrete("Note"));
        catalog.declare_type(
            TypeDecl::opaque("Titled")
                .with_annotation(Annotation::new("Note", json!("n")))
                .with_annotation(Annotation::new("DisplayLabel", json!("d")))
                .with_annotation(Annotation::new("Label", json!("l"))),
        );
        catalog.declare_type(TypeDecl::opaque("Plain"));
        catalog
    }

    #[test]
    fn first_conforming_instance_wins() {
        let catalog = catalog();
        let found = resolve(&catalog, "Label", "Titled").unwrap();
        assert_eq!(found, &Annotation::new("DisplayLabel", json!("d")));
    }

    #[test]
    fn exact_kind_request_skips_supertype_instances() {
        let catalog = catalog();
        let found = resolve(&catalog, "DisplayLabel", "Titled").unwrap();
        assert_eq!(found.value, json!("d"));
        let found = resolve(&catalog, "Note", "Titled").unwrap();
        assert_eq!(found.value, json!("n"));
    }

    #[test]
    fn missing_annotation_is_not_found() {
        let catalog = catalog();
        assert_eq!(
            resolve(&catalog, "Label", "Plain"),
            Err(ResolveError::NotFound {
                kind: "Label".into(),
                site: "Plain".into(),
            })
        );
    }

    #[test]
    fn abstract_kind_rejected_before_subject_lookup() {
        let catalog = catalog();
        assert_eq!(
            resolve(&catalog, "Tag", "Nowhere"),
            Err(ResolveError::InvalidAnnotationKind {
                kind: "Tag".into(),
                subject: "Nowhere".into(),
            })
        );
    }

    #[test]
    fn undeclared_ids() {
        let catalog = catalog();
        assert!(matches!(
            resolve(&catalog, "Colour", "Titled"),
            Err(ResolveError::UnknownKind { .. })
        ));
        assert!(matches!(
            resolve(&catalog, "Label", "Nowhere"),
            Err(ResolveError::UnknownType { .. })
        ));
    }

    #[test]
    fn reject_ambiguous_policy() {
        let catalog = catalog();
        assert_eq!(
            resolve_with(&catalog, "Label", "Titled", MatchPolicy::RejectAmbiguous),
            Err(ResolveError::Ambiguous {
                kind: "Label".into(),
                site: "Titled".into(),
                count: 2,
            })
        );
        let found =
            resolve_with(&catalog, "Note", "Titled", MatchPolicy::RejectAmbiguous).unwrap();
        assert_eq!(found.value, json!("n"));
    }
}
