//! Slot annotation aggregation.
//!
//! Branches once on the mirror's classification of the subject, runs the
//! shared [`match_site`] primitive against every slot or variant in order,
//! and assembles the positional [`ResultTuple`]. Slots are matched
//! independently of one another. Any error aborts the whole resolution; a
//! partially filled tuple is never returned.

use tracing::debug;

use crate::error::{ResolveError, Result};
use crate::mirror::{DeclarationSite, Introspect, Mirror};
use crate::resolver::{match_site, requested_kind, MatchPolicy};
use crate::tuple::{ResultTuple, SlotEntry, SlotResult, TupleShape};

/// Resolves, for every slot of `subject`, the annotation of kind `kind`
/// attached to that slot.
///
/// Product-shaped subjects yield one entry per primary parameter; sum-shaped
/// subjects yield one entry per variant, matched against the variant's own
/// declaration.
///
/// # Errors
///
/// - [`ResolveError::UnknownKind`] / [`ResolveError::UnknownType`] for
///   undeclared ids.
/// - [`ResolveError::InvalidAnnotationKind`] if `kind` is abstract.
/// - [`ResolveError::NotInspectable`] if `subject` is neither product- nor
///   sum-shaped, or its variants cannot be enumerated.
pub fn resolve_slots<E: Introspect + ?Sized>(
    env: &E,
    kind: &str,
    subject: &str,
) -> Result<ResultTuple> {
    resolve_slots_with(env, kind, subject, MatchPolicy::default())
}

/// [`resolve_slots`] with an explicit [`MatchPolicy`].
///
/// # Errors
///
/// As [`resolve_slots`], plus [`ResolveError::Ambiguous`] under
/// [`MatchPolicy::RejectAmbiguous`].
pub fn resolve_slots_with<E: Introspect + ?Sized>(
    env: &E,
    kind: &str,
    subject: &str,
    policy: MatchPolicy,
) -> Result<ResultTuple> {
    debug!(kind, subject, ?policy, "resolving slot annotations");
    match aggregate(env, kind, subject, policy) {
        Ok(tuple) => {
            debug!(
                kind,
                subject,
                arity = tuple.arity(),
                present = tuple.present_positions().len(),
                "slot annotations resolved"
            );
            Ok(tuple)
        }
        Err(err) => {
            debug!(kind, subject, code = err.code(), "{err}");
            Err(err)
        }
    }
}

fn aggregate<E: Introspect + ?Sized>(
    env: &E,
    kind: &str,
    subject: &str,
    policy: MatchPolicy,
) -> Result<ResultTuple> {
    let requested = requested_kind(env, kind, subject)?;
    let decl = env
        .declaration(subject)
        .ok_or_else(|| ResolveError::UnknownType {
            subject: subject.to_owned(),
        })?;

    let not_inspectable = |reason: &str| ResolveError::NotInspectable {
        kind: kind.to_owned(),
        subject: subject.to_owned(),
        reason: reason.to_owned(),
    };

    let (shape, entries) = match env.mirror(decl) {
        Mirror::NotStructural => {
            return Err(not_inspectable("neither product- nor sum-shaped"));
        }
        Mirror::Sum { variants: None } => {
            return Err(not_inspectable("variants of the sum type cannot be enumerated"));
        }
        Mirror::Product { slots } => {
            let mut entries = Vec::with_capacity(slots.len());
            for slot in slots {
                let site = DeclarationSite::Slot { owner: decl, slot };
                entries.push(SlotEntry {
                    label: slot.name.clone(),
                    result: SlotResult::from(match_site(env, requested, &site, policy)?),
                });
            }
            (TupleShape::Product, entries)
        }
        Mirror::Sum {
            variants: Some(variants),
        } => {
            let mut entries = Vec::with_capacity(variants.len());
            for variant in variants {
                let site = DeclarationSite::Variant {
                    owner: decl,
                    variant,
                };
                entries.push(SlotEntry {
                    label: variant.id.clone(),
                    result: SlotResult::from(match_site(env, requested, &site, policy)?),
                });
            }
            (TupleShape::Sum, entries)
        }
    };

    Ok(ResultTuple::new(kind, subject, shape, entries))
}
