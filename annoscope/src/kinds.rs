//! Annotation kind hierarchy.
//!
//! The subtype relation between kinds is the reflexive, transitive closure of
//! [`KindDecl::extends`]. Walks are breadth-first and remember visited kinds,
//! so a malformed catalog with a cycle still terminates.

use std::collections::{HashSet, VecDeque};

use crate::model::{Catalog, KindDecl};

/// Read access to annotation kind declarations.
pub trait KindHierarchy {
    /// Looks up a kind by id.
    fn kind(&self, id: &str) -> Option<&KindDecl>;

    /// Returns `true` if an instance of `instance_kind` satisfies a request
    /// for `requested`: the kinds are equal, or `requested` is reachable
    /// through `extends` edges.
    fn conforms(&self, instance_kind: &str, requested: &str) -> bool {
        if instance_kind == requested {
            return true;
        }
        self.ancestors(instance_kind)
            .iter()
            .any(|ancestor| ancestor == requested)
    }

    /// All strict super-kinds of `id`, nearest first. Undeclared ids along
    /// the way are included but not expanded.
    fn ancestors(&self, id: &str) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        seen.insert(id.to_owned());
        queue.push_back(id.to_owned());

        while let Some(current) = queue.pop_front() {
            let Some(decl) = self.kind(&current) else {
                continue;
            };
            for parent in &decl.extends {
                if seen.insert(parent.clone()) {
                    order.push(parent.clone());
                    queue.push_back(parent.clone());
                }
            }
        }
        order
    }
}

impl KindHierarchy for Catalog {
    fn kind(&self, id: &str) -> Option<&KindDecl> {
        self.find_kind(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.declare_kind(KindDecl::open("Tag"));
        catalog.declare_kind(KindDecl::concrete("Label").extending("Tag"));
        catalog.declare_kind(KindDecl::concrete("DisplayLabel").extending("Label"));
        catalog.declare_kind(KindDecl::concrete("Note"));
        catalog
    }

    #[test]
    fn conformance_is_reflexive_and_transitive() {
        let catalog = hierarchy();
        assert!(catalog.conforms("Label", "Label"));
        assert!(catalog.conforms("DisplayLabel", "Label"));
        assert!(catalog.conforms("DisplayLabel", "Tag"));
        assert!(!catalog.conforms("Label", "DisplayLabel"));
        assert!(!catalog.conforms("Note", "Label"));
    }

    #[test]
    fn ancestors_nearest_first() {
        let catalog = hierarchy();
        assert_eq!(catalog.ancestors("DisplayLabel"), vec!["Label", "Tag"]);
        assert!(catalog.ancestors("Note").is_empty());
    }

    #[test]
    fn cyclic_hierarchy_terminates() {
        let mut catalog = Catalog::new();
        catalog.declare_kind(KindDecl::concrete("A").extending("B"));
        catalog.declare_kind(KindDecl::concrete("B").extending("A"));
        assert!(catalog.conforms("A", "B"));
        assert!(!catalog.conforms("A", "C"));
        assert_eq!(catalog.ancestors("A"), vec!["B"]);
    }
}
