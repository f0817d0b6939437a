//! Dependency tree representation and the hoisting optimizer.
//!
//! The tree built by the resolver nests every dependency under its parent,
//! which is correct but wasteful: the same package can appear many times.
//! [`optimize`] is a pure, post-order second pass that hoists sub-dependencies
//! upward where no name collision prevents it and drops copies that become
//! redundant, shrinking the materialized footprint.
//!
//! Hoisting never changes *which* version a package observes, only *where*
//! the copy physically lives: after optimization, resolving any name from any
//! node by walking outward through ancestors (nearest declaration wins)
//! yields the same pinned reference as in the unoptimized tree.

use crate::reference::PinnedReference;

/// One node of a dependency tree.
///
/// The tree is a strict tree: each node exclusively owns its children, and
/// there are no back-edges. The root node represents the project itself and
/// carries no reference, since it is never installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    /// Package name.
    pub name: String,
    /// Pinned reference; `None` only for the synthetic root.
    pub reference: Option<PinnedReference>,
    /// Resolved direct dependencies, in declaration order.
    pub dependencies: Vec<DependencyNode>,
}

impl DependencyNode {
    /// A resolved package node.
    pub fn new(
        name: impl Into<String>,
        reference: PinnedReference,
        dependencies: Vec<DependencyNode>,
    ) -> Self {
        Self {
            name: name.into(),
            reference: Some(reference),
            dependencies,
        }
    }

    /// The synthetic root node for the project being installed.
    pub fn root(name: impl Into<String>, dependencies: Vec<DependencyNode>) -> Self {
        Self {
            name: name.into(),
            reference: None,
            dependencies,
        }
    }

    /// Number of installable packages in this subtree, excluding the node
    /// itself when it is the synthetic root.
    pub fn package_count(&self) -> u64 {
        let own = u64::from(self.reference.is_some());
        own + self
            .dependencies
            .iter()
            .map(DependencyNode::package_count)
            .sum::<u64>()
    }
}

/// Optimize a dependency tree by hoisting and deduplication.
///
/// Pure and idempotent: optimizing an already-optimized tree returns it
/// unchanged. For each node, after its children are optimized, each
/// grandchild dependency `d` under child `c` is handled by one of three
/// rules:
///
/// - **adopt**: no dependency named `d` exists at this node, so `d` moves up
///   and becomes a sibling of `c`;
/// - **drop**: this node already has `d`'s name at an equal reference, so
///   `c`'s nested copy is redundant (lookups resolve outward to the hoisted
///   copy once installed);
/// - **keep**: the name exists here with a *different* reference, so `c`
///   keeps its own private nested copy.
pub fn optimize(mut root: DependencyNode) -> DependencyNode {
    hoist(&mut root);
    root
}

fn hoist(node: &mut DependencyNode) {
    for child in &mut node.dependencies {
        hoist(child);
    }

    // Iterate a snapshot of the original children: nodes adopted during this
    // pass are appended after them and not re-examined at this level. Later
    // children do see earlier adoptions, so equal copies collapse into one.
    let snapshot_len = node.dependencies.len();
    let mut adopted: Vec<DependencyNode> = Vec::new();

    for i in 0..snapshot_len {
        let grandchildren = std::mem::take(&mut node.dependencies[i].dependencies);
        let mut kept = Vec::new();

        for dep in grandchildren {
            let existing = node
                .dependencies
                .iter()
                .chain(adopted.iter())
                .find(|sibling| sibling.name == dep.name);

            match existing {
                None => adopted.push(dep),
                Some(sibling) if sibling.reference == dep.reference => {} // drop
                Some(_) => kept.push(dep),
            }
        }

        node.dependencies[i].dependencies = kept;
    }

    node.dependencies.extend(adopted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    fn exact(major: u64, minor: u64) -> PinnedReference {
        PinnedReference::Exact(Version::new(major, minor, 0))
    }

    fn leaf(name: &str, reference: PinnedReference) -> DependencyNode {
        DependencyNode::new(name, reference, Vec::new())
    }

    /// Resolve `name` as seen from the node at `path`, walking outward.
    fn visible_reference<'a>(
        root: &'a DependencyNode,
        path: &[&str],
        name: &str,
    ) -> Option<&'a PinnedReference> {
        let mut chain = vec![root];
        for step in path {
            let next = chain
                .last()
                .unwrap()
                .dependencies
                .iter()
                .find(|n| n.name == *step)
                .expect("path must exist");
            chain.push(next);
        }
        for node in chain.iter().rev() {
            if let Some(found) = node.dependencies.iter().find(|n| n.name == name) {
                return found.reference.as_ref();
            }
        }
        None
    }

    #[test]
    fn test_grandchild_is_adopted_by_grandparent() {
        let tree = DependencyNode::root(
            "app",
            vec![DependencyNode::new(
                "a",
                exact(1, 1),
                vec![leaf("b", exact(1, 0))],
            )],
        );

        let optimized = optimize(tree);

        let names: Vec<&str> =
            optimized.dependencies.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(optimized.dependencies[0].dependencies.is_empty());
    }

    #[test]
    fn test_colliding_reference_stays_nested() {
        let tree = DependencyNode::root(
            "app",
            vec![
                leaf("b", exact(2, 0)),
                DependencyNode::new("a", exact(1, 0), vec![leaf("b", exact(1, 0))]),
            ],
        );

        let optimized = optimize(tree);

        // b@2.0.0 stays at the root, a keeps its private b@1.0.0
        assert_eq!(optimized.dependencies.len(), 2);
        let a = optimized.dependencies.iter().find(|n| n.name == "a").unwrap();
        assert_eq!(a.dependencies.len(), 1);
        assert_eq!(a.dependencies[0].reference, Some(exact(1, 0)));
    }

    #[test]
    fn test_equal_reference_duplicate_is_dropped() {
        let tree = DependencyNode::root(
            "app",
            vec![
                leaf("b", exact(1, 0)),
                DependencyNode::new("a", exact(1, 0), vec![leaf("b", exact(1, 0))]),
            ],
        );

        let optimized = optimize(tree);

        assert_eq!(optimized.dependencies.len(), 2);
        let a = optimized.dependencies.iter().find(|n| n.name == "a").unwrap();
        assert!(a.dependencies.is_empty());
    }

    #[test]
    fn test_later_sibling_dedupes_against_earlier_adoption() {
        // Both a and c nest the same b; the first hoists it, the second's
        // copy collapses against the adopted one.
        let tree = DependencyNode::root(
            "app",
            vec![
                DependencyNode::new("a", exact(1, 0), vec![leaf("b", exact(1, 0))]),
                DependencyNode::new("c", exact(1, 0), vec![leaf("b", exact(1, 0))]),
            ],
        );

        let optimized = optimize(tree);

        let b_count = optimized.dependencies.iter().filter(|n| n.name == "b").count();
        assert_eq!(b_count, 1);
        assert!(optimized.dependencies.iter().all(|n| n.dependencies.is_empty()));
    }

    #[test]
    fn test_deep_tree_hoists_bottom_up() {
        let tree = DependencyNode::root(
            "app",
            vec![DependencyNode::new(
                "a",
                exact(1, 0),
                vec![DependencyNode::new(
                    "b",
                    exact(1, 0),
                    vec![leaf("c", exact(1, 0))],
                )],
            )],
        );

        let optimized = optimize(tree);

        let names: Vec<&str> =
            optimized.dependencies.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_optimize_is_idempotent() {
        let tree = DependencyNode::root(
            "app",
            vec![
                leaf("b", exact(2, 0)),
                DependencyNode::new(
                    "a",
                    exact(1, 0),
                    vec![leaf("b", exact(1, 0)), leaf("c", exact(1, 0))],
                ),
            ],
        );

        let once = optimize(tree);
        let twice = optimize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_visible_versions_are_preserved() {
        let tree = DependencyNode::root(
            "app",
            vec![
                leaf("b", exact(2, 0)),
                DependencyNode::new(
                    "a",
                    exact(1, 0),
                    vec![leaf("b", exact(1, 0)), leaf("c", exact(3, 0))],
                ),
            ],
        );

        let optimized = optimize(tree.clone());

        // From a's perspective: b is still 1.0, c is still 3.0.
        assert_eq!(
            visible_reference(&optimized, &["a"], "b"),
            Some(&exact(1, 0))
        );
        assert_eq!(
            visible_reference(&optimized, &["a"], "c"),
            Some(&exact(3, 0))
        );
        // From the root: b is still 2.0.
        assert_eq!(visible_reference(&optimized, &[], "b"), Some(&exact(2, 0)));
    }
}
