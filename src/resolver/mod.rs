//! Reference pinning and dependency graph construction.
//!
//! Resolution happens in two cooperating pieces:
//!
//! - [`GraphBuilder::resolve`] turns one volatile reference into a pinned
//!   one. Paths, exact versions, and URLs are already pinned and cost no
//!   network access; a range queries the registry metadata once and selects
//!   the highest published version that satisfies it.
//! - [`GraphBuilder::build_project`] recursively builds the full dependency
//!   tree. At every node, declared dependencies already provided by an
//!   ancestor in a satisfying version are elided entirely; the rest are
//!   resolved concurrently, each branch receiving its own extended copy of
//!   the [`AncestorScope`].
//!
//! # Scope isolation
//!
//! The central correctness invariant: a branch sees ancestor-provided
//! versions but never a sibling's additions. [`AncestorScope`] has no
//! mutating API — [`AncestorScope::extended`] returns a fresh copy — so
//! isolation holds by construction regardless of how the concurrent branches
//! are scheduled, with no locking.
//!
//! # Ordering
//!
//! Children appear in manifest declaration order, not completion order:
//! the per-dependency futures are joined with [`try_join_all`], which
//! preserves input order. A failure anywhere aborts the whole build.

use std::collections::HashMap;

use anyhow::{Context, Result};
use futures::future::{BoxFuture, try_join_all};
use tracing::debug;

use crate::archive;
use crate::core::error::TinypmError;
use crate::manifest::Manifest;
use crate::reference::{Descriptor, PinnedDescriptor, PinnedReference, Reference};
use crate::registry::PackageSource;
use crate::tree::DependencyNode;
use crate::utils::progress::ProgressBar;

/// The name-to-pinned-reference bindings a subtree inherits from its
/// ancestors at the moment it begins resolving.
///
/// Immutable per branch: extending produces a new value, so concurrently
/// resolving siblings can never observe each other's additions.
#[derive(Debug, Clone, Default)]
pub struct AncestorScope(HashMap<String, PinnedReference>);

impl AncestorScope {
    /// The empty scope used at the project root.
    pub fn new() -> Self {
        Self::default()
    }

    /// The pinned reference an ancestor provides for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&PinnedReference> {
        self.0.get(name)
    }

    /// A fresh scope with one additional binding.
    #[must_use]
    pub fn extended(&self, name: &str, reference: PinnedReference) -> Self {
        let mut map = self.0.clone();
        map.insert(name.to_string(), reference);
        Self(map)
    }

    /// Whether an ancestor already provides a satisfying version of a
    /// declared dependency, making its resolution redundant.
    pub fn provides(&self, declared: &Descriptor) -> bool {
        self.get(&declared.name)
            .is_some_and(|pinned| pinned.satisfies(&declared.reference))
    }
}

/// Builds pinned dependency trees from declared dependencies.
pub struct GraphBuilder<S> {
    source: S,
    progress: Option<ProgressBar>,
}

impl<S: PackageSource> GraphBuilder<S> {
    /// Create a builder over a package source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            progress: None,
        }
    }

    /// Report resolution progress on `bar` (length grows as dependencies
    /// are discovered).
    #[must_use]
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    /// Turn a volatile reference into a pinned descriptor.
    ///
    /// Only ranges touch the network: one metadata read, selecting the
    /// maximum published version that satisfies the range. Fails with
    /// [`TinypmError::NoMatchingVersion`] when nothing satisfies it.
    pub async fn resolve(&self, declared: &Descriptor) -> Result<PinnedDescriptor> {
        let pinned = match &declared.reference {
            Reference::Path(path) => PinnedReference::Path(path.clone()),
            Reference::Exact(version) => PinnedReference::Exact(version.clone()),
            Reference::Url(url) => PinnedReference::Url(url.clone()),
            Reference::Range(range) => {
                let versions = self.source.published_versions(&declared.name).await?;
                let best = versions.into_iter().filter(|v| range.matches(v)).max();
                match best {
                    Some(version) => PinnedReference::Exact(version),
                    None => {
                        return Err(TinypmError::NoMatchingVersion {
                            name: declared.name.clone(),
                            range: range.to_string(),
                        }
                        .into());
                    }
                }
            }
        };

        debug!(name = %declared.name, reference = %pinned, "pinned");
        Ok(PinnedDescriptor {
            name: declared.name.clone(),
            reference: pinned,
        })
    }

    /// Build the dependency tree for a project manifest.
    ///
    /// The returned root node carries no reference: it represents the
    /// project itself and is never installed.
    pub async fn build_project(&self, manifest: &Manifest) -> Result<DependencyNode> {
        let name = manifest.name.clone().unwrap_or_else(|| "root".to_string());
        self.build(name, None, manifest.dependency_descriptors(), AncestorScope::new())
            .await
    }

    /// Recursively build one node.
    ///
    /// Boxed because the future recurses through itself; each needed
    /// dependency resolves concurrently and the join preserves declaration
    /// order.
    fn build(
        &self,
        name: String,
        reference: Option<PinnedReference>,
        declared: Vec<Descriptor>,
        scope: AncestorScope,
    ) -> BoxFuture<'_, Result<DependencyNode>> {
        Box::pin(async move {
            let needed: Vec<Descriptor> = declared
                .into_iter()
                .filter(|dep| {
                    if scope.provides(dep) {
                        debug!(name = %dep.name, "elided: ancestor already provides");
                        false
                    } else {
                        true
                    }
                })
                .collect();

            if let Some(bar) = &self.progress {
                bar.inc_length(needed.len() as u64);
            }

            let dependencies =
                try_join_all(needed.iter().map(|dep| self.build_subtree(dep, &scope))).await?;

            Ok(DependencyNode {
                name,
                reference,
                dependencies,
            })
        })
    }

    /// Resolve one needed dependency and recurse into its subtree with an
    /// extended scope snapshot private to this branch.
    async fn build_subtree(
        &self,
        declared: &Descriptor,
        scope: &AncestorScope,
    ) -> Result<DependencyNode> {
        let pinned = self
            .resolve(declared)
            .await
            .with_context(|| format!("failed to resolve {declared}"))?;

        let bytes = self
            .source
            .fetch_package(&pinned.name, &pinned.reference)
            .await?;
        let manifest = archive::read_manifest(&bytes)
            .with_context(|| format!("failed to read manifest of {pinned}"))?;

        let branch_scope = scope.extended(&pinned.name, pinned.reference.clone());

        if let Some(bar) = &self.progress {
            bar.inc(1);
        }

        self.build(
            pinned.name.clone(),
            Some(pinned.reference),
            manifest.dependency_descriptors(),
            branch_scope,
        )
        .await
    }
}
