//! Dependency reference classification and pinning.
//!
//! A dependency is declared as a bare string in a manifest; this module
//! classifies that string into a [`Reference`] and defines the pinned form
//! produced by resolution. Classification is ordered: a path prefix wins,
//! then an exact semver version, then a parseable semver range, and anything
//! left over is treated as an opaque URL to fetch directly.
//!
//! Pinnedness is a type-level guarantee: [`PinnedReference`] has no range
//! variant, so code that fetches or installs a package can never be handed an
//! unresolved range.

use std::fmt;

use semver::{Version, VersionReq};

/// A declared dependency coordinate, as written in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Local path, recognized by a `/`, `./`, or `../` prefix.
    Path(String),
    /// An exact semver version such as `1.2.3`.
    Exact(Version),
    /// A semver range such as `^1.0.0` or `>=1.2, <2`.
    Range(VersionReq),
    /// Anything else: an opaque URL fetched as-is.
    Url(String),
}

impl Reference {
    /// Classify a raw reference string.
    ///
    /// `1.0.0` parses as a valid range too, so exact versions are checked
    /// first; a reference is only a [`Reference::Range`] when it is not
    /// already pinned.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with('/') || raw.starts_with("./") || raw.starts_with("../") {
            return Self::Path(raw.to_string());
        }
        if let Ok(version) = Version::parse(raw) {
            return Self::Exact(version);
        }
        if let Ok(range) = VersionReq::parse(raw) {
            return Self::Range(range);
        }
        Self::Url(raw.to_string())
    }

    /// The pinned form of this reference, if it is already pinned.
    ///
    /// Paths, exact versions, and URLs pin to themselves; ranges return
    /// `None` and require a registry lookup.
    pub fn as_pinned(&self) -> Option<PinnedReference> {
        match self {
            Self::Path(p) => Some(PinnedReference::Path(p.clone())),
            Self::Exact(v) => Some(PinnedReference::Exact(v.clone())),
            Self::Url(u) => Some(PinnedReference::Url(u.clone())),
            Self::Range(_) => None,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{p}"),
            Self::Exact(v) => write!(f, "{v}"),
            Self::Range(r) => write!(f, "{r}"),
            Self::Url(u) => write!(f, "{u}"),
        }
    }
}

/// A reference guaranteed to denote one exact package artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinnedReference {
    /// Local path to a package archive.
    Path(String),
    /// An exact published version.
    Exact(Version),
    /// A direct download URL.
    Url(String),
}

impl PinnedReference {
    /// Whether this pinned reference satisfies a declared reference.
    ///
    /// This is the elision rule used during graph construction: a literal
    /// match (same path, URL, or version) always satisfies, and a declared
    /// range is satisfied by any exact version it matches. A pinned path or
    /// URL never satisfies a range.
    pub fn satisfies(&self, declared: &Reference) -> bool {
        match (declared, self) {
            (Reference::Path(a), Self::Path(b)) => a == b,
            (Reference::Url(a), Self::Url(b)) => a == b,
            (Reference::Exact(a), Self::Exact(b)) => a == b,
            (Reference::Range(range), Self::Exact(version)) => range.matches(version),
            _ => false,
        }
    }
}

impl fmt::Display for PinnedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{p}"),
            Self::Exact(v) => write!(f, "{v}"),
            Self::Url(u) => write!(f, "{u}"),
        }
    }
}

/// Declared coordinates of a package: a name and a volatile reference.
///
/// Immutable value type; never mutated after construction, only superseded
/// by a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Package name as declared in the manifest.
    pub name: String,
    /// The declared, possibly volatile reference.
    pub reference: Reference,
}

impl Descriptor {
    /// Build a descriptor from a manifest entry, classifying the reference.
    pub fn new(name: impl Into<String>, raw_reference: &str) -> Self {
        Self {
            name: name.into(),
            reference: Reference::parse(raw_reference),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.reference)
    }
}

/// Resolved coordinates of a package: a name and a pinned reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedDescriptor {
    /// Package name.
    pub name: String,
    /// The exact, resolved reference.
    pub reference: PinnedReference,
}

impl fmt::Display for PinnedDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.reference)
    }
}
