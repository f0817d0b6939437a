//! Registry client and the package source boundary.
//!
//! [`PackageSource`] is the seam the resolver and installer depend on: it
//! lists published versions and returns package archive bytes for a pinned
//! reference. [`HttpRegistry`] is the production implementation over an
//! npm-style registry; tests substitute an in-memory fake.
//!
//! Only two pieces of the registry wire format are consumed:
//!
//! - Metadata: `GET <registry>/<name>` returns a JSON object whose
//!   `versions` keys are the published version strings. Nothing else in the
//!   document is read.
//! - Tarballs: `<registry>/<name>/-/<name>-<version>.tgz`.
//!
//! There is no retry, backoff, or cross-run cache: every fetch is a single
//! attempt, and a failure aborts the whole operation.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use semver::Version;
use serde::Deserialize;
use tracing::debug;

use crate::core::error::TinypmError;
use crate::reference::PinnedReference;

/// The capability boundary to package storage.
///
/// Given a pinned reference this returns package bytes; given a name it
/// returns the set of published versions. The core depends only on this
/// trait, not on any transport.
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Published versions of `name`, from the registry metadata document.
    ///
    /// Version keys that don't parse as semver are skipped.
    async fn published_versions(&self, name: &str) -> Result<Vec<Version>>;

    /// Raw archive bytes for a pinned reference.
    async fn fetch_package(&self, name: &str, reference: &PinnedReference) -> Result<Vec<u8>>;
}

/// Registry metadata document; only the `versions` key set is consumed.
#[derive(Deserialize)]
struct Packument {
    #[serde(default)]
    versions: HashMap<String, serde::de::IgnoredAny>,
}

/// [`PackageSource`] over an npm-style HTTP registry.
///
/// Holds a shared [`reqwest::Client`] so connections are reused across the
/// many concurrent fetches a resolution produces.
#[derive(Clone)]
pub struct HttpRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRegistry {
    /// Create a client for the registry at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Conventional tarball location for a published version.
    fn tarball_url(&self, name: &str, version: &Version) -> String {
        format!("{}/{}/-/{}-{}.tgz", self.base_url, name, name, version)
    }

    /// One GET returning the body bytes; non-success statuses are errors.
    async fn get_bytes(&self, name: &str, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            TinypmError::FetchFailed {
                name: name.to_string(),
                reference: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(TinypmError::FetchFailed {
                name: name.to_string(),
                reference: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            }
            .into());
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl PackageSource for HttpRegistry {
    async fn published_versions(&self, name: &str) -> Result<Vec<Version>> {
        let url = format!("{}/{}", self.base_url, name);
        debug!(name, url, "fetching registry metadata");

        let raw = self.get_bytes(name, &url).await?;
        let packument: Packument =
            serde_json::from_slice(&raw).map_err(TinypmError::JsonError)?;

        let mut versions = Vec::with_capacity(packument.versions.len());
        for key in packument.versions.keys() {
            match Version::parse(key) {
                Ok(version) => versions.push(version),
                Err(_) => debug!(name, key, "skipping unparsable published version"),
            }
        }
        Ok(versions)
    }

    async fn fetch_package(&self, name: &str, reference: &PinnedReference) -> Result<Vec<u8>> {
        match reference {
            PinnedReference::Path(path) => {
                debug!(name, path, "reading package from local path");
                tokio::fs::read(path).await.map_err(|e| {
                    TinypmError::FetchFailed {
                        name: name.to_string(),
                        reference: path.clone(),
                        reason: e.to_string(),
                    }
                    .into()
                })
            }
            PinnedReference::Exact(version) => {
                let url = self.tarball_url(name, version);
                debug!(name, url, "fetching package tarball");
                self.get_bytes(name, &url).await
            }
            PinnedReference::Url(url) => {
                debug!(name, url, "fetching package from URL");
                self.get_bytes(name, url).await
            }
        }
    }
}
