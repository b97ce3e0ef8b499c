//! The full package listing and its refresh path.
//!
//! Ordinary reads never touch the full listing: the mapping loads names
//! from the local cache file. [`NameIndex::refresh`] is the explicit,
//! rate-sensitive operation that re-pulls the listing from a
//! [`NameListing`] source and overwrites the cache.

use std::sync::LazyLock;

use pydex_http::SHARED_AGENT;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};
use ureq::http::header::ACCEPT;

use crate::{
    cache::NameCache,
    error::{Error, Result},
    names::NameSet,
    registry::PYPI_SIMPLE_INDEX_URL,
};

/// Media type of the JSON rendition of the simple index.
pub const SIMPLE_V1_JSON_MEDIA_TYPE: &str = "application/vnd.pypi.simple.v1+json";

/// The full listing runs to hundreds of megabytes as JSON.
const MAX_LISTING_BYTES: u64 = 256 * 1024 * 1024;

/// A remote source of the full package-name listing.
///
/// The one production implementation is [`SimpleIndex`]; tests swap in
/// canned sources so refresh behavior can be exercised offline.
pub trait NameListing {
    fn list_names(&self) -> Result<Vec<String>>;
}

/// The registry's "simple" index as a [`NameListing`].
///
/// Asks for the v1 JSON rendition of the index and falls back to
/// scraping the anchor text when the server answers with HTML.
#[derive(Clone, Debug)]
pub struct SimpleIndex {
    url: String,
}

impl Default for SimpleIndex {
    fn default() -> Self {
        Self::new(PYPI_SIMPLE_INDEX_URL)
    }
}

impl SimpleIndex {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn parse_listing(&self, body: &str) -> Result<Vec<String>> {
        // Sniff the payload shape rather than trusting content
        // negotiation; mirrors serve either rendition.
        if let Ok(list) = serde_json::from_str::<ProjectList>(body) {
            return Ok(list.projects.into_iter().map(|p| p.name).collect());
        }

        warn!("package listing is not simple-v1 JSON, scraping anchors instead");
        let names: Vec<String> = ANCHOR_RE
            .captures_iter(body)
            .map(|caps| caps[1].trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        if names.is_empty() {
            return Err(Error::MalformedResponse {
                url: self.url.clone(),
            });
        }
        Ok(names)
    }
}

#[derive(Deserialize)]
struct ProjectList {
    projects: Vec<ProjectEntry>,
}

#[derive(Deserialize)]
struct ProjectEntry {
    name: String,
}

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<a[^>]*>([^<]+)</a>").unwrap());

impl NameListing for SimpleIndex {
    fn list_names(&self) -> Result<Vec<String>> {
        debug!("fetching package listing from {}", self.url);

        let mut resp = SHARED_AGENT
            .get(&self.url)
            .header(ACCEPT, SIMPLE_V1_JSON_MEDIA_TYPE)
            .call()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Upstream {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp
            .body_mut()
            .with_config()
            .limit(MAX_LISTING_BYTES)
            .read_to_string()?;

        self.parse_listing(&body)
    }
}

/// The load/refresh pair over the local name cache.
#[derive(Clone, Debug, Default)]
pub struct NameIndex {
    cache: NameCache,
}

impl NameIndex {
    pub fn new(cache: NameCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &NameCache {
        &self.cache
    }

    /// Loads the cached name set without any network access.
    pub fn load(&self) -> Result<NameSet> {
        self.cache.load()
    }

    /// Pulls the full listing from `source`, overwrites the cache file,
    /// and returns the fresh set.
    ///
    /// Meant to be run explicitly and infrequently by an operator, never
    /// from a read path. Concurrent refreshes racing on the same file
    /// are not guarded against.
    pub fn refresh(&self, source: &dyn NameListing) -> Result<NameSet> {
        let had = self.cache.load().map(|set| set.len()).unwrap_or(0);

        let names: NameSet = source.list_names()?.into_iter().collect();
        self.cache.save(&names)?;

        info!(
            "refreshed package name cache at {}: had {} names, now has {}",
            self.cache.path().display(),
            had,
            names.len()
        );
        Ok(names)
    }
}
