//! Live per-package metadata lookups.

use pydex_http::SHARED_AGENT;
use tracing::debug;
use ureq::http::StatusCode;

use crate::{
    error::{Error, Result},
    registry::Registry,
};

/// The JSON tree the registry returns for one package.
///
/// Passed through verbatim: sub-trees for general info, release
/// history, download URLs and known vulnerabilities are present but not
/// reshaped or validated here. The caller owns the returned value;
/// nothing is cached.
pub type PackageInfo = serde_json::Value;

/// Some packages carry release histories well past the default body cap.
const MAX_METADATA_BYTES: u64 = 64 * 1024 * 1024;

/// Fetches live package metadata from the registry.
///
/// Each call issues exactly one blocking GET and has no side effects
/// beyond the outbound request. No retries; the shared agent's default
/// timeout applies.
#[derive(Clone, Debug)]
pub struct MetadataFetcher {
    metadata_url: String,
    project_url: String,
}

impl Default for MetadataFetcher {
    fn default() -> Self {
        Self::new(&Registry::default())
    }
}

impl MetadataFetcher {
    pub fn new(registry: &Registry) -> Self {
        Self {
            metadata_url: registry.metadata_url.trim_end_matches('/').to_string(),
            project_url: registry.project_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches the metadata tree for `name` from
    /// `{metadata_url}/{name}/json`.
    ///
    /// # Errors
    ///
    /// * [`Error::PackageNotFound`] when the registry answers 404.
    /// * [`Error::Upstream`] for any other non-success status.
    /// * [`Error::Transport`] for connection-level failures.
    /// * [`Error::MalformedResponse`] when the body is not JSON.
    pub fn fetch(&self, name: &str) -> Result<PackageInfo> {
        let url = self.info_url(name);
        debug!("fetching package metadata from {}", url);

        let mut resp = SHARED_AGENT.get(&url).call()?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::PackageNotFound {
                name: name.to_string(),
            });
        }
        if !status.is_success() {
            return Err(Error::Upstream {
                url,
                status: status.as_u16(),
            });
        }

        let body = resp
            .body_mut()
            .with_config()
            .limit(MAX_METADATA_BYTES)
            .read_to_vec()?;
        serde_json::from_slice(&body).map_err(|_| Error::MalformedResponse { url })
    }

    /// Whether the registry serves a project page for `name`.
    pub fn has_project_page(&self, name: &str) -> Result<bool> {
        let url = format!("{}/{}", self.project_url, encode_segment(name));
        let resp = SHARED_AGENT.head(&url).call()?;
        Ok(resp.status() == StatusCode::OK)
    }

    fn info_url(&self, name: &str) -> String {
        format!("{}/{}/json", self.metadata_url, encode_segment(name))
    }
}

fn encode_segment(name: &str) -> String {
    url::form_urlencoded::byte_serialize(name.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_url() {
        let fetcher = MetadataFetcher::default();
        assert_eq!(fetcher.info_url("numpy"), "https://pypi.org/pypi/numpy/json");
    }

    #[test]
    fn test_info_url_encodes_odd_names() {
        let fetcher = MetadataFetcher::default();
        assert_eq!(
            fetcher.info_url("zope.interface"),
            "https://pypi.org/pypi/zope.interface/json"
        );
        assert_eq!(
            fetcher.info_url("a/b"),
            "https://pypi.org/pypi/a%2Fb/json"
        );
    }

    #[test]
    fn test_new_trims_trailing_slashes() {
        let registry = Registry {
            metadata_url: "http://localhost:9/pypi/".to_string(),
            ..Registry::default()
        };
        let fetcher = MetadataFetcher::new(&registry);
        assert_eq!(fetcher.info_url("dol"), "http://localhost:9/pypi/dol/json");
    }
}
