//! Registry endpoint configuration.

use url::Url;

use crate::error::{Error, Result};

/// Base URL of the per-package metadata endpoint.
pub const PYPI_METADATA_URL: &str = "https://pypi.org/pypi";

/// URL of the full package listing (the "simple" index).
pub const PYPI_SIMPLE_INDEX_URL: &str = "https://pypi.org/simple/";

/// Base URL of per-user project listings.
pub const PYPI_USER_URL: &str = "https://pypi.org/user";

/// Base URL of the human-facing project pages.
pub const PYPI_PROJECT_URL: &str = "https://pypi.org/project";

/// The set of registry endpoints a mapping talks to.
///
/// [`Default`] points at pypi.org. Overriding is intended for mirrors
/// and for tests that serve canned responses locally; there is no other
/// configuration surface.
#[derive(Clone, Debug)]
pub struct Registry {
    /// Metadata endpoint, queried as `{metadata_url}/{name}/json`.
    pub metadata_url: String,
    /// Full name listing, queried as-is.
    pub simple_index_url: String,
    /// User project listings, queried as `{user_url}/{user}/`.
    pub user_url: String,
    /// Project pages, queried as `{project_url}/{name}`.
    pub project_url: String,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            metadata_url: PYPI_METADATA_URL.to_string(),
            simple_index_url: PYPI_SIMPLE_INDEX_URL.to_string(),
            user_url: PYPI_USER_URL.to_string(),
            project_url: PYPI_PROJECT_URL.to_string(),
        }
    }
}

impl Registry {
    /// Checks that every endpoint parses as an absolute URL.
    pub fn validate(&self) -> Result<()> {
        for url in [
            &self.metadata_url,
            &self.simple_index_url,
            &self.user_url,
            &self.project_url,
        ] {
            Url::parse(url).map_err(|err| Error::InvalidUrl(format!("{url}: {err}")))?;
        }
        Ok(())
    }
}
