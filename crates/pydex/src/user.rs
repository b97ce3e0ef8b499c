//! Per-user project listings.
//!
//! The registry exposes a user's projects only through the public
//! profile page, so this is the one place the crate reads HTML. Besides
//! the name, the page carries the project link and the date of the last
//! release, which are worth extracting while we are there: they save a
//! metadata request each when that is all the caller wants.

use std::sync::LazyLock;

use pydex_http::SHARED_AGENT;
use regex::Regex;
use tracing::debug;
use ureq::http::StatusCode;

use crate::{
    error::{Error, Result},
    registry::PYPI_USER_URL,
};

/// One row of a user's project listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProject {
    pub name: String,
    /// Link to the project page, as given by the listing.
    pub href: Option<String>,
    /// Datetime of the last release, as given by the listing.
    pub date: Option<String>,
}

/// Live lookup of the projects associated with a registry user.
///
/// No caching; every call hits the registry.
#[derive(Clone, Debug)]
pub struct UserProjects {
    base_url: String,
}

impl Default for UserProjects {
    fn default() -> Self {
        Self::new(PYPI_USER_URL)
    }
}

impl UserProjects {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Fetches the project rows for `user`, in listing order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] when the registry has no such
    /// user. A user that exists but has no projects yields `Ok(vec![])`.
    pub fn fetch(&self, user: &str) -> Result<Vec<UserProject>> {
        let encoded: String = url::form_urlencoded::byte_serialize(user.as_bytes()).collect();
        let url = format!("{}/{}/", self.base_url.trim_end_matches('/'), encoded);

        debug!("fetching project listing for user {} from {}", user, url);

        let mut resp = SHARED_AGENT.get(&url).call()?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::UserNotFound {
                user: user.to_string(),
            });
        }
        if !status.is_success() {
            return Err(Error::Upstream {
                url,
                status: status.as_u16(),
            });
        }

        let body = resp.body_mut().read_to_string()?;
        Ok(parse_user_projects(&body))
    }

    /// The names of `user`'s projects, in listing order.
    pub fn names(&self, user: &str) -> Result<Vec<String>> {
        Ok(self.fetch(user)?.into_iter().map(|p| p.name).collect())
    }
}

static SNIPPET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a([^>]*class="[^"]*package-snippet[^"]*"[^>]*)>(.*?)</a>"#).unwrap()
});
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"href="([^"]*)""#).unwrap());
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<h3[^>]*>\s*(.*?)\s*</h3>").unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<time[^>]*datetime="([^"]*)""#).unwrap());

fn parse_user_projects(body: &str) -> Vec<UserProject> {
    SNIPPET_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let inner = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            let name = TITLE_RE.captures(inner)?[1].trim().to_string();
            Some(UserProject {
                name,
                href: HREF_RE.captures(attrs).map(|c| c[1].to_string()),
                date: DATE_RE.captures(inner).map(|c| c[1].to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = concat!(
        "<html><body><h2>2 projects</h2>\n",
        "<a class=\"package-snippet\" href=\"/project/dol/\">\n",
        "  <h3 class=\"package-snippet__title\">dol</h3>\n",
        "  <time datetime=\"2024-03-01T10:00:00+0000\">Mar 1, 2024</time>\n",
        "</a>\n",
        "<a class=\"package-snippet\" href=\"/project/yp/\">\n",
        "  <h3 class=\"package-snippet__title\">yp</h3>\n",
        "  <time datetime=\"2023-11-20T09:30:00+0000\">Nov 20, 2023</time>\n",
        "</a>\n",
        "</body></html>"
    );

    #[test]
    fn test_parse_user_projects() {
        let projects = parse_user_projects(LISTING);
        assert_eq!(
            projects,
            vec![
                UserProject {
                    name: "dol".to_string(),
                    href: Some("/project/dol/".to_string()),
                    date: Some("2024-03-01T10:00:00+0000".to_string()),
                },
                UserProject {
                    name: "yp".to_string(),
                    href: Some("/project/yp/".to_string()),
                    date: Some("2023-11-20T09:30:00+0000".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_parse_listing_without_projects() {
        let projects = parse_user_projects("<html><body><h2>0 projects</h2></body></html>");
        assert!(projects.is_empty());
    }

    #[test]
    fn test_parse_snippet_without_time_or_href() {
        let body = "<a class=\"package-snippet\"><h3>solo</h3></a>";
        let projects = parse_user_projects(body);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "solo");
        assert_eq!(projects[0].href, None);
        assert_eq!(projects[0].date, None);
    }
}
