//! Error types for the pydex crate.
//!
//! This module defines [`Error`], the error type used throughout the
//! crate, along with a helper trait for attaching I/O context.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while working with the registry mapping.
///
/// Every failure surfaces directly to the caller with the offending
/// name, URL, or status attached. Nothing is swallowed or retried.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Package name cache not found at {}", path.display())]
    #[diagnostic(
        code(pydex::cache_missing),
        help("Run `Pypi::refresh_cached_package_names()` to download the package listing")
    )]
    CacheMissing { path: PathBuf },

    #[error("`user` and `proj_names` are mutually exclusive")]
    #[diagnostic(
        code(pydex::ambiguous_scope),
        help("Scope the mapping by user or by an explicit name collection, not both")
    )]
    AmbiguousScope,

    #[error("Package is not in this mapping: {name}")]
    #[diagnostic(code(pydex::key_not_in_domain))]
    KeyNotInDomain { name: String },

    #[error("Package does not exist on the registry: {name}")]
    #[diagnostic(code(pydex::package_not_found))]
    PackageNotFound { name: String },

    #[error("No such user on the registry: {user}")]
    #[diagnostic(code(pydex::user_not_found))]
    UserNotFound { user: String },

    #[error("Upstream request failed: {url} [{status}]")]
    #[diagnostic(code(pydex::upstream))]
    Upstream { url: String, status: u16 },

    #[error(transparent)]
    #[diagnostic(
        code(pydex::transport),
        help("Check your network connection and the registry URL")
    )]
    Transport(#[from] Box<ureq::Error>),

    #[error("Could not parse the response body from {url}")]
    #[diagnostic(code(pydex::malformed_response))]
    MalformedResponse { url: String },

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(pydex::io))]
    Io {
        action: String,
        source: std::io::Error,
    },

    #[error("Invalid URL: {0}")]
    #[diagnostic(code(pydex::invalid_url))]
    InvalidUrl(String),
}

/// A specialized Result type for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        Self::Transport(Box::new(e))
    }
}

/// Extension trait for adding context to I/O errors.
pub trait ErrorContext<T> {
    /// Adds context to an error, describing what action was being performed.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            Error::Io {
                action: context(),
                source: err,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AmbiguousScope;
        assert_eq!(err.to_string(), "`user` and `proj_names` are mutually exclusive");

        let err = Error::KeyNotInDomain {
            name: "scipy".to_string(),
        };
        assert_eq!(err.to_string(), "Package is not in this mapping: scipy");

        let err = Error::PackageNotFound {
            name: "no_way_this_is_a_package".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Package does not exist on the registry: no_way_this_is_a_package"
        );

        let err = Error::Upstream {
            url: "https://pypi.org/pypi/numpy/json".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "Upstream request failed: https://pypi.org/pypi/numpy/json [503]"
        );
    }

    #[test]
    fn test_cache_missing_display() {
        let err = Error::CacheMissing {
            path: PathBuf::from("/tmp/pydex/package-names.txt"),
        };
        assert_eq!(
            err.to_string(),
            "Package name cache not found at /tmp/pydex/package-names.txt"
        );
    }

    #[test]
    fn test_from_ureq_error() {
        let err: Error = ureq::Error::ConnectionFailed.into();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn test_with_context() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = result
            .with_context(|| "reading the name cache".to_string())
            .unwrap_err();
        assert_eq!(err.to_string(), "Error while reading the name cache: gone");
        assert!(std::error::Error::source(&err).is_some());
    }
}
