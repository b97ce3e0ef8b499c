//! The mapping facade over the registry.

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::{
    cache::NameCache,
    error::{Error, Result},
    index::{NameIndex, SimpleIndex},
    metadata::{MetadataFetcher, PackageInfo},
    names::NameSet,
    registry::Registry,
    user::UserProjects,
};

/// How the key domain of a [`Pypi`] instance was selected.
#[derive(Clone, Debug)]
enum Scope {
    All,
    User(String),
    Collection,
}

/// A read-only, dictionary-like view over the registry.
///
/// Keys are package names, values are live metadata trees. The key
/// domain is a snapshot taken at construction time: the full cached
/// index, the projects of one user, or an explicit collection. Reads
/// never mutate it.
///
/// ```no_run
/// use pydex::Pypi;
///
/// # fn main() -> pydex::Result<()> {
/// let p = Pypi::from_names(["numpy", "pandas", "dol"])?;
/// assert_eq!(p.len(), 3);
/// assert!(p.contains("numpy") && !p.contains("scipy"));
///
/// let info = p.get("numpy")?;
/// assert!(info.get("releases").is_some());
/// # Ok(())
/// # }
/// ```
pub struct Pypi {
    names: NameSet,
    fetcher: MetadataFetcher,
    scope: Scope,
}

impl Pypi {
    pub fn builder() -> PypiBuilder {
        PypiBuilder::default()
    }

    /// A mapping over every name in the local cache file.
    ///
    /// Fails with [`Error::CacheMissing`] until a refresh has run.
    pub fn all() -> Result<Self> {
        Self::builder().build()
    }

    /// A mapping scoped to the projects of one registry user.
    pub fn for_user(user: impl Into<String>) -> Result<Self> {
        Self::builder().user(user).build()
    }

    /// A mapping over an explicit collection of names.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder().proj_names(names).build()
    }

    /// Whether `name` is in the key domain. Pure; no network access.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Size of the key domain. Pure.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates the key domain in stored order. Restartable.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter()
    }

    /// Fetches live metadata for `name`.
    ///
    /// Membership is checked locally first: a name outside the key
    /// domain fails with [`Error::KeyNotInDomain`] without any request
    /// being issued. Otherwise the result of one metadata fetch is
    /// returned unchanged, errors included.
    pub fn get(&self, name: &str) -> Result<PackageInfo> {
        if !self.names.contains(name) {
            return Err(Error::KeyNotInDomain {
                name: name.to_string(),
            });
        }
        self.fetcher.fetch(name)
    }

    /// Whether the registry serves a project page for `name`.
    ///
    /// Unlike [`get`](Pypi::get), this does not require `name` to be in
    /// the key domain; it asks the registry directly.
    pub fn has_project_page(&self, name: &str) -> Result<bool> {
        self.fetcher.has_project_page(name)
    }

    /// Downloads a fresh copy of the registry's package names into the
    /// default cache file and returns the new cardinality.
    ///
    /// Explicit and rate-sensitive: run it to (re)build the cache, but
    /// not too often. A scoped equivalent is available through
    /// [`NameIndex::refresh`].
    pub fn refresh_cached_package_names() -> Result<usize> {
        let index = NameIndex::default();
        let names = index.refresh(&SimpleIndex::default())?;
        Ok(names.len())
    }
}

impl fmt::Debug for Pypi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Scope::All => write!(f, "Pypi()"),
            Scope::User(user) => write!(f, "Pypi(user={user})"),
            Scope::Collection => {
                write!(f, "Pypi(<a collection of length {}>)", self.names.len())
            }
        }
    }
}

/// Builder for [`Pypi`].
///
/// `user` and `proj_names` are mutually exclusive; with neither, the
/// key domain comes from the local name cache.
#[derive(Debug, Default)]
pub struct PypiBuilder {
    user: Option<String>,
    proj_names: Option<Vec<String>>,
    registry: Option<Registry>,
    cache_path: Option<PathBuf>,
}

impl PypiBuilder {
    /// Scope the mapping to the projects of `user`.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Scope the mapping to an explicit collection of names.
    pub fn proj_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proj_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Point the mapping at different registry endpoints.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Read the full-index key domain from `path` instead of the
    /// default cache location.
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Resolves the key domain and builds the mapping.
    ///
    /// # Errors
    ///
    /// * [`Error::AmbiguousScope`] when both `user` and `proj_names`
    ///   were given, checked before any network or disk access.
    /// * [`Error::CacheMissing`] in full-index mode before any refresh
    ///   has run.
    /// * [`Error::UserNotFound`] and the usual fetch errors in user
    ///   mode.
    pub fn build(self) -> Result<Pypi> {
        if self.user.is_some() && self.proj_names.is_some() {
            return Err(Error::AmbiguousScope);
        }

        let registry = match self.registry {
            Some(registry) => {
                registry.validate()?;
                registry
            }
            None => Registry::default(),
        };

        let (names, scope) = if let Some(proj_names) = self.proj_names {
            (proj_names.into_iter().collect(), Scope::Collection)
        } else if let Some(user) = self.user {
            let source = UserProjects::new(registry.user_url.as_str());
            let names = source.names(&user)?.into_iter().collect();
            (names, Scope::User(user))
        } else {
            let cache = match self.cache_path {
                Some(path) => NameCache::new(path),
                None => NameCache::default(),
            };
            (cache.load()?, Scope::All)
        };

        debug!("built {:?} mapping with {} names", scope, names.len());

        Ok(Pypi {
            names,
            fetcher: MetadataFetcher::new(&registry),
            scope,
        })
    }
}
