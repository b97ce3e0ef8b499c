//! A mapping view of the PyPI package registry.
//!
//! [`Pypi`] behaves like a read-only dictionary: the keys are package
//! names and the values are the corresponding packages' live metadata
//! trees, fetched from the registry's JSON API on every access. The set
//! of keys comes from a periodically refreshed local cache of all
//! package names, from one user's projects, or from an explicit
//! collection.
//!
//! # Overview
//!
//! ```no_run
//! use pydex::Pypi;
//!
//! # fn main() -> pydex::Result<()> {
//! let p = Pypi::all()?;
//!
//! // The keys of this mapping are the project names. There are lots!
//! assert!(p.len() > 400_000);
//! assert!(p.contains("numpy") && p.contains("dol"));
//! assert!(!p.contains("no_way_this_is_a_package"));
//!
//! // Values are fetched live, one request per lookup.
//! let info = p.get("numpy")?;
//! assert!(info.get("releases").is_some());
//! # Ok(())
//! # }
//! ```
//!
//! The list of all project names is taken from a local file, not the
//! network. Update that file regularly (but not TOO regularly) to stay
//! in sync with the registry:
//!
//! ```no_run
//! pydex::Pypi::refresh_cached_package_names()?;
//! # Ok::<(), pydex::Error>(())
//! ```
//!
//! To work with a smaller collection, scope the mapping to a user's
//! projects or to an explicit set of names:
//!
//! ```no_run
//! use pydex::Pypi;
//!
//! # fn main() -> pydex::Result<()> {
//! let mine = Pypi::for_user("thorwhalen1")?;
//!
//! let few = Pypi::from_names(["numpy", "pandas", "dol"])?;
//! assert_eq!(few.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod extract;
pub mod index;
pub mod mapping;
pub mod metadata;
pub mod names;
pub mod registry;
pub mod user;

pub use cache::{default_cache_path, NameCache};
pub use error::{Error, ErrorContext, Result};
pub use extract::{latest_release_upload_time, MainInfo};
pub use index::{NameIndex, NameListing, SimpleIndex};
pub use mapping::{Pypi, PypiBuilder};
pub use metadata::{MetadataFetcher, PackageInfo};
pub use names::NameSet;
pub use registry::Registry;
pub use user::{UserProject, UserProjects};
