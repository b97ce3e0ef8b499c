//! The local package-name cache file.
//!
//! The full listing of registry package names is kept in a plain-text
//! file, one name per line, so that constructing a full-index mapping
//! never triggers a full-listing network call. The file is only ever
//! written by an explicit refresh.

use std::{
    env,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, ErrorContext, Result},
    names::NameSet,
};

/// File name of the cache inside the pydex cache directory.
pub const CACHE_FILE_NAME: &str = "package-names.txt";

/// Reads and writes the line-delimited package-name cache.
#[derive(Clone, Debug)]
pub struct NameCache {
    path: PathBuf,
}

impl Default for NameCache {
    fn default() -> Self {
        Self::new(default_cache_path())
    }
}

impl NameCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cached name set.
    ///
    /// Surrounding whitespace is trimmed and blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CacheMissing`] if the file does not exist (no
    /// refresh has ever run), or [`Error::Io`] if it cannot be read.
    pub fn load(&self) -> Result<NameSet> {
        if !self.path.exists() {
            return Err(Error::CacheMissing {
                path: self.path.clone(),
            });
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading name cache {}", self.path.display()))?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect())
    }

    /// Overwrites the cache with `names`, one per line with a trailing
    /// newline, creating parent directories as needed.
    ///
    /// Names are written in the set's stored order; a later [`load`]
    /// yields the same set back.
    ///
    /// [`load`]: NameCache::load
    pub fn save(&self, names: &NameSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating cache directory {}", parent.display()))?;
        }

        let file = File::create(&self.path)
            .with_context(|| format!("creating name cache {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        for name in names.iter() {
            writeln!(writer, "{name}")
                .with_context(|| format!("writing to name cache {}", self.path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("flushing name cache {}", self.path.display()))?;
        Ok(())
    }
}

/// Default location of the name cache:
/// `$XDG_CACHE_HOME/pydex/package-names.txt`, falling back to
/// `~/.cache/pydex/package-names.txt`.
pub fn default_cache_path() -> PathBuf {
    xdg_cache_home().join("pydex").join(CACHE_FILE_NAME)
}

fn xdg_cache_home() -> PathBuf {
    env::var("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".cache"))
}

fn home_dir() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}
