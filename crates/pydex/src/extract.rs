//! Convenience extractors over fetched metadata trees.
//!
//! [`Pypi::get`](crate::Pypi::get) hands back the registry's JSON
//! verbatim. The helpers here reshape an already-fetched tree into the
//! handful of fields most callers actually want; they perform no I/O
//! and never fail; absent fields simply come back empty.

use std::cmp::Ordering;

use serde_json::Value;

use crate::metadata::PackageInfo;

/// The main fields of a package, pulled out of a metadata tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MainInfo {
    pub version: Option<String>,
    pub summary: Option<String>,
    pub home_page: Option<String>,
    pub project_url: Option<String>,
    pub license: Option<String>,
    pub description: Option<String>,
    pub requires_dist: Vec<String>,
    /// Size of the current version's source distribution (or wheel, if
    /// no sdist was uploaded).
    pub size: Option<u64>,
    /// Upload time of that same file.
    pub upload_time_iso_8601: Option<String>,
}

impl MainInfo {
    /// Extracts the main fields from `info`.
    ///
    /// For the release matching `info.version`, the source distribution
    /// is preferred over a wheel when picking the file whose size and
    /// upload time are reported.
    pub fn from_info(info: &PackageInfo) -> Self {
        let general = info.get("info");
        let str_field = |key: &str| {
            general
                .and_then(|g| g.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let mut main = Self {
            version: str_field("version"),
            summary: str_field("summary"),
            home_page: str_field("home_page"),
            project_url: str_field("project_url"),
            license: str_field("license"),
            description: str_field("description"),
            requires_dist: general
                .and_then(|g| g.get("requires_dist"))
                .and_then(Value::as_array)
                .map(|reqs| {
                    reqs.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            size: None,
            upload_time_iso_8601: None,
        };

        if let Some(version) = &main.version {
            let files = info
                .get("releases")
                .and_then(|releases| releases.get(version))
                .and_then(Value::as_array);
            if let Some(files) = files {
                let file = find_package_type(files, "sdist")
                    .or_else(|| find_package_type(files, "bdist_wheel"));
                if let Some(file) = file {
                    main.size = file.get("size").and_then(Value::as_u64);
                    main.upload_time_iso_8601 = file
                        .get("upload_time_iso_8601")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                }
            }
        }

        main
    }
}

fn find_package_type<'a>(files: &'a [Value], package_type: &str) -> Option<&'a Value> {
    files
        .iter()
        .find(|file| file.get("packagetype").and_then(Value::as_str) == Some(package_type))
}

/// Upload time of the first file of the latest release in a `releases`
/// table, or `None` on empty or malformed data.
///
/// Versions are ordered by comparing numeric segments, with any
/// non-numeric remainder breaking ties lexicographically. That is
/// deliberately lenient; pre-release tags are not given special
/// treatment.
pub fn latest_release_upload_time(releases: &Value) -> Option<String> {
    let table = releases.as_object()?;
    let latest = table
        .keys()
        .max_by(|a, b| compare_versions(a.as_str(), b.as_str()))?;

    table
        .get(latest)?
        .as_array()?
        .first()?
        .get("upload_time")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn compare_versions(a: &str, b: &str) -> Ordering {
    version_key(a).cmp(&version_key(b))
}

fn version_key(version: &str) -> Vec<(u64, String)> {
    version
        .split(['.', '-', '+'])
        .map(|segment| {
            let digits_end = segment
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(segment.len());
            let (digits, rest) = segment.split_at(digits_end);
            (digits.parse().unwrap_or(0), rest.to_ascii_lowercase())
        })
        .collect()
}
