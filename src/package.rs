//! Package records and the ordered set returned by a search

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use pep508_rs::pep440_rs::Version;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;

/// One search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub released: Option<DateTime<FixedOffset>>,
    pub description: Option<String>,
    pub link: String,
}

impl Package {
    /// Build a package, falling back to the configured link template when no
    /// link (or an empty one) is given.
    pub fn new(
        config: &Config,
        name: String,
        version: String,
        released: Option<DateTime<FixedOffset>>,
        description: Option<String>,
        link: Option<String>,
    ) -> Self {
        let link = link
            .filter(|link| !link.is_empty())
            .unwrap_or_else(|| config.package_link(&name));
        Self {
            name,
            version,
            released,
            description,
            link,
        }
    }

    /// Package entry from a local installation listing
    pub fn installed(config: &Config, name: &str, version: &str) -> Self {
        Self::new(
            config,
            name.to_string(),
            version.to_string(),
            None,
            None,
            None,
        )
    }
}

/// Key used to order a [`PackageSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Version,
    Released,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortKey::Name),
            "version" => Ok(SortKey::Version),
            "released" => Ok(SortKey::Released),
            other => Err(Error::InvalidSortKey(other.to_string())),
        }
    }
}

/// Packages in arrival order until sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSet {
    packages: Vec<Package>,
}

impl PackageSet {
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Package> {
        self.packages.iter()
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Stable in-place sort. `None` keeps arrival order.
    pub fn sort(&mut self, key: Option<SortKey>) {
        match key {
            None => {}
            Some(SortKey::Name) => self.packages.sort_by_cached_key(|p| p.name.to_lowercase()),
            Some(SortKey::Version) => self
                .packages
                .sort_by_cached_key(|p| VersionKey::parse(&p.version)),
            // Packages without a release date go last
            Some(SortKey::Released) => {
                self.packages
                    .sort_by(|a, b| match (a.released, b.released) {
                        (Some(a), Some(b)) => a.cmp(&b),
                        (Some(_), None) => Ordering::Less,
                        (None, Some(_)) => Ordering::Greater,
                        (None, None) => Ordering::Equal,
                    })
            }
        }
    }

    /// Sort by a key given as text, e.g. from the command line
    pub fn sort_by(&mut self, key: Option<&str>) -> Result<(), Error> {
        let key = key.map(SortKey::from_str).transpose()?;
        self.sort(key);
        Ok(())
    }

    /// JSON array of the packages' public fields
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&self.packages)?)
    }
}

impl<'a> IntoIterator for &'a PackageSet {
    type Item = &'a Package;
    type IntoIter = std::slice::Iter<'a, Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}

impl FromIterator<Package> for PackageSet {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// PEP 440 ordering key of the public version, with a local build (`1.0+cpu`)
/// placed below its release. Unparseable versions compare greater than any
/// valid one.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum VersionKey {
    Valid { public: Version, release: bool },
    Invalid,
}

impl VersionKey {
    fn parse(version: &str) -> Self {
        let (public, local) = match version.split_once('+') {
            Some((public, local)) => (public, Some(local)),
            None => (version, None),
        };
        match Version::from_str(public) {
            Ok(public) if local.is_none_or(|l| !l.is_empty()) => VersionKey::Valid {
                public,
                release: local.is_none(),
            },
            _ => VersionKey::Invalid,
        }
    }
}
