//! Version annotation against the local inventory

use std::fmt;

use crate::inventory::Inventory;
use crate::package::Package;

/// How a result's version relates to the locally installed one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionDisplay<'a> {
    /// Not installed locally
    Unknown { version: &'a str },
    /// Installed with exactly this version
    Matches { version: &'a str },
    /// Installed with a different version
    Upgrade {
        version: &'a str,
        installed: &'a str,
    },
}

impl<'a> VersionDisplay<'a> {
    pub fn for_package(package: &'a Package, inventory: &'a Inventory) -> Self {
        let version = package.version.as_str();
        match inventory.installed_version(&package.name) {
            None => VersionDisplay::Unknown { version },
            Some(installed) if installed == version => VersionDisplay::Matches { version },
            Some(installed) => VersionDisplay::Upgrade { version, installed },
        }
    }
}

impl fmt::Display for VersionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionDisplay::Unknown { version } => write!(f, "{version}"),
            VersionDisplay::Matches { version } => write!(f, "{version} =="),
            VersionDisplay::Upgrade { version, installed } => write!(f, "{version} > {installed}"),
        }
    }
}
