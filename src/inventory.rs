//! Locally installed packages, as reported by pip

use std::collections::HashMap;
use std::process::Command;

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::package::{Package, PackageSet};

/// Name → installed version lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    versions: HashMap<String, String>,
}

impl Inventory {
    pub fn new(versions: HashMap<String, String>) -> Self {
        Self { versions }
    }

    /// Installed version of `name`, matched exactly as pip reports it
    pub fn installed_version(&self, name: &str) -> Option<&str> {
        self.versions.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Installed packages as a set, ordered by name
    pub fn to_package_set(&self, config: &Config) -> PackageSet {
        let mut entries: Vec<_> = self.versions.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
            .into_iter()
            .map(|(name, version)| Package::installed(config, name, version))
            .collect()
    }

    /// Parse the output of `pip list --format json`
    pub fn from_pip_json(output: &[u8]) -> Result<Self, serde_json::Error> {
        let entries: Vec<PipListEntry> = serde_json::from_slice(output)?;
        Ok(Self::new(
            entries
                .into_iter()
                .map(|entry| (entry.name, entry.version))
                .collect(),
        ))
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Inventory {
    fn from(entries: [(&str, &str); N]) -> Self {
        Self::new(
            entries
                .into_iter()
                .map(|(name, version)| (name.to_string(), version.to_string()))
                .collect(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct PipListEntry {
    name: String,
    version: String,
}

/// Source of the local inventory
#[cfg_attr(test, automock)]
pub trait InstalledPackages {
    /// Build the inventory. Failures degrade to an empty inventory.
    fn load(&self) -> Inventory;
}

/// Reads the inventory by running `pip list --format json`
pub struct PipInventory {
    command: Vec<String>,
}

impl PipInventory {
    pub fn new(config: &Config) -> Self {
        Self {
            command: config.pip_command.clone(),
        }
    }
}

impl InstalledPackages for PipInventory {
    fn load(&self) -> Inventory {
        let Some((program, args)) = self.command.split_first() else {
            warn!("No pip command configured, assuming nothing is installed");
            return Inventory::default();
        };

        debug!("Listing installed packages with {:?}", self.command);
        let output = match Command::new(program)
            .args(args)
            .args(["list", "--format", "json"])
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to run {}: {}", program, e);
                return Inventory::default();
            }
        };

        if !output.status.success() {
            warn!(
                "{} list exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Inventory::default();
        }

        match Inventory::from_pip_json(&output.stdout) {
            Ok(inventory) => {
                debug!("Found {} installed packages", inventory.len());
                inventory
            }
            Err(e) => {
                warn!("Failed to parse {} list output: {}", program, e);
                Inventory::default()
            }
        }
    }
}
