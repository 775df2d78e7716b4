//! Fake PyPI search pages and inventories

use std::cell::Cell;

use pip_search::inventory::{InstalledPackages, Inventory};

/// One result anchor as served by the PyPI search page
pub fn snippet(name: &str, version: &str, released: &str, description: &str) -> String {
    format!(
        r#"<a class="package-snippet" href="/project/{name}/">
  <h3 class="package-snippet__title">
    <span class="package-snippet__name">{name}</span>
    <span class="package-snippet__version">{version}</span>
    <span class="package-snippet__released"><time datetime="{released}" data-controller="localized-time">date</time></span>
  </h3>
  <p class="package-snippet__description">{description}</p>
</a>"#
    )
}

pub fn snippet_without_version(name: &str) -> String {
    format!(
        r#"<a class="package-snippet" href="/project/{name}/">
  <h3 class="package-snippet__title">
    <span class="package-snippet__name">{name}</span>
  </h3>
</a>"#
    )
}

/// A full results page wrapping the given snippets
pub fn search_page(snippets: &[String]) -> String {
    let items: String = snippets
        .iter()
        .map(|s| format!("<li>{s}</li>\n"))
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>Search results · PyPI</title></head>
<body>
  <nav><a class="horizontal-menu__link" href="/help/">Help</a></nav>
  <ul class="unstyled" aria-label="Search results">
{items}  </ul>
</body>
</html>"#
    )
}

/// Inventory source returning fixed entries and counting loads
pub struct StaticInventory {
    inventory: Inventory,
    loads: Cell<usize>,
}

impl StaticInventory {
    pub fn new<const N: usize>(entries: [(&str, &str); N]) -> Self {
        Self {
            inventory: Inventory::from(entries),
            loads: Cell::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.get()
    }
}

impl InstalledPackages for StaticInventory {
    fn load(&self) -> Inventory {
        self.loads.set(self.loads.get() + 1);
        self.inventory.clone()
    }
}
