//! Query → parse → render pipeline

use std::io::Write;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::inventory::{InstalledPackages, PipInventory};
use crate::package::{PackageSet, SortKey};
use crate::render::{OutputFormat, Renderer};
use crate::search::{ResultParser, SearchClient};

/// Search session bound to one validated configuration
pub struct PipSearch {
    config: Config,
    client: SearchClient,
    parser: ResultParser,
    renderer: Renderer,
}

impl PipSearch {
    /// Fails with `UnsupportedBackend` before any network activity when the
    /// configuration does not describe the PyPI search page.
    pub fn new(config: Config) -> Result<Self> {
        let client = SearchClient::new(&config)?;
        Ok(Self {
            parser: ResultParser::new(&config),
            renderer: Renderer::new(&config)?,
            client,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Fetch and parse every configured page for `query`.
    ///
    /// A blank query returns an empty set without touching the network.
    /// Snippets missing a name or version are skipped; transport failures abort.
    pub fn query(&self, query: &str) -> Result<PackageSet> {
        if query.trim().is_empty() {
            return Ok(PackageSet::default());
        }

        let mut packages = Vec::new();
        let mut skipped = 0usize;
        for snippet in self.client.search(query) {
            match self.parser.parse(&snippet?) {
                Ok(package) => packages.push(package),
                Err(Error::MalformedResult(reason)) => {
                    warn!("Skipping search result: {}", reason);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Query '{}' returned {} packages ({} skipped)",
            query,
            packages.len(),
            skipped
        );
        Ok(PackageSet::new(packages))
    }

    /// Query, sort and render in one step. A blank query renders nothing.
    pub fn run<W: Write>(
        &self,
        query: &str,
        sort: Option<SortKey>,
        format: OutputFormat,
        out: &mut W,
    ) -> Result<PackageSet> {
        if query.trim().is_empty() {
            return Ok(PackageSet::default());
        }

        let mut set = self.query(query)?;
        set.sort(sort);
        self.render_set(&set, query, format, &PipInventory::new(&self.config), out)?;
        Ok(set)
    }

    pub fn render_set<W: Write>(
        &self,
        set: &PackageSet,
        query: &str,
        format: OutputFormat,
        installed: &dyn InstalledPackages,
        out: &mut W,
    ) -> Result<()> {
        self.renderer.render(set, query, format, installed, out)
    }

    /// List the locally installed packages instead of searching
    pub fn list_installed<W: Write>(
        &self,
        installed: &dyn InstalledPackages,
        sort: Option<SortKey>,
        format: OutputFormat,
        out: &mut W,
    ) -> Result<PackageSet> {
        let mut set = installed.load().to_package_set(&self.config);
        set.sort(sort);
        self.renderer.render_installed(&set, format, out)?;
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Inventory, MockInstalledPackages};

    #[test]
    fn new_rejects_unsupported_backend() {
        let config = Config {
            api_url: "not_implemented".to_string(),
            ..Config::default()
        };

        assert!(matches!(
            PipSearch::new(config),
            Err(Error::UnsupportedBackend { .. })
        ));
    }

    #[test]
    fn new_rejects_foreign_index_endpoint() {
        let config = Config {
            api_url: "https://libraries.io/search".to_string(),
            ..Config::default()
        };

        assert!(matches!(
            PipSearch::new(config),
            Err(Error::UnsupportedBackend { .. })
        ));
    }

    #[test]
    fn query_with_blank_terms_is_empty_without_requests() {
        // An unreachable endpoint proves no request is made
        let config = Config {
            api_url: "http://127.0.0.1:1/search/".to_string(),
            ..Config::default()
        };
        let search = PipSearch::new(config).unwrap();

        assert!(search.query("").unwrap().is_empty());
        assert!(search.query("   ").unwrap().is_empty());
    }

    #[test]
    fn run_with_blank_query_writes_nothing() {
        let config = Config {
            api_url: "http://127.0.0.1:1/search/".to_string(),
            ..Config::default()
        };
        let search = PipSearch::new(config).unwrap();
        let mut out = Vec::new();

        let set = search.run("", None, OutputFormat::Plain, &mut out).unwrap();

        assert!(set.is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn list_installed_renders_inventory_sorted() {
        let search = PipSearch::new(Config::default())
            .unwrap()
            .with_renderer(Renderer::new(&Config::default()).unwrap().with_styling(false));
        let mut mock = MockInstalledPackages::new();
        mock.expect_load()
            .times(1)
            .returning(|| Inventory::from([("zope", "5.0"), ("attrs", "23.2.0")]));
        let mut out = Vec::new();

        let set = search
            .list_installed(&mock, Some(SortKey::Name), OutputFormat::Json, &mut out)
            .unwrap();

        let names: Vec<&str> = set.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["attrs", "zope"]);
        assert!(String::from_utf8(out).unwrap().contains(r#""name":"zope""#));
    }
}
