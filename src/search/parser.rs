//! Extraction of package records from search result snippets

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::package::Package;
use crate::search::client::Snippet;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid result selector")
}

static SNIPPET: LazyLock<Selector> = LazyLock::new(|| selector(r#"a[class*="snippet"]"#));
static NAME: LazyLock<Selector> = LazyLock::new(|| selector(r#"span[class*="name"]"#));
static VERSION: LazyLock<Selector> = LazyLock::new(|| selector(r#"span[class*="version"]"#));
static RELEASED: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"span[class*="released"] time[datetime]"#));
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"p[class*="description"]"#));

/// Turns snippets into [`Package`] records
pub struct ResultParser {
    config: Config,
    base_url: Option<Url>,
}

impl ResultParser {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            base_url: Url::parse(&config.api_url).ok(),
        }
    }

    /// Parse one snippet. Fails with `MalformedResult` when name or version is
    /// missing; description and release date are optional.
    pub fn parse(&self, snippet: &Snippet) -> Result<Package> {
        let fragment = Html::parse_fragment(snippet.html());
        let Some(root) = fragment.select(&SNIPPET).next() else {
            return Err(Error::MalformedResult("no snippet anchor".to_string()));
        };

        let name = required_text(root, &NAME)
            .ok_or_else(|| Error::MalformedResult("missing name".to_string()))?;
        let version = required_text(root, &VERSION).ok_or_else(|| {
            Error::MalformedResult(format!("missing version for package '{name}'"))
        })?;
        let released = root
            .select(&RELEASED)
            .next()
            .and_then(|time| time.value().attr("datetime"))
            .and_then(|raw| self.parse_released(raw));
        let description = text(root, &DESCRIPTION).filter(|d| !d.is_empty());
        let link = root
            .value()
            .attr("href")
            .and_then(|href| self.resolve_link(href));

        Ok(Package::new(
            &self.config,
            name,
            version,
            released,
            description,
            link,
        ))
    }

    /// Parse a `datetime` attribute with the configured format, accepting RFC 3339
    /// as well. Unparseable timestamps are dropped.
    pub fn parse_released(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        let raw = raw.trim();
        DateTime::parse_from_str(raw, &self.config.released_format)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .inspect_err(|e| debug!("Ignoring release timestamp '{}': {}", raw, e))
            .ok()
    }

    fn resolve_link(&self, href: &str) -> Option<String> {
        match &self.base_url {
            Some(base) => base.join(href).ok().map(String::from),
            None => Some(href.to_string()),
        }
    }
}

fn text(root: ElementRef<'_>, selector: &Selector) -> Option<String> {
    root.select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

fn required_text(root: ElementRef<'_>, selector: &Selector) -> Option<String> {
    text(root, selector).filter(|value| !value.is_empty())
}
