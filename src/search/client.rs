//! PyPI search page client

use std::sync::LazyLock;

use reqwest::Url;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use tracing::debug;

use crate::config::{Config, FETCH_TIMEOUT};
use crate::error::{Error, Result};

static SNIPPET: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[class*="snippet"]"#).expect("valid snippet selector"));

/// Raw HTML of one search result anchor.
///
/// `scraper::ElementRef` borrows the page's `Html`, so the anchor is kept as
/// owned markup and [`crate::search::ResultParser::parse`] parses it again as a
/// fragment. Pages are fetched lazily and each page document is dropped once
/// its snippets are extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    html: String,
}

impl Snippet {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Blocking client for the search endpoint
pub struct SearchClient {
    client: Client,
    endpoint: Url,
    page_size: u32,
}

impl SearchClient {
    /// Fails with `UnsupportedBackend` before any request is made if the
    /// configuration does not point at the PyPI search page.
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = config.search_endpoint()?;
        let client = Client::builder()
            .user_agent(concat!("pip-search/", env!("CARGO_PKG_VERSION")))
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(Error::HttpClient)?;

        Ok(Self {
            client,
            endpoint,
            page_size: config.page_size,
        })
    }

    /// Lazily fetch pages `1..=page_size` and yield their snippets in order.
    ///
    /// A failing page yields one `SearchFailed` error and ends the sequence.
    pub fn search(&self, query: &str) -> Snippets<'_> {
        Snippets {
            client: self,
            query: query.to_string(),
            next_page: 1,
            buffered: Vec::new().into_iter(),
            finished: false,
        }
    }

    /// URL of one results page
    pub fn page_url(&self, query: &str, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("page", &page.to_string());
        url
    }

    /// Fetch a single results page and extract its snippets
    pub fn fetch_page(&self, query: &str, page: u32) -> Result<Vec<Snippet>> {
        let url = self.page_url(query, page);
        debug!("Fetching search page: {}", url);

        let failed = |source: reqwest::Error| Error::SearchFailed { page, source };
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(failed)?;

        let snippets = extract_snippets(&body);
        debug!("Found {} snippets on page {}", snippets.len(), page);
        Ok(snippets)
    }
}

/// Select every result anchor in a results page
pub fn extract_snippets(body: &str) -> Vec<Snippet> {
    Html::parse_document(body)
        .select(&SNIPPET)
        .map(|element| Snippet::new(element.html()))
        .collect()
}

/// Forward-only sequence of snippets across all configured pages
pub struct Snippets<'a> {
    client: &'a SearchClient,
    query: String,
    next_page: u32,
    buffered: std::vec::IntoIter<Snippet>,
    finished: bool,
}

impl Iterator for Snippets<'_> {
    type Item = Result<Snippet>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(snippet) = self.buffered.next() {
                return Some(Ok(snippet));
            }
            if self.finished || self.next_page > self.client.page_size {
                return None;
            }

            let page = self.next_page;
            self.next_page += 1;
            match self.client.fetch_page(&self.query, page) {
                Ok(snippets) => self.buffered = snippets.into_iter(),
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
