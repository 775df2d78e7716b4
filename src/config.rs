use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::error::{Error, Result};

// =============================================================================
// Backend defaults
// =============================================================================

/// Name of the only supported backend
pub const PYPI_BACKEND: &str = "pypi";

/// PyPI's HTML search page
pub const DEFAULT_API_URL: &str = "https://pypi.org/search/";

/// Number of result pages fetched per query
pub const DEFAULT_PAGE_SIZE: u32 = 2;

/// Placeholder substituted with the package name in link templates
pub const LINK_NAME_PLACEHOLDER: &str = "{name}";

/// Timeout for a single page fetch (30 seconds)
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Search configuration, read-only once built
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub backend: String,
    pub api_url: String,
    pub page_size: u32,
    /// Sort key used when sorting is requested without naming a key
    pub sort_by: String,
    /// strftime pattern for the Released column
    pub date_format: String,
    pub link_template: String,
    /// strptime pattern of the `datetime` attribute served by the backend
    pub released_format: String,
    /// Program and leading arguments used to invoke pip
    pub pip_command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: PYPI_BACKEND.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: "name".to_string(),
            date_format: "%b %-d, %Y".to_string(),
            link_template: format!("https://pypi.org/project/{LINK_NAME_PLACEHOLDER}"),
            released_format: "%Y-%m-%dT%H:%M:%S%z".to_string(),
            pip_command: vec!["pip".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location if it exists.
    ///
    /// An explicitly given path must exist. A missing default file yields
    /// `Config::default()`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Check that the configuration points at the PyPI search page.
    ///
    /// Besides `DEFAULT_API_URL`, http(s) endpoints on a loopback host are
    /// accepted so a local stand-in can serve the same pages. Returns the parsed
    /// endpoint so callers can build request URLs from it.
    pub fn search_endpoint(&self) -> Result<Url> {
        let unsupported = || Error::UnsupportedBackend {
            backend: self.backend.clone(),
            api_url: self.api_url.clone(),
        };

        if self.backend != PYPI_BACKEND {
            return Err(unsupported());
        }

        let url = Url::parse(&self.api_url).map_err(|_| unsupported())?;
        let default = Url::parse(DEFAULT_API_URL).map_err(|_| unsupported())?;
        if url == default {
            return Ok(url);
        }

        let local = matches!(url.scheme(), "http" | "https")
            && url.host_str().is_some_and(is_loopback_host);
        if local { Ok(url) } else { Err(unsupported()) }
    }

    /// Default detail page link for a package
    pub fn package_link(&self, name: &str) -> String {
        self.link_template.replace(LINK_NAME_PLACEHOLDER, name)
    }
}

fn is_loopback_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("localhost")
        || host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback())
}

/// Returns the path to the configuration file.
/// Uses $XDG_CONFIG_HOME/pip-search/config.json (or the platform equivalent).
pub fn config_path() -> Option<PathBuf> {
    config_path_with_dir(dirs::config_dir())
}

fn config_path_with_dir(config_dir: Option<PathBuf>) -> Option<PathBuf> {
    config_dir.map(|dir| dir.join("pip-search").join("config.json"))
}
