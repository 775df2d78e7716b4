//! Output of package sets as tables or JSON
//!
//! - [`annotate`]: version display relative to the local inventory
//! - [`table`]: aligned text tables with optional styling

pub mod annotate;
pub mod table;

use std::fmt::Write as _;
use std::io::Write;
use std::str::FromStr;

use console::Style;
use reqwest::Url;
use tracing::warn;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::inventory::{InstalledPackages, Inventory};
use crate::package::{Package, PackageSet};
use annotate::VersionDisplay;
use table::{Cell, Table};

/// Output format for a package set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Styled table for interactive terminals
    #[default]
    Rich,
    /// Unstyled table with an explicit link column
    Plain,
    /// JSON array of package records
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "rich" => Ok(OutputFormat::Rich),
            "plain" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::InvalidFormat(other.to_string())),
        }
    }
}

pub struct Renderer {
    config: Config,
    endpoint: Url,
    styling: bool,
}

impl Renderer {
    /// Fails with `UnsupportedBackend` like [`crate::search::SearchClient::new`].
    /// Rich output is styled only when the terminal supports it.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            endpoint: config.search_endpoint()?,
            styling: console::colors_enabled(),
        })
    }

    pub fn with_styling(mut self, styling: bool) -> Self {
        self.styling = styling;
        self
    }

    /// Render search results for `query`.
    ///
    /// Table formats load the local inventory once to annotate versions; JSON
    /// output never consults it.
    pub fn render<W: Write>(
        &self,
        set: &PackageSet,
        query: &str,
        format: OutputFormat,
        installed: &dyn InstalledPackages,
        out: &mut W,
    ) -> Result<()> {
        match format {
            OutputFormat::Json => write_json(set, out),
            OutputFormat::Rich | OutputFormat::Plain => {
                let inventory = installed.load();
                let title = self.search_url(query);
                self.write_table(set, &title, format, &inventory, out)
            }
        }
    }

    /// Render the local inventory itself; versions are not annotated
    pub fn render_installed<W: Write>(
        &self,
        set: &PackageSet,
        format: OutputFormat,
        out: &mut W,
    ) -> Result<()> {
        match format {
            OutputFormat::Json => write_json(set, out),
            OutputFormat::Rich | OutputFormat::Plain => self.write_table(
                set,
                "Installed packages",
                format,
                &Inventory::default(),
                out,
            ),
        }
    }

    /// Search page URL shown in the table heading
    pub fn search_url(&self, query: &str) -> String {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);
        url.to_string()
    }

    /// Format a release timestamp with the configured date pattern
    pub fn format_released(&self, package: &Package) -> String {
        let Some(released) = package.released else {
            return String::new();
        };
        let mut formatted = String::new();
        if write!(formatted, "{}", released.format(&self.config.date_format)).is_err() {
            warn!(
                "Invalid date format '{}', falling back to ISO dates",
                self.config.date_format
            );
            return released.date_naive().to_string();
        }
        formatted
    }

    fn write_table<W: Write>(
        &self,
        set: &PackageSet,
        title: &str,
        format: OutputFormat,
        inventory: &Inventory,
        out: &mut W,
    ) -> Result<()> {
        let rich = format == OutputFormat::Rich;
        let table = self.build_table(set, title, rich, inventory);
        table.write(out, rich && self.styling)?;
        Ok(())
    }

    fn build_table(&self, set: &PackageSet, title: &str, rich: bool, inventory: &Inventory) -> Table {
        let mut table = if rich {
            Table::new(format!("🐍 {title} 🐍")).title_style(Style::new().bold().magenta())
        } else {
            Table::new(title)
        };
        table.add_column("Package", Some(Style::new().cyan()));
        table.add_column("Version", Some(Style::new().bold().yellow()));
        table.add_column("Released", Some(Style::new().bold().green()));
        table.add_column("Description", Some(Style::new().bold().blue()));
        if !rich {
            table.add_column("Link", None);
        }

        for package in set {
            let display = VersionDisplay::for_package(package, inventory);
            let version = match display {
                VersionDisplay::Matches { .. } => {
                    Cell::new(display.to_string()).style(Style::new().bold().cyan())
                }
                VersionDisplay::Upgrade { .. } => {
                    Cell::new(display.to_string()).style(Style::new().bold().magenta())
                }
                VersionDisplay::Unknown { .. } => Cell::new(display.to_string()),
            };

            let name = if rich {
                Cell::new(package.name.as_str()).link(package.link.as_str())
            } else {
                Cell::new(package.name.as_str())
            };
            let mut row = vec![
                name,
                version,
                Cell::new(self.format_released(package)),
                Cell::new(package.description.as_deref().unwrap_or_default()),
            ];
            if !rich {
                row.push(Cell::new(package.link.as_str()));
            }
            table.add_row(row);
        }
        table
    }
}

fn write_json<W: Write>(set: &PackageSet, out: &mut W) -> Result<()> {
    writeln!(out, "{}", set.to_json()?)?;
    Ok(())
}
