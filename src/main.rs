use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use pip_search::config::Config;
use pip_search::inventory::PipInventory;
use pip_search::package::SortKey;
use pip_search::render::OutputFormat;
use pip_search::PipSearch;

#[derive(Parser)]
#[command(name = "pip-search")]
#[command(version, about = "Search for packages on PyPI")]
struct Cli {
    /// Terms to search the PyPI package repository
    query: Vec<String>,

    /// Sort results by name, version or released (bare flag uses the configured default)
    #[arg(short, long, value_name = "KEY", num_args = 0..=1)]
    sort: Option<Option<String>>,

    /// Output format: rich, plain or json
    #[arg(short, long, default_value = "rich")]
    format: String,

    /// strftime pattern for release dates
    #[arg(long, value_name = "FMT")]
    date_format: Option<String>,

    /// Number of result pages to fetch
    #[arg(short, long, value_name = "N")]
    pages: Option<u32>,

    /// Path to a JSON configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// List locally installed packages instead of searching
    #[arg(short, long)]
    local: bool,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("PIP_SEARCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    if cli.query.is_empty() && !cli.local {
        eprintln!("{}", Cli::command().render_help());
        return Ok(ExitCode::FAILURE);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(date_format) = cli.date_format {
        config.date_format = date_format;
    }
    if let Some(pages) = cli.pages {
        config.page_size = pages;
    }

    let sort = match cli.sort {
        None => None,
        Some(None) => Some(config.sort_by.parse::<SortKey>()?),
        Some(Some(key)) => Some(key.parse::<SortKey>()?),
    };
    let format: OutputFormat = cli.format.parse()?;

    let search = PipSearch::new(config)?;
    let mut out = std::io::stdout().lock();

    if cli.local {
        let installed = PipInventory::new(search.config());
        search.list_installed(&installed, sort, format, &mut out)?;
    } else {
        search.run(&cli.query.join(" "), sort, format, &mut out)?;
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sort_flag_without_value_is_distinguished_from_absent() {
        let bare = Cli::try_parse_from(["pip-search", "requests", "--sort"]).unwrap();
        let absent = Cli::try_parse_from(["pip-search", "requests"]).unwrap();
        let named = Cli::try_parse_from(["pip-search", "--sort", "version", "requests"]).unwrap();

        assert_eq!(bare.sort, Some(None));
        assert_eq!(absent.sort, None);
        assert_eq!(named.sort, Some(Some("version".to_string())));
        assert_eq!(named.query, vec!["requests".to_string()]);
    }

    #[test]
    fn query_terms_are_collected() {
        let cli = Cli::try_parse_from(["pip-search", "http", "client", "-f", "json"]).unwrap();

        assert_eq!(cli.query, vec!["http", "client"]);
        assert_eq!(cli.format, "json");
    }
}
