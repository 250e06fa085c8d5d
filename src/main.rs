use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use mcp_directory::{
    cache::Cache,
    config::Config,
    listing::{categories, search, summarize, DirectoryStats, SortOrder},
    markdown::MarkdownRenderer,
    output::{format_listing, format_report, format_stats, OutputFormat, PackageReport, StatsReport},
    readme::ReadmeFetcher,
    Directory,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const NOT_FOUND: u8 = 2;
}

#[derive(Parser)]
#[command(name = "mcp-directory")]
#[command(
    author,
    version,
    about = "Browse a directory of MCP server packages and their security reviews"
)]
struct Cli {
    /// Directory of package records (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Skip malformed records instead of failing
    #[arg(long, global = true)]
    skip_malformed: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List packages
    List {
        /// Free-text filter over name, author, description and tags
        #[arg(short, long)]
        search: Option<String>,

        /// Sort order (popular, recent, security, vulnerabilities)
        #[arg(long, default_value = "popular")]
        sort: String,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Show one package
    Show {
        /// Package name, short name or identifier fragment
        name: String,

        /// Version to show (defaults to the latest)
        #[arg(long)]
        version: Option<String>,

        /// Fetch and include the README
        #[arg(long)]
        readme: bool,

        /// Output format (table, json, html)
        #[arg(short, long)]
        format: Option<String>,

        /// Write output to file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show directory statistics
    Stats {
        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Fetch the README of a GitHub repository
    Readme {
        /// Repository URL
        url: String,

        /// Render the README to HTML
        #[arg(long)]
        html: bool,
    },

    /// Render a Markdown file to an HTML fragment
    Render {
        file: PathBuf,

        /// Use the styled theme
        #[arg(long)]
        styled: bool,

        /// Escape raw HTML in the input
        #[arg(long)]
        escape_html: bool,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Clear the README cache
    ClearCache,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    let mut config = Config::load()?;

    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if cli.skip_malformed {
        config.skip_malformed = true;
    }

    match cli.command {
        Commands::List {
            search: query,
            sort,
            format,
        } => {
            let format = parse_format(format.as_deref(), &config)?;
            let sort = SortOrder::from_str(&sort).map_err(|e| anyhow::anyhow!(e))?;
            let records = directory(&config).list_all()?;

            let summaries = summarize(&records, Utc::now());
            let mut matched = search(&summaries, query.as_deref().unwrap_or(""));
            sort.sort(&mut matched);

            print!("{}", format_listing(&matched, format)?);
            Ok(exit_codes::SUCCESS)
        }
        Commands::Show {
            name,
            version,
            readme,
            format,
            output,
        } => {
            let format = parse_format(format.as_deref(), &config)?;
            run_show(&config, &name, version.as_deref(), readme, format, output).await
        }
        Commands::Stats { format } => {
            let format = parse_format(format.as_deref(), &config)?;
            let records = directory(&config).list_all()?;
            let categories = categories(&records);
            let report = StatsReport {
                stats: DirectoryStats::compute(&records, Utc::now()),
                categories: &categories,
            };

            print!("{}", format_stats(&report, format)?);
            Ok(exit_codes::SUCCESS)
        }
        Commands::Readme { url, html } => {
            let fetcher = ReadmeFetcher::from_config(&config)?;
            match fetch_with_spinner(&fetcher, &url, true).await {
                Some(text) if html => {
                    println!("{}", MarkdownRenderer::new().render(&text));
                    Ok(exit_codes::SUCCESS)
                }
                Some(text) => {
                    println!("{}", text);
                    Ok(exit_codes::SUCCESS)
                }
                None => {
                    eprintln!("No README found for {}", url);
                    Ok(exit_codes::NOT_FOUND)
                }
            }
        }
        Commands::Render {
            file,
            styled,
            escape_html,
        } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {:?}", file))?;
            let renderer = if styled {
                MarkdownRenderer::styled()
            } else {
                MarkdownRenderer::new()
            };
            println!("{}", renderer.escape_html(escape_html).render(&text));
            Ok(exit_codes::SUCCESS)
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
        Commands::ClearCache => {
            let cache = Cache::with_ttl_hours(config.readme.cache_ttl_hours);
            let removed = cache.clear()?;
            println!("Cache cleared ({} entries).", removed);
            Ok(exit_codes::SUCCESS)
        }
    }
}

async fn run_show(
    config: &Config,
    name: &str,
    version: Option<&str>,
    with_readme: bool,
    format: OutputFormat,
    output_file: Option<PathBuf>,
) -> Result<u8> {
    let record = match directory(config).find_by_name(name)? {
        Some(record) => record,
        None => {
            eprintln!("Package not found: {}", name);
            return Ok(exit_codes::NOT_FOUND);
        }
    };

    let report = match PackageReport::new(&record, version) {
        Some(report) => report,
        None => {
            eprintln!("Package {} has no versions", record.identifier);
            return Ok(exit_codes::NOT_FOUND);
        }
    };
    if let Some(requested) = version {
        if report.version.version != requested {
            eprintln!(
                "Version {} not found, showing {}",
                requested, report.version.version
            );
        }
    }

    let readme = if with_readme {
        let fetcher = ReadmeFetcher::from_config(config)?;
        let interactive = format == OutputFormat::Table && output_file.is_none();
        fetch_with_spinner(&fetcher, &record.repository.url, interactive).await
    } else {
        None
    };
    let report = report.with_readme(readme);

    let rendered = format_report(&report, format)?;
    match output_file {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {:?}", path))?;
            if format == OutputFormat::Table {
                println!("Report written to: {}", path.display());
            }
        }
        None => print!("{}", rendered),
    }

    Ok(exit_codes::SUCCESS)
}

async fn fetch_with_spinner(
    fetcher: &ReadmeFetcher,
    url: &str,
    interactive: bool,
) -> Option<String> {
    let progress = if interactive {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Fetching README...");
        Some(pb)
    } else {
        None
    };

    let readme = fetcher.fetch(url).await;
    debug!(url, found = readme.is_some(), "README lookup finished");

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    readme
}

fn directory(config: &Config) -> Directory {
    Directory::new(config.data_dir.clone(), config.malformed_policy())
}

fn parse_format(flag: Option<&str>, config: &Config) -> Result<OutputFormat> {
    let format = flag.unwrap_or(config.default_format.as_str());
    OutputFormat::from_str(format).map_err(|e| anyhow::anyhow!(e))
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        Config::default().save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'mcp-directory config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
