// SPDX-License-Identifier: GPL-3.0-or-later

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vanda_client::{
    ImageOptions, ModeSelector, PromptModeSelector, SearchMode, SearchRequest, VandaClient,
};
use vanda_config::{load as load_config, AppConfig};

#[derive(Debug, Parser)]
#[command(author, version, about = "Search the V&A collections API")]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search objects and print the matching records.
    Search(SearchArgs),
    /// Summary statistics for one page of a general search.
    Summary(PageArgs),
    /// Image URLs for the records on one results page.
    Images(ImageArgs),
    /// Top term of every collection facet for a query.
    Clusters {
        query: String,
    },
}

#[derive(Debug, Args)]
struct PageArgs {
    query: String,

    /// Page number (defaults to the configured value).
    #[arg(long)]
    page: Option<u32>,

    /// Records per page, at most 100 (defaults to the configured value).
    #[arg(long)]
    page_size: Option<u32>,
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[command(flatten)]
    page: PageArgs,

    /// 1-5 or one-five; prompts on the terminal when omitted.
    #[arg(long, value_parser = parse_mode)]
    mode: Option<SearchMode>,
}

#[derive(Debug, Args)]
struct ImageArgs {
    #[command(flatten)]
    search: SearchArgs,

    #[arg(long)]
    region: Option<String>,

    #[arg(long)]
    size: Option<String>,

    #[arg(long)]
    rotation: Option<String>,

    #[arg(long)]
    quality: Option<String>,

    #[arg(long)]
    format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_with_logging(cli.config.as_deref(), io::stderr)?;
    init_tracing(&config.telemetry.log_level);

    let client = VandaClient::builder()
        .base_url(config.api.base_url.clone())
        .image_base_url(config.api.image_base_url.clone())
        .timeout(Duration::from_secs(config.api.timeout_secs))
        .build()?;

    match cli.command {
        Command::Search(args) => {
            let request = page_request(&args.page, &config, config.search.page_size);
            let mut selector = mode_selector(args.mode);
            match client.search(&request, &mut *selector).await? {
                Some(response) => print_json(&response.records)?,
                None => println!("No results!"),
            }
        }
        Command::Summary(args) => {
            let request = page_request(&args, &config, config.search.page_size);
            match client.page_summary(&request).await? {
                Some(summary) => print_json(&summary)?,
                None => println!("No summary statistics can be computed as there were no results!"),
            }
        }
        Command::Images(args) => {
            let request = page_request(&args.search.page, &config, config.search.image_page_size);
            let options = image_options(&args, &config);
            let mut selector = mode_selector(args.search.mode);
            let urls = client.image_urls(&request, &mut *selector, &options).await?;
            if urls.is_empty() {
                println!("No image ids are associated with your query");
            }
            for url in urls {
                println!("{url}");
            }
        }
        Command::Clusters { query } => {
            let summary = client.cluster_summary(&query).await?;
            println!(
                "{} matching object records for query {}:",
                summary.record_count, query
            );
            for (facet, value) in &summary.top_terms {
                println!("{facet}: {value}");
            }
        }
    }

    info!(target: "cli", "done");
    Ok(())
}

fn init_tracing(default_level: &str) {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Load configuration under a temporary subscriber.
///
/// The global subscriber needs the configured log level, so events raised
/// while loading go through this one at `info` (or `RUST_LOG`).
fn load_with_logging<W>(path: Option<&Path>, make_writer: W) -> Result<AppConfig>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(make_writer),
    );

    tracing::subscriber::with_default(subscriber, || load_config(path))
}

fn parse_mode(token: &str) -> Result<SearchMode, String> {
    token.parse().map_err(|e: vanda_client::VandaError| e.to_string())
}

fn mode_selector(mode: Option<SearchMode>) -> Box<dyn ModeSelector> {
    match mode {
        Some(mode) => Box::new(mode),
        None => Box::new(PromptModeSelector::new(io::stdin().lock(), io::stderr())),
    }
}

fn page_request(args: &PageArgs, config: &AppConfig, default_page_size: u32) -> SearchRequest {
    SearchRequest::new(args.query.as_str())
        .page(args.page.unwrap_or(config.search.page))
        .page_size(args.page_size.unwrap_or(default_page_size))
}

fn image_options(args: &ImageArgs, config: &AppConfig) -> ImageOptions {
    let images = &config.images;
    ImageOptions::default()
        .region(args.region.clone().unwrap_or_else(|| images.region.clone()))
        .size(args.size.clone().unwrap_or_else(|| images.size.clone()))
        .rotation(args.rotation.clone().unwrap_or_else(|| images.rotation.clone()))
        .quality(args.quality.clone().unwrap_or_else(|| images.quality.clone()))
        .format(args.format.clone().unwrap_or_else(|| images.format.clone()))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
