// ABOUTME: The proguide command line: scrape route pages, render LaTeX fragments, write region outlines.
// ABOUTME: Paths and wiki access come from flags with PROGUIDE_* environment fallbacks.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use proguide_tex::{generate_outline, generate_route_snippets, LatexRenderer};
use proguide_wiki::options::DEFAULT_BASE_URL;
use proguide_wiki::paths::{DEFAULT_DATA_DIR, DEFAULT_IMGS_DIR, DEFAULT_OUTPUT_DIR};
use proguide_wiki::{
    DatasetStore, ImageCache, Paths, RouteDataset, RouteRegistry, Updater, WikiClient, POKEMON_IMAGES,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "proguide",
    version,
    about = "Scrape wiki route pages into a dataset and render them as LaTeX",
    long_about = None
)]
struct Cli {
    /// Directory holding route_names.json and route_data.json
    #[arg(long, global = true, env = "PROGUIDE_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Image root; cached creature images go to its pokemon/ subdirectory
    #[arg(long, global = true, env = "PROGUIDE_IMGS_DIR", default_value = DEFAULT_IMGS_DIR)]
    imgs_dir: PathBuf,

    /// Root of the generated fragment tree
    #[arg(long, global = true, env = "PROGUIDE_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Article URL prefix; the page title is appended to it
    #[arg(long, global = true, env = "PROGUIDE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// User-Agent sent with every request
    #[arg(long, global = true, env = "PROGUIDE_USER_AGENT")]
    user_agent: Option<String>,

    /// Verbosity level (repeat for more verbose output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch route pages and merge them into the dataset
    Update {
        /// Only update these routes (comma separated)
        #[arg(long, value_delimiter = ',')]
        routes: Option<Vec<String>>,
    },

    /// Write LaTeX fragments for every route in the dataset
    Render,

    /// Write the outline document of a region
    Outline {
        /// Region name as listed in route_names.json
        region: String,

        /// Output file [default: <region>.tex]
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8) -> Result<()> {
    let filter_level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    // RUST_LOG, when set, replaces the -v level entirely
    let filter = if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::default().add_directive(filter_level.into())
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::Layer::new().with_writer(std::io::stderr));

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let paths = Paths::new(&cli.data_dir, &cli.imgs_dir, &cli.output_dir);

    match &cli.command {
        Commands::Update { routes } => run_update(&cli, &paths, routes.as_deref()),
        Commands::Render => run_render(&paths),
        Commands::Outline { region, out } => run_outline(&paths, region, out.clone()),
    }
}

fn run_update(cli: &Cli, paths: &Paths, routes: Option<&[String]>) -> Result<()> {
    let registry = RouteRegistry::load(paths.route_names_path())?;

    let store = DatasetStore::new(paths.route_data_path());
    // fail before any network traffic when the dataset is unreadable
    store.load()?;

    let mut builder = WikiClient::builder().base_url(&cli.base_url);
    if let Some(user_agent) = &cli.user_agent {
        builder = builder.user_agent(user_agent);
    }
    let client = builder.build()?;

    let images = ImageCache::new(&paths.imgs_dir, POKEMON_IMAGES, &client);
    let updater = Updater::new(&client, &images, store);
    let summary = updater.update(&registry, routes);

    println!(
        "{} updated, {} failed, {} skipped",
        summary.updated, summary.failed, summary.skipped
    );
    Ok(())
}

fn run_render(paths: &Paths) -> Result<()> {
    let dataset = RouteDataset::load(paths.route_data_path())?;
    let summary = generate_route_snippets(&dataset, paths.output_dir(), &LatexRenderer);

    println!(
        "{} fragments written, {} routes failed",
        summary.written.len(),
        summary.failed_routes
    );
    Ok(())
}

fn run_outline(paths: &Paths, region: &str, out: Option<PathBuf>) -> Result<()> {
    let registry = RouteRegistry::load(paths.route_names_path())?;
    let dataset = RouteDataset::load(paths.route_data_path())?;
    let project_root = std::env::current_dir().context("resolving the project root")?;

    let doc = generate_outline(region, &registry, &dataset, paths.output_dir(), &project_root)?;

    let out = out.unwrap_or_else(|| PathBuf::from(format!("{}.tex", region)));
    fs::write(&out, doc).with_context(|| format!("writing {}", out.display()))?;
    info!("Outline written to {}", out.display());
    println!("{}", out.display());
    Ok(())
}
