use clap::{Parser, Subcommand};
use revista::api::ApiClient;
use revista::config::{self, SiteConfig};
use revista::render::Renderer;
use revista::{export, listing, output, server};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "revista")]
#[command(about = "Flip-book reader for digital magazine editions")]
#[command(long_about = "\
Flip-book reader for digital magazine editions

Lists the published editions of a magazine backend and opens each one as a
page-turning book. Pages are rendered on the server from live backend data;
`export` writes the same pages to a directory for static hosting.

Routes:

  /              Published editions
  /leer/{id}     Reader for one edition
  /read/{id}     Old links, redirected to /leer/{id}
  /healthz       Liveness probe

Backend selection (first available wins):
  --api-url, REVISTA_API_URL, api.base_url in revista.toml,
  then api.production_url when site.hostname contains api.production_host,
  else api.development_url.

Run 'revista gen-config' to generate a documented revista.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = "revista.toml", global = true)]
    config: PathBuf,

    /// Backend base URL, overriding the config file
    #[arg(long, env = config::API_URL_ENV, global = true)]
    api_url: Option<String>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the site over HTTP
    Serve {
        /// Listen address, overriding server.bind
        #[arg(long)]
        bind: Option<String>,
    },
    /// Render every page into a directory for static hosting
    Export {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// List the backend's editions and page counts
    Check,
    /// Print a stock revista.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Serve { bind } => {
            let (mut site_config, catalog) = load(&cli.config, cli.api_url)?;
            if let Some(bind) = bind {
                site_config.server.bind = bind;
            }
            server::serve(site_config, catalog).await?;
        }
        Command::Export { output: output_dir } => {
            let (site_config, catalog) = load(&cli.config, cli.api_url)?;
            let renderer = Renderer::new(site_config);
            let summary = export::export(&catalog, &renderer, &output_dir).await?;
            output::print_export_output(&summary);
        }
        Command::Check => {
            let (_, catalog) = load(&cli.config, cli.api_url)?;
            let entries = listing::inventory(&catalog).await?;
            output::print_check_output(catalog.base_url(), &entries);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load and validate config, then build the backend client.
fn load(
    path: &Path,
    api_url: Option<String>,
) -> Result<(SiteConfig, ApiClient), Box<dyn std::error::Error>> {
    let mut site_config = config::load_config(path)?;
    if let Some(url) = api_url {
        site_config.api.base_url = Some(url);
        site_config.validate()?;
    }
    let base = config::resolve_api_base(&site_config.api, &site_config.site.hostname);
    let catalog = ApiClient::new(&base, &site_config.api)?;
    info!(api = catalog.base_url(), config = %path.display(), "configuration loaded");
    Ok((site_config, catalog))
}

/// Log to stderr so stdout stays clean for command output.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("revista={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
