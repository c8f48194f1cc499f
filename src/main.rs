use clap::{Parser, Subcommand};
use iiify::cache::{CacheStats, CacheStore};
use iiify::imaging::RustBackend;
use iiify::service::ImageService;
use iiify::{config, logging, output};
use rayon::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "iiify")]
#[command(about = "IIIF-style image transformations with a content-addressed disk cache")]
#[command(long_about = "\
IIIF-style image transformations with a content-addressed disk cache

A request path names a source image and four transformation commands:

  /<identifier>/<region>/<size>/<rotation>/<quality>.<format>

  region    full | x,y,w,h | pct:x,y,w,h
  size      full | w, | ,h | pct:n | !w,h | w,h
  rotation  n | !n                 (0-360 counter-clockwise, ! mirrors first)
  quality   default | color | gray | bitonal
  format    jpg | tif | png | gif | jp2 | pdf | webp

The identifier is a file name inside the media root. Each distinct request
path is rendered once and stored in the cache root under the SHA-256 of the
path; later identical requests are served from the cache.

Run 'iiify gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Media root, overrides `media_root` from the config
    #[arg(long, global = true)]
    media: Option<PathBuf>,

    /// Cache root, overrides `cache_root` from the config
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Structured JSON logs on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render request paths into the cache, in parallel
    Render {
        /// Request paths, e.g. /plate.jpg/full/pct:50/0/gray.png
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print the info.json document for an identifier
    Info { identifier: String },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Render { paths } => {
            let (server_config, service) = open_service(&cli)?;
            init_thread_pool(&server_config.processing);
            let results: Vec<_> = paths.par_iter().map(|p| service.handle(p)).collect();

            let mut stats = CacheStats::default();
            let mut rejected = 0;
            for (path, result) in paths.iter().zip(&results) {
                output::print_render_result(path, result);
                match result {
                    Ok(artifact) if artifact.cache_hit => stats.hit(),
                    Ok(_) => stats.miss(),
                    Err(_) => rejected += 1,
                }
            }
            println!();
            println!("{}", output::format_summary(&stats, rejected));

            if rejected > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Info { identifier } => {
            let (server_config, service) = open_service(&cli)?;
            let info = service.info(identifier, &server_config.info_settings())?;
            println!("{}", info.to_json_pretty()?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load config, apply CLI overrides, start logging, and open the service.
fn open_service(
    cli: &Cli,
) -> Result<(config::ServerConfig, ImageService<RustBackend>), Box<dyn std::error::Error>> {
    let mut server_config = config::load_config(&cli.config)?;
    if let Some(media) = &cli.media {
        server_config.media_root = media.clone();
    }
    if let Some(cache) = &cli.cache {
        server_config.cache_root = cache.clone();
    }
    logging::init_from_config(&server_config.logging, cli.verbose, cli.json_logs);

    let cache = CacheStore::open(&server_config.cache_root)?;
    let backend = RustBackend::with_quality(server_config.jpeg_quality());
    let service = ImageService::new(backend, &server_config.media_root, cache);
    Ok((server_config, service))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
