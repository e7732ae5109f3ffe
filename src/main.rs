use clap::{Parser, Subcommand};
use pinpoint::catalog::LocationCatalog;
use pinpoint::config::{Config, GeocoderKind};
use pinpoint::geocode::{GeocodeError, GeocodeFailure};
use pinpoint::region::Region;
use pinpoint::server::{self, AppState};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// pinpoint — map pins for a fixed location catalog, plus place-name geocoding.
///
/// Examples:
///   pinpoint list
///   pinpoint show "Duck Pond"
///   pinpoint geocode "1600 Pennsylvania Ave"
///   pinpoint --offline geocode "central park"
///   pinpoint serve --port 8080
#[derive(Parser)]
#[command(name = "pinpoint", version, about, long_about = None)]
struct Cli {
    /// Config file. Defaults to ~/.pinpoint/config.json.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog JSON file (overrides config).
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Offline mode: geocode against catalog titles only.
    #[arg(long, global = true)]
    offline: bool,

    /// Debug logging.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every pin in catalog order.
    List,
    /// Print the location with this exact (case-sensitive) title.
    Show { title: String },
    /// Resolve free text into a coordinate.
    Geocode { text: String },
    /// Serve the HTTP API.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Serialize)]
struct GeocodeOutput {
    query: String,
    coordinate: pinpoint::catalog::Coordinate,
    region: Region,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    pinpoint::logging::init(cli.verbose);

    let config = load_config(&cli);
    let catalog = Arc::new(config.load_catalog().unwrap_or_else(|e| fail(e)));

    match cli.command {
        Command::List => print_json(&catalog.pins()),
        Command::Show { title } => {
            let loc = catalog.require_title(&title).unwrap_or_else(|e| fail(e));
            print_json(loc);
        }
        Command::Geocode { text } => geocode(&config, catalog, &text).await,
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.host.clone());
            let port = port.unwrap_or(config.port);
            let gateway = config.build_gateway(Arc::clone(&catalog));
            let state = Arc::new(AppState::new(catalog, gateway, config.region_meters));
            if let Err(e) = server::start(&host, port, state).await {
                fail(format!("Server error on {}:{}: {}", host, port, e));
            }
        }
    }
}

fn load_config(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .unwrap_or_else(|e| fail(e));

    if let Some(ref path) = cli.catalog {
        config.catalog_path = Some(path.clone());
    }
    if cli.offline {
        config.geocoder = GeocoderKind::Catalog;
    }
    config
}

async fn geocode(config: &Config, catalog: Arc<LocationCatalog>, text: &str) {
    let gateway = config.build_gateway(catalog);
    match gateway.resolve(text).await {
        Ok(coordinate) => {
            eprintln!("  \u{1F4CD} {}", coordinate);
            print_json(&GeocodeOutput {
                query: text.trim().to_string(),
                coordinate,
                region: Region::around(coordinate, config.region_meters),
            });
        }
        Err(GeocodeError::Failed(GeocodeFailure::Ambiguous { query, candidates })) => {
            eprintln!("Error: Ambiguous place name '{}'", query);
            eprintln!();
            eprintln!("  Multiple matches found:");
            for (i, c) in candidates.iter().enumerate() {
                eprintln!("    {}. {} ({})", i + 1, c.display_name, c.coordinate);
            }
            std::process::exit(1);
        }
        Err(e) => fail(e),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}
