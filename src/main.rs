use clap::Parser;
use province_polygons::catalog::Catalog;
use province_polygons::config::Config;
use province_polygons::controller::MapController;
use province_polygons::location::{LocationResolver, NominatimGeocoder};
use province_polygons::logging;
use province_polygons::map::GeoJsonSurface;
use province_polygons::server;
use province_polygons::session::SelectionSession;
use std::path::PathBuf;
use std::sync::Arc;

/// Poligonos — connect the capitals of Santa Cruz provinces into a polygon.
///
/// Adds each province in order, resolving its capital through Nominatim
/// (or the built-in table when offline or on failure), and prints the
/// resulting map as GeoJSON on stdout.
///
/// Examples:
///   poligonos Warnes Velasco Cordillera --polygon
///   poligonos "andres ibanez" Sara Florida --polygon --offline
///   poligonos --list
///   poligonos --serve --port 8080
#[derive(Parser)]
#[command(name = "poligonos", version, about, long_about = None)]
struct Cli {
    /// Provinces to add, in order. Accents and case are optional.
    #[arg(index = 1)]
    provinces: Vec<String>,

    /// Generate the polygon after adding the provinces.
    #[arg(long, short = 'p')]
    polygon: bool,

    /// Offline mode: only use built-in capital coordinates.
    #[arg(long)]
    offline: bool,

    /// Path to a TOML config file. Defaults to ~/.poligonos/config.toml if present.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Geocoder timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the province catalog as JSON and exit.
    #[arg(long)]
    list: bool,

    /// Run the HTTP API instead of a one-shot selection.
    #[arg(long)]
    serve: bool,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if self.offline {
            config.offline = true;
        }
        if let Some(ref level) = self.log_level {
            config.log_level = level.clone();
        }
        if let Some(t) = self.timeout {
            config.timeout_secs = t;
        }
        if let Some(ref host) = self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let config = cli.apply(config);

    if let Err(e) = logging::init(config.log_level_filter()) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let catalog = Arc::new(Catalog::santa_cruz().with_place(&config.region, &config.country));

    if cli.list {
        print_json(&catalog.entries());
        return;
    }

    let resolver = if config.offline {
        LocationResolver::offline(Arc::clone(&catalog))
    } else {
        LocationResolver::new(
            Arc::clone(&catalog),
            Box::new(NominatimGeocoder::from_config(&config)),
        )
    };
    let mut controller = MapController::new(SelectionSession::new(resolver), GeoJsonSurface::new());
    controller.on_map_ready();

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: cannot start runtime: {}", e);
            std::process::exit(1);
        });
        if let Err(e) = runtime.block_on(server::start(&config.host, config.port, controller)) {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    if cli.provinces.is_empty() {
        eprintln!("Error: No provinces specified.");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  poligonos Warnes Velasco Cordillera --polygon");
        eprintln!("  poligonos --list");
        eprintln!("  poligonos --serve");
        std::process::exit(1);
    }

    // ── Add provinces ───────────────────────────────────────────

    for name in &cli.provinces {
        match controller.add_selected(name) {
            Ok(notice) => eprintln!("  \u{2714} {}", notice.message()),
            Err(e) => eprintln!("  \u{26A0}\u{FE0F}  {}", e),
        }
    }

    // ── Polygon ─────────────────────────────────────────────────

    if cli.polygon {
        match controller.generate_polygon() {
            Ok(notice) => eprintln!("  \u{2714} {}", notice.message()),
            Err(e) => eprintln!("  \u{26A0}\u{FE0F}  {}", e),
        }
    }

    // GeoJSON to stdout
    print_json(&controller.surface().to_geojson());
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: cannot encode output: {}", e);
            std::process::exit(1);
        }
    }
}
