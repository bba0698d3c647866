use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use route_optimizer::cache::CacheConfig;
use route_optimizer::domain::StopCode;
use route_optimizer::graph::{GraphClient, GraphConfig, MockGraphClient, PathEngine};
use route_optimizer::planner::{PlanError, PlanRequest, Planner, PlannerConfig};
use route_optimizer::report::{ErrorReport, ExitStatus, Report, summarize};
use route_optimizer::web::{AppState, create_router};

#[derive(Parser)]
#[command(author, version, about = "Pick the best-value route through a set of destinations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plan one route and print it as a JSON line
    Plan(PlanArgs),
    /// Serve the airport catalog and the planner over HTTP
    Serve(ServeArgs),
}

#[derive(Args)]
struct PlanArgs {
    /// Origin stop code; every route starts here
    #[arg(long, env = "ROUTE_ORIGIN")]
    origin: String,

    /// Destination stop codes, visited in any order
    destinations: Vec<String>,

    #[command(flatten)]
    planner: PlannerArgs,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args)]
struct ServeArgs {
    /// Origin of submitted plans that do not name one
    #[arg(long, env = "ROUTE_ORIGIN", default_value = "DFW")]
    origin: String,

    /// Address to listen on
    #[arg(long, env = "ROUTE_LISTEN", default_value = "127.0.0.1:3001")]
    listen: SocketAddr,

    /// Seconds a fetched leg stays cached
    #[arg(long, env = "ROUTE_CACHE_TTL", default_value_t = 600)]
    cache_ttl: u64,

    /// Maximum cached legs
    #[arg(long, env = "ROUTE_CACHE_CAPACITY", default_value_t = 10_000)]
    cache_capacity: u64,

    #[command(flatten)]
    planner: PlannerArgs,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args)]
struct PlannerArgs {
    /// Maximum total duration of the chosen route
    #[arg(long, env = "ROUTE_MAX_DURATION", default_value_t = 14.25)]
    max_duration: f64,

    /// Alternative paths requested per leg
    #[arg(short, long, env = "ROUTE_CANDIDATES_PER_LEG", default_value_t = 2)]
    k: usize,

    /// Upper bound on itineraries considered
    #[arg(long, env = "ROUTE_MAX_ITINERARIES", default_value_t = 100_000)]
    max_itineraries: usize,

    /// Solver wall-clock cap in seconds
    #[arg(long, env = "ROUTE_SOLVER_TIMEOUT", default_value_t = 10)]
    solver_timeout: u64,

    /// Per-request path engine timeout in seconds
    #[arg(long, env = "ROUTE_FETCH_TIMEOUT", default_value_t = 30)]
    fetch_timeout: u64,

    /// Retries after a failed leg fetch
    #[arg(long, env = "ROUTE_FETCH_RETRIES", default_value_t = 2)]
    fetch_retries: u32,

    /// Delay before the first retry in milliseconds, doubled per retry
    #[arg(long, env = "ROUTE_FETCH_BACKOFF_MS", default_value_t = 250)]
    fetch_backoff_ms: u64,

    /// Leg fetches in flight at once
    #[arg(long, env = "ROUTE_MAX_CONCURRENT_FETCHES", default_value_t = 5)]
    max_concurrent_fetches: usize,
}

#[derive(Args)]
struct EngineArgs {
    /// Graph server HTTP URL, e.g. http://localhost:7474
    #[arg(long, env = "GRAPH_HTTP_URL")]
    graph_url: Option<String>,

    #[arg(long, env = "GRAPH_USERNAME", default_value = "neo4j")]
    graph_user: String,

    #[arg(long, env = "GRAPH_PASSWORD", default_value = "", hide_env_values = true)]
    graph_password: String,

    #[arg(long, env = "GRAPH_DATABASE", default_value = "neo4j")]
    graph_database: String,

    /// Named graph projection searched for paths
    #[arg(long, env = "GRAPH_PROJECTION", default_value = "shortestPathGraph")]
    graph_projection: String,

    /// Relationship property minimised by the path search
    #[arg(long, env = "GRAPH_WEIGHT_PROPERTY", default_value = "distance")]
    weight_property: String,

    /// Country the airport catalog is restricted to
    #[arg(long, env = "GRAPH_CATALOG_COUNTRY", default_value = "United States")]
    catalog_country: String,

    /// Maximum airports in the catalog
    #[arg(long, env = "GRAPH_CATALOG_LIMIT", default_value_t = 500)]
    catalog_limit: usize,

    /// Serve paths from a JSON fixture instead of the graph server (takes precedence)
    #[arg(long, env = "ROUTE_MOCK_PATHS")]
    mock: Option<PathBuf>,
}

impl PlannerArgs {
    fn config(&self) -> PlannerConfig {
        PlannerConfig::default()
            .with_max_duration(self.max_duration)
            .with_candidates_per_leg(self.k)
            .with_max_itineraries(self.max_itineraries)
            .with_solver_timeout(self.solver_timeout)
            .with_fetch_timeout(self.fetch_timeout)
            .with_fetch_retries(self.fetch_retries, self.fetch_backoff_ms)
            .with_max_concurrent_fetches(self.max_concurrent_fetches)
    }
}

impl EngineArgs {
    /// Build the configured path engine.
    fn engine(&self, planner: &PlannerArgs) -> Result<PathEngine, String> {
        if let Some(path) = &self.mock {
            info!(fixture = %path.display(), "Using mock path engine");
            return MockGraphClient::from_file(path)
                .map(PathEngine::from)
                .map_err(|e| e.to_string());
        }

        let Some(url) = self.graph_url.as_deref() else {
            return Err("no path engine configured: set --graph-url or --mock".to_string());
        };

        let config = GraphConfig::new(url, &self.graph_user, &self.graph_password)
            .with_database(&self.graph_database)
            .with_projection(&self.graph_projection)
            .with_weight_property(&self.weight_property)
            .with_max_concurrent(planner.max_concurrent_fetches)
            .with_timeout(planner.fetch_timeout)
            .with_catalog(&self.catalog_country, self.catalog_limit);

        GraphClient::new(config)
            .map(PathEngine::from)
            .map_err(|e| e.to_string())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // stdout carries only the result payload
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let status = match &cli.command {
        Command::Plan(args) => {
            let (report, status) = plan(args).await;
            println!("{}", report.to_json_line());
            status
        }
        Command::Serve(args) => serve(args).await,
    };
    status.into()
}

async fn plan(args: &PlanArgs) -> (Report, ExitStatus) {
    let request = match PlanRequest::parse(&args.origin, args.destinations.as_slice()) {
        Ok(request) => request,
        Err(e) => return failure(&PlanError::from(e)),
    };

    let engine = match args.engine.engine(&args.planner) {
        Ok(engine) => engine,
        Err(e) => return setup_failure(e),
    };

    let config = args.planner.config();
    let outcome = Planner::new(&engine, &config).plan(&request).await;
    if let Err(e) = &outcome {
        error!(error = %e, "Planning failed");
    }
    summarize(&outcome)
}

async fn serve(args: &ServeArgs) -> ExitStatus {
    let origin = match StopCode::parse(&args.origin) {
        Ok(origin) => origin,
        Err(e) => {
            error!(error = %e, "Invalid default origin");
            return ExitStatus::InvalidInput;
        }
    };

    let config = args.planner.config();
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid planner configuration");
        return ExitStatus::InvalidInput;
    }

    let engine = match args.engine.engine(&args.planner) {
        Ok(engine) => engine,
        Err(e) => {
            error!(error = %e, "Path engine setup failed");
            return ExitStatus::SetupFailure;
        }
    };

    let cache_config = CacheConfig {
        ttl: Duration::from_secs(args.cache_ttl),
        max_capacity: args.cache_capacity,
    };
    let state = AppState::new(engine, &cache_config, config, origin);
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(args.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %args.listen, error = %e, "Failed to bind");
            return ExitStatus::SetupFailure;
        }
    };

    info!(addr = %args.listen, origin = %args.origin, "Route optimizer listening");
    info!("  GET  /health              - Health check");
    info!("  GET  /api/data/airport    - Airport catalog");
    info!("  POST /api/submit-airports - Plan a route through selectedCodes");

    match axum::serve(listener, app).await {
        Ok(()) => ExitStatus::Success,
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitStatus::SetupFailure
        }
    }
}

fn failure(err: &PlanError) -> (Report, ExitStatus) {
    error!(error = %err, "Planning failed");
    (Report::from(err), ExitStatus::from(err))
}

fn setup_failure(err: impl std::fmt::Display) -> (Report, ExitStatus) {
    error!(error = %err, "Path engine setup failed");
    (
        Report::Error(ErrorReport::new(err.to_string())),
        ExitStatus::SetupFailure,
    )
}
