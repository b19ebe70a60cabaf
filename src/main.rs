use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use clap::{Parser, Subcommand};
use roommate_match::config::{LoggingSettings, Settings};
use roommate_match::core::Ranker;
use roommate_match::pipeline::{format_summary, run_batch};
use roommate_match::routes::{self, AppState, MatchIndex};
use roommate_match::services::load_snapshot;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Roommate compatibility scoring and ranking
#[derive(Debug, Parser)]
#[command(name = "roommate-match", version, about)]
struct Cli {
    /// Configuration file (defaults to config/default.toml + config/local.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score every pair in the dataset and persist the results snapshot
    Compute {
        /// JSON export of the survey
        #[arg(long)]
        input: Option<PathBuf>,
        /// Where to write the snapshot
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Pairings kept per person
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Serve stored results over HTTP
    Serve {
        /// Snapshot written by `compute`
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

/// JSON error response for query string errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn to_io_error<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .map_err(|e| {
        eprintln!("Configuration error: {}", e);
        to_io_error(e)
    })?;

    init_logging(&settings.logging);

    match cli.command {
        Command::Compute { input, snapshot, top_k } => {
            let input = input.unwrap_or_else(|| settings.dataset.input_path.clone());
            let snapshot = snapshot.unwrap_or_else(|| settings.dataset.snapshot_path.clone());
            let ranker = Ranker::new(top_k.unwrap_or(settings.ranking.top_k));

            let results = run_batch(&input, &snapshot, &ranker).map_err(|e| {
                error!("Batch run failed: {}", e);
                to_io_error(e)
            })?;

            print!("{}", format_summary(&results, settings.ranking.summary_rows));
            info!("Results successfully saved to {}", snapshot.display());
            Ok(())
        }
        Command::Serve { snapshot } => {
            let snapshot = snapshot.unwrap_or_else(|| settings.dataset.snapshot_path.clone());
            serve(&settings, snapshot).await
        }
        Command::Config => {
            let rendered = settings.to_toml().map_err(to_io_error)?;
            print!("{}", rendered);
            Ok(())
        }
    }
}

async fn serve(settings: &Settings, snapshot: PathBuf) -> std::io::Result<()> {
    info!("Starting roommate match service...");

    let snapshot = load_snapshot(&snapshot).map_err(|e| {
        error!("Failed to load snapshot {}: {}", snapshot.display(), e);
        to_io_error(e)
    })?;

    let index = Arc::new(MatchIndex::from(snapshot));
    info!(
        "Serving matches for {} people ({} pairs)",
        index.results().people_count(),
        index.results().matches.len()
    );

    let app_state = AppState { index };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
