use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Console plus daily-rolling text and JSON files.
///
/// The worker guards must outlive the server or buffered lines are lost.
pub struct Logger {
    pub guards: Vec<WorkerGuard>,
}

impl Logger {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let guards = Self::setup_logging()?;
        Ok(Logger { guards })
    }

    /// `RUST_LOG` drives the console, `FILE_LOG_LEVEL` and `ERROR_FILE_LOG_LEVEL`
    /// the files under `LOG_DIR` (default `logs`).
    pub fn setup_logging() -> Result<Vec<WorkerGuard>, Box<dyn std::error::Error>> {
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
        std::fs::create_dir_all(&log_dir)?;

        let console_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,homly_backend=debug,tower_http=debug"));
        let file_level = std::env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "info,homly_backend=debug".to_string());
        let error_level = std::env::var("ERROR_FILE_LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        let (general, guard_general) = non_blocking(rolling::daily(&log_dir, "homly-backend.log"));
        let (errors, guard_errors) = non_blocking(rolling::daily(format!("{}/error", log_dir), "homly-backend-error.log"));
        let (general_json, guard_json) = non_blocking(rolling::daily(format!("{}/json", log_dir), "homly-backend.json"));
        let (errors_json, guard_errors_json) =
            non_blocking(rolling::daily(format!("{}/error/json", log_dir), "homly-backend-error.json"));

        let layers: Vec<BoxedLayer> = vec![
            fmt::layer()
                .pretty()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(true)
                .with_filter(console_filter)
                .boxed(),
            text_file_layer(general, &file_level),
            text_file_layer(errors, &error_level),
            json_file_layer(general_json, &file_level),
            json_file_layer(errors_json, &error_level),
        ];

        tracing_subscriber::registry().with(layers).try_init()?;

        Ok(vec![guard_general, guard_errors, guard_json, guard_errors_json])
    }
}

fn text_file_layer(writer: NonBlocking, level: &str) -> BoxedLayer {
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(EnvFilter::new(level))
        .boxed()
}

fn json_file_layer(writer: NonBlocking, level: &str) -> BoxedLayer {
    fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(EnvFilter::new(level))
        .boxed()
}
