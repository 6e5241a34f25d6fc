use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logging settings for binaries and demos.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Prefix of the rolling log file name.
    pub app_name: String,
    /// Filter used when `RUST_LOG` is not set, e.g. `"info"` or `"hyperstretch=debug"`.
    pub base_level: String,
    /// Directory for rolling log files. `None` logs to the console only.
    pub log_dir: Option<PathBuf>,
    /// Number of daily log files kept on disk.
    pub max_log_files: usize,
}

impl LogConfig {
    pub fn new(app_name: &str, base_level: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            base_level: base_level.to_string(),
            log_dir: Some(PathBuf::from("logs")),
            max_log_files: 5,
        }
    }

    pub fn console_only(mut self) -> Self {
        self.log_dir = None;
        self
    }
}

pub fn setup_logging(config: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.base_level))
        .unwrap_or_else(|e| panic!("Invalid log filter: {}", e));

    let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .with_writer(console_writer);

    let file_layer = config.log_dir.as_ref().map(|dir| {
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("Failed to create logs directory: {}", e));

        let file_appender = tracing_appender::rolling::Builder::new()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix(&config.app_name)
            .filename_suffix("log")
            .max_log_files(config.max_log_files)
            .build(dir)
            .unwrap_or_else(|e| panic!("Failed to create log file appender: {}", e));

        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        LOG_GUARD.set(guard).expect("Logging already initialized");

        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(file_writer)
            .boxed()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .unwrap_or_else(|e| panic!("Logger initialization failed: {}", e));
}
