//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logger (stdout, info level)
pub fn init_logger() -> Option<WorkerGuard> {
    init_logger_with_file(None, None, None)
}

/// Initialize the logger with optional JSON format and daily-rolling file output
///
/// `RUST_LOG` takes precedence over `log_level` when set. The returned guard
/// flushes the file writer on drop and must be held for the process lifetime.
pub fn init_logger_with_file(
    log_level: Option<&str>,
    json: Option<bool>,
    log_dir: Option<&str>,
) -> Option<WorkerGuard> {
    let level = log_level.unwrap_or("info");
    let json = json.unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},sqlx=warn,tower_http=info")));

    let (file_writer, guard) = match log_dir {
        Some(dir) => match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(dir, "dine-server.log");
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (Some(writer), Some(guard))
            }
            Err(e) => {
                eprintln!("Failed to create log directory {dir}: {e}");
                (None, None)
            }
        },
        None => (None, None),
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer)
    });
    let stdout_json = json.then(|| fmt::layer().json().with_target(true));
    let stdout_plain = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
    });

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_json)
        .with(stdout_plain)
        .try_init();

    if result.is_err() {
        // 已有全局 subscriber (测试中重复初始化)
        return None;
    }

    guard
}
