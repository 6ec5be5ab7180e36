use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "tenderscope.log";

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
/// The returned guard flushes the file writer and must outlive the server.
pub fn init_logging(log_dir: Option<&Path>, json: bool) -> Option<WorkerGuard> {
    let (subscriber, guard) = build_subscriber(log_dir, json);
    subscriber.init();
    guard
}

fn build_subscriber(
    log_dir: Option<&Path>,
    json: bool,
) -> (impl Subscriber + Send + Sync + 'static, Option<WorkerGuard>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_writer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };
    let file_layer = file_writer.map(|writer| fmt::layer().with_writer(writer).with_ansi(false));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .with(file_layer);
    (subscriber, guard)
}
