use std::env;
use std::io;
use tracing::Level;
use tracing_appender::rolling;
use tracing_subscriber::filter::FilterFn;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Directory for the optional daily-rolling log file. When unset, logging
/// goes to stderr only so stdout stays clean for the rendered report.
pub const LOG_DIR_ENV: &str = "SEOSCOUT_LOG_DIR";

pub fn configure_logging() {
    // The html5ever parser warns about markup quirks on pages we fetch;
    // those are expected on real-world HTML and drown out our own logs.
    let custom_filter = FilterFn::new(|metadata| {
        !(metadata.level() == &Level::WARN && metadata.target().starts_with("html5ever"))
    });

    // Stderr log configuration
    let stderr_log = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(EnvFilter::new("info,llm_request=info,web_request=info"))
        .with_filter(custom_filter);

    match env::var(LOG_DIR_ENV) {
        Ok(log_dir) => {
            // File log configuration
            let file_appender = rolling::daily(log_dir, "seoscout.log");
            let file_log = fmt::layer()
                .with_writer(file_appender)
                .with_filter(EnvFilter::new("debug,llm_request=debug,web_request=debug"));

            tracing_subscriber::Registry::default()
                .with(stderr_log)
                .with(file_log)
                .init();
        }
        Err(_) => {
            tracing_subscriber::Registry::default().with(stderr_log).init();
        }
    }
}
