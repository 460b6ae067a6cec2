//!
//! Setup logging subsystem.
//!

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config;

/// Keeps the non-blocking writers flushing until dropped
#[derive(Debug)]
pub struct TelemetryGuard {
    _log_guards: Vec<WorkerGuard>,
}

///
/// Setup logging sub-system specifying.
/// Expects config and list of names of crates to watch.
///
pub fn setup<Str: AsRef<str>>(
    conf: &config::Log,
    service_name: &str,
    crates_to_watch: impl IntoIterator<Item = Str>,
) -> TelemetryGuard {
    let mut guards = Vec::new();

    if !conf.console.enabled {
        return TelemetryGuard {
            _log_guards: guards,
        };
    }

    let (console_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(guard);

    let level = conf.console.level.into_level();
    let default_directive = conf
        .console
        .filtering_directive
        .clone()
        .unwrap_or_else(|| {
            crates_to_watch
                .into_iter()
                .map(|acrate| format!("{}={level}", acrate.as_ref()))
                .fold(filter::LevelFilter::WARN.to_string(), |directive, target| {
                    format!("{directive},{target}")
                })
        });

    // Use 'RUST_LOG' environment variable will override the config settings
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let initialised = match conf.console.log_format {
        config::LogFormat::Default => subscriber
            .with(
                fmt::layer()
                    .with_timer(fmt::time::time())
                    .with_span_events(fmt::format::FmtSpan::CLOSE)
                    .pretty()
                    .with_writer(console_writer),
            )
            .try_init(),
        config::LogFormat::Json => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(console_writer),
            )
            .try_init(),
    };

    match initialised {
        Ok(()) => tracing::debug!(service = service_name, "logger initialised"),
        #[allow(clippy::print_stderr)]
        Err(error) => eprintln!("Logger already initialised for {service_name}: {error}"),
    }

    // Returning the WorkerGuard for logs to be printed until it is dropped
    TelemetryGuard {
        _log_guards: guards,
    }
}
