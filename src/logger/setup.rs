//! Setup logging subsystem.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use super::config;

/// Contains guards necessary for logging
#[derive(Debug)]
pub struct DelayedLogGuard {
    _console_guard: Option<WorkerGuard>,
}

/// Setup logging sub-system specifying the logging configuration, service (binary) name, and a
/// list of external crates for which a more verbose logging must be enabled. All crates within the
/// current cargo workspace are automatically considered for verbose logging.
///
/// Installing a subscriber twice is not an error; the first one wins.
pub fn setup(
    config: &config::Log,
    service_name: &str,
    crates_to_filter: impl AsRef<[&'static str]>,
) -> DelayedLogGuard {
    let console_config = &config.console;

    let (console_layer, console_guard) = if console_config.enabled {
        let (console_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        let console_filter = get_envfilter(
            console_config.filtering_directive.as_ref(),
            console_config.level.into_level(),
            crates_to_filter.as_ref(),
        );

        let layer: Box<dyn Layer<Registry> + Send + Sync> = match console_config.log_format {
            config::LogFormat::Default => fmt::layer()
                .with_target(true)
                .with_writer(console_writer)
                .boxed(),
            config::LogFormat::Json => fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(console_writer)
                .boxed(),
        };

        (Some(layer.with_filter(console_filter)), Some(guard))
    } else {
        (None, None)
    };

    let installed = tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(service_name, "logging subsystem initialized");
    }

    DelayedLogGuard {
        _console_guard: console_guard,
    }
}

fn get_envfilter(
    filtering_directive: Option<&String>,
    default_log_level: tracing::Level,
    crates_to_filter: &[&'static str],
) -> EnvFilter {
    filtering_directive
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| {
            let level = default_log_level.as_str().to_ascii_lowercase();
            crates_to_filter
                .iter()
                .chain(std::iter::once(&env!("CARGO_CRATE_NAME")))
                .filter_map(|crate_name| format!("{crate_name}={level}").parse().ok())
                .fold(
                    EnvFilter::default().add_directive(LevelFilter::WARN.into()),
                    |filter, directive| filter.add_directive(directive),
                )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directive_wins() {
        let directive = "phonepe_connector=trace".to_string();
        let filter = get_envfilter(Some(&directive), tracing::Level::INFO, &[]);
        assert_eq!(filter.to_string().to_lowercase(), "phonepe_connector=trace");
    }

    #[test]
    fn crates_get_configured_level() {
        let filter = get_envfilter(None, tracing::Level::DEBUG, &["reqwest"]);
        let rendered = filter.to_string().to_lowercase();
        assert!(rendered.contains("reqwest=debug"));
        assert!(rendered.contains("phonepe_connector=debug"));
    }

    #[test]
    fn setup_can_run_more_than_once() {
        let config = config::Log::default();
        let _first = setup(&config, "phonepe_connector", ["reqwest"]);
        let _second = setup(&config, "phonepe_connector", ["reqwest"]);
    }
}
