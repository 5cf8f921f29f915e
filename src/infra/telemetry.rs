use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

/// Dependencies that are chatty at `info`/`debug`; capped unless `RUST_LOG` says otherwise.
const QUIET_DEPENDENCIES: &[&str] = &["sqlx::query=warn", "hyper_util=info", "reqwest=info"];

/// Install the global tracing subscriber for the server.
///
/// `RUST_LOG` wins over `logging.level` when it is set.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    let env_filter = build_filter(logging.level, std::env::var(EnvFilter::DEFAULT_ENV).ok())?;

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn build_filter(level: LevelFilter, env: Option<String>) -> Result<EnvFilter, InfraError> {
    if let Some(directives) = env.filter(|value| !value.trim().is_empty()) {
        return EnvFilter::builder()
            .with_default_directive(level.into())
            .parse(&directives)
            .map_err(|err| InfraError::telemetry(format!("invalid RUST_LOG `{directives}`: {err}")));
    }

    let mut filter = EnvFilter::default().add_directive(level.into());
    for directive in QUIET_DEPENDENCIES {
        let directive = directive
            .parse()
            .map_err(|err| InfraError::telemetry(format!("invalid directive `{directive}`: {err}")))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}
