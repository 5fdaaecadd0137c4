//! Tracing subscriber setup for the service binary.

use crate::config::LogFormat;
use thiserror::Error;
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directives could not be parsed.
    #[error("invalid log filter {directives:?}: {source}")]
    Filter {
        /// Directives that were rejected.
        directives: String,
        /// Underlying parse error.
        source: ParseError,
    },

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Installs the global subscriber with `directives` as its `EnvFilter`.
///
/// Call once at startup.
///
/// # Errors
///
/// Returns [`LoggingError::Filter`] for bad directives and
/// [`LoggingError::Install`] when a subscriber is already set.
pub fn init(directives: &str, format: LogFormat) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(directives).map_err(|source| LoggingError::Filter {
        directives: directives.to_owned(),
        source,
    })?;

    let (text_layer, json_layer) = match format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer().with_target(true)), None),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn malformed_directives_are_rejected() {
        let result = init("renewal_desk=loud", LogFormat::Text);
        assert!(matches!(result, Err(LoggingError::Filter { .. })));
    }
}
