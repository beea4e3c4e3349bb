//! Structured logging setup.
//!
//! Logs go to stderr; stdout belongs to the terminal UI. `RUST_LOG` takes
//! precedence over the directive passed to [`init`].

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `default_directive` is used when `RUST_LOG` is unset or invalid, e.g.
/// `"weft_tui=debug"`. Fails if a global subscriber is already installed.
pub fn init(default_directive: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails_without_panicking() {
        let _ = init("weft_tui=debug");
        assert!(init("weft_tui=debug").is_err());
    }
}
