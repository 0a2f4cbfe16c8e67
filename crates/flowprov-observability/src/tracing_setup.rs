//! Global subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the given default directive applies.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const DEFAULT_DIRECTIVE: &str = "info";

/// Install the fmt subscriber with the `info` default.
pub fn init_tracing() {
    init_tracing_with_default(DEFAULT_DIRECTIVE);
}

/// Install the fmt subscriber, falling back to `default_directive` when
/// `RUST_LOG` is unset or invalid. Repeated calls are ignored.
pub fn init_tracing_with_default(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init();
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_harmless() {
        init_tracing_with_default("debug");
        init_tracing();
        let span = crate::spans::report_event("CREATE", "proc-1");
        let _guard = span.enter();
        tracing::debug!("inside report span");
    }
}
