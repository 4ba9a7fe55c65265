// Tracing bootstrap
//
// RUST_LOG wins when set; otherwise this crate logs at info.
// Credentials and bearer tokens are never passed to a log macro.

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT_TRACING: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "expense_pilot=info";

/// Install the global fmt subscriber; later calls are no-ops
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        // try_init: a test harness may already own the global subscriber
        if fmt().with_env_filter(filter).try_init().is_ok() {
            tracing::info!("expense-pilot tracing initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_is_idempotent() {
        super::init_tracing();
        super::init_tracing();
    }
}
