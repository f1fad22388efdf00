pub mod checkin; // dose confirmation
pub mod config;
pub mod dosage; // dosage string parsing
pub mod models;
pub mod reminder; // alarms, due evaluation, polling engine
pub mod schedule; // clock-time arithmetic
pub mod store; // preference buckets and repositories
pub mod today; // today-screen aggregation

use tracing_subscriber::EnvFilter;

/// Initialize tracing for an embedding shell. Honors `RUST_LOG`,
/// falling back to the crate default filter.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Remedia core starting v{}", config::APP_VERSION);
}
