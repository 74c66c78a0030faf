//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// voxcopy::core::logging::init();
/// log::info!("Copy console started");
/// ```
pub fn init() {
    // A second init (tests, embedding servers) is not an error worth surfacing.
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .format_timestamp_millis()
    .try_init();
}
