use tracing_subscriber::EnvFilter;

/// Initialize tracing for a reportd component.
///
/// `service_name` identifies the component (e.g. "reportd-gateway").
/// The filter comes from `RUST_LOG`, falling back to `info`.
pub fn init_tracing(service_name: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    tracing::info!(service = service_name, "tracing initialized");
}
