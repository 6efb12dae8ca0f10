//! Tests for log filter selection

#[cfg(test)]
mod tests {
    use surfalign::io::logging::{env_filter, init_logging};

    fn overridden() -> bool {
        std::env::var_os("SURFALIGN_LOG").is_some() || std::env::var_os("RUST_LOG").is_some()
    }

    #[test]
    fn test_default_levels() {
        if overridden() {
            return;
        }
        assert_eq!(env_filter(false).to_string(), "info");
        assert_eq!(env_filter(true).to_string(), "warn");
    }

    #[test]
    fn test_repeated_init() {
        init_logging(true);
        init_logging(false);
        tracing::info!("logging initialised twice");
    }
}
