use log::LevelFilter;

/// Initialize the logger at `level`. A `RUST_LOG` setting takes precedence.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}
