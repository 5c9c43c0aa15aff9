use log::LevelFilter;

/// Initialize the logger at the given level.
///
/// `RUST_LOG` still applies on top of the level filter.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
