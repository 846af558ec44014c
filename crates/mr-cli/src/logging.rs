//! Logger setup for the binary

use log::LevelFilter;

/// Default level for the given verbosity
pub(crate) fn level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Install `env_logger` on stderr. `RUST_LOG` overrides the default level.
pub(crate) fn init(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(level(verbose))
        .parse_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .target(env_logger::Target::Stderr)
        .init();
}
