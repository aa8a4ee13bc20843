pub use log::LevelFilter::*;

pub fn setup_logging(verbosity: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .level(verbosity)
        .format(|out, message, record| out.finish(format_args!("({}) {}: {}", record.level(), record.target(), message)))
        .chain(std::io::stderr())
        .apply()
}

/// Map a count of `-v` flags to a level filter.
pub fn verbosity_from_count(count: u8) -> log::LevelFilter {
    match count {
        0 => Warn,
        1 => Info,
        2 => Debug,
        _ => Trace,
    }
}
