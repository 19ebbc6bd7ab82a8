use std::sync::Mutex;
use slog_term::*;
use slog::Drain;

pub use slog::Logger;

pub fn root_logger() -> &'static Logger {
    &ROOT_LOGGER
}

/// Logger that drops every record, for hosts that route nothing through slog.
pub fn discard_logger() -> Logger {
    Logger::root(slog::Discard, o!())
}

lazy_static! {
    static ref ROOT_LOGGER: Logger = create_logger();
}

fn create_logger() -> Logger {
    let decorator = TermDecorator::new().build();
    let drain = CompactFormat::new(decorator).build();
    let drain = Mutex::new(drain).fuse();
    let log = Logger::root(drain, o!("crate" => "slotmenu"));

    debug!(&log, "logger initialized");
    log
}
