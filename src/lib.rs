#[macro_use]
extern crate tracing;

mod headless;
mod logging;

pub use headless::{
    run_headless,
    watch_session,
    ReportFormat,
};
pub use logging::init_logging;
