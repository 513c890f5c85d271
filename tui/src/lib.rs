use roster_simulator_config::Args;

#[macro_use]
extern crate tracing;

mod errors;
pub mod logging;
mod tui;

pub use errors::init_errors;
pub use tui::{
    App,
    Tui,
};

pub async fn start_tui(args: Args) -> eyre::Result<()> {
    logging::log_init(args.debug)?;

    tui::App::new(args)?.run().await
}
