use clap::Parser;
use color_eyre::Result;
use roster_simulator::{
    init_logging,
    run_headless,
};
use roster_simulator_config::Args;
use roster_simulator_tui::{
    init_errors,
    start_tui,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if args.headless {
        color_eyre::install()?;
        init_logging(args.debug)?;
        return run_headless(args).await;
    }

    init_errors()?;
    start_tui(args).await
}
