use clap::Parser;
use color_eyre::Result;
use tracing::{error, info};

use hazard_viewer::app::App;
use hazard_viewer::cli::CliArgs;
use hazard_viewer::config::init_app_config;
use hazard_viewer::{event, logging, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = init_app_config()?;
    logging::init_tracing(&config.log_file, config.debug)?;
    info!(base_url = %config.api.base_url, "starting hazard-viewer");

    let mut app = App::new();

    // Headless when asked to, or when stdout is not a terminal
    if args.headless || !is_terminal() {
        app.actions.initialize(&config)?;
        return event::run_headless(&mut app, &args.headless_query(), args.json).await;
    }

    if let Err(e) = app.initialize(&config) {
        error!(error = %e, "initialization failed");
        app.status_message = format!("Initialization failed: {e}");
    }

    let mut terminal = terminal::setup()?;

    let result = event::run(&mut terminal, &mut app).await;

    terminal::cleanup(true, true);

    if let Err(e) = &result {
        error!(error = %e, "event loop exited with an error");
    }
    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
