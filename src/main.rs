mod cli;
mod config;
mod controls;
mod core;
mod error;
mod render;
mod sim;
mod types;
mod ui;

use std::fs::File;

use clap::Parser;
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = cli.into_config()?;
    info!(
        "starting: {:?} seeding, G = {}, cull radius {}, {} fps cap",
        config.seed_mode, config.gravitational_constant, config.cull_radius, config.frame_rate_cap
    );
    let summary = ui::run(config)?;
    println!(
        "{} frames, {:.2} simulated units, {} particles culled, {} left",
        summary.frames, summary.sim_time, summary.culled_total, summary.survivors
    );
    Ok(())
}

/// The terminal is in raw mode while running, so logs either go to a file or
/// stay at `warn` on stderr unless `RUST_LOG` says otherwise.
fn init_logging(path: Option<&std::path::Path>) -> std::io::Result<()> {
    let default_filter = if path.is_some() { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = path {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
