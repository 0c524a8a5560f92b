//! `roster` - interactive collaborator registry
//!
//! Loads configuration, opens the database, reads the content file, and runs
//! the interactive session on stdin/stdout until `quit`, end of input, or
//! Ctrl-C.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tokio::io::{self, BufReader};
use tracing::info;

use roster::cli::Cli;
use roster::{init_logging, App, Config, Session};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    cli.apply_overrides(&mut config);

    let app = App::from_config(&config)?;

    let mut session = Session::new(
        app,
        config.form.clone(),
        BufReader::new(io::stdin()),
        io::stdout(),
    );

    tokio::select! {
        result = session.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }
    Ok(())
}
