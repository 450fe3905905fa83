//! This crate contains the source code for the binary for the game darkmaze.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use darkmaze::{config::Config, logging, preview_maze, App};

fn main() -> Result<()> {
    install()?;

    let config = Config::parse();
    if let Some(path) = &config.log_file {
        logging::init(path)?;
    }

    if config.print_maze {
        println!("{}", preview_maze(&config)?);
        return Ok(());
    }

    let mut terminal = ratatui::init();
    let result = App::new(&config).run(&mut terminal);
    ratatui::restore();

    result
}
