//! A maze escape game for the terminal.
//!
//! The player starts in the top-left corner of a randomly generated maze and has sixty seconds to
//! reach the exit in the bottom-right corner, seeing only the cells a few steps around them. The
//! library holds the game logic ([`maze`], [`countdown`], [`engine`]) separately from the terminal
//! front end driven by [`App`].

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
pub mod config;
pub mod countdown;
pub mod engine;
mod events;
pub mod logging;
pub mod maze;
pub mod types;
mod ui;

pub use app::{preview_maze, App, TICKS_PER_SECOND};
