//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::engine::{Rules, DEFAULT_COLS, DEFAULT_ROWS};

/// Settings read from the command line.
///
/// Only the maze size and the random seed are tunable; the countdown length and the visibility
/// radius are the same for every game.
#[derive(Parser, Clone, Debug, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Maze height in cells
    #[arg(long, default_value_t = DEFAULT_ROWS, value_parser = parse_dimension)]
    pub rows: usize,

    /// Maze width in cells
    #[arg(long, default_value_t = DEFAULT_COLS, value_parser = parse_dimension)]
    pub cols: usize,

    /// Random seed; the same seed yields the same sequence of mazes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the first maze of the session as text and exit
    #[arg(long)]
    pub print_maze: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            seed: None,
            log_file: None,
            print_maze: false,
        }
    }
}

impl Config {
    /// Game rules derived from this configuration.
    pub const fn rules(&self) -> Rules {
        Rules::with_size(self.rows, self.cols)
    }
}

/// Largest accepted maze height or width.
///
/// Keeps the grid allocation small and every coordinate within the terminal's `u16` range.
pub const MAX_DIMENSION: usize = 1_024;

/// Parses a maze dimension, which must be an integer from 1 to [`MAX_DIMENSION`].
fn parse_dimension(text: &str) -> Result<usize, String> {
    match text.parse::<usize>() {
        Ok(0) => Err("dimension must be at least 1".to_owned()),
        Ok(value) if value > MAX_DIMENSION => {
            Err(format!("dimension must be at most {MAX_DIMENSION}"))
        }
        Ok(value) => Ok(value),
        Err(err) => Err(err.to_string()),
    }
}
