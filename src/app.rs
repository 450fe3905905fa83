//! Frame loop tying the terminal, the input source and the game controller together.

use std::time::{Duration, Instant};

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::DefaultTerminal;

use crate::{
    config::Config,
    engine::{GameController, Snapshot},
    events,
    types::{Button, Input},
    ui,
};

/// Target number of ticks per second.
pub const TICKS_PER_SECOND: u32 = 60;

/// Application state container for the maze game.
///
/// This structure owns the game controller and the reference instant the millisecond clock counts
/// from. Every frame goes through the same three phases: sample input, tick the controller, render
/// the snapshot it returns.
pub struct App {
    /// Application exit flag.
    ///
    /// This field starts off `false` and is set once the quit button is seen.
    pub(crate) exit: bool,
    /// Game state machine.
    pub(crate) controller: GameController,
    /// Instant the application clock counts from.
    pub(crate) epoch: Instant,
}

impl Default for App {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl App {
    /// Creates the application in the menu using the rules and seed from `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            exit: false,
            controller: GameController::from_seed(config.rules(), config.seed),
            epoch: Instant::now(),
        }
    }

    /// Runs the main loop of the application.
    ///
    /// Each iteration samples input for one tick's worth of time, advances the game and redraws.
    /// The loop continues until the quit button is pressed, after which the function returns to the
    /// call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick = Duration::from_secs(1) / TICKS_PER_SECOND;

        tracing::info!(ticks_per_second = TICKS_PER_SECOND, "starting frame loop");

        while !self.exit {
            let input = events::sample_input(Instant::now() + tick)?;
            let snapshot = self.update(&input)?;

            let _ = terminal.try_draw(|frame| {
                ui::draw(&snapshot, frame)
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))
            })?;
        }

        tracing::info!("frame loop stopped");

        Ok(())
    }

    /// Applies one tick of input and returns the snapshot to render.
    ///
    /// # Errors
    ///
    /// This function returns an error if the elapsed time no longer fits in milliseconds.
    pub(crate) fn update(&mut self, input: &Input) -> Result<Snapshot> {
        if input.is_pressed(Button::Quit) {
            self.exit = true;
        }

        let now_ms = u64::try_from(self.epoch.elapsed().as_millis())?;

        Ok(self.controller.tick(input, now_ms))
    }
}

/// Returns the first maze a session started with `config` would be played on, as text.
///
/// # Errors
///
/// This function returns an error if starting a session produced no maze.
pub fn preview_maze(config: &Config) -> Result<String> {
    let mut controller = GameController::from_seed(config.rules(), config.seed);
    let _ = controller.tick(&[Button::Start].into_iter().collect(), 0);

    controller
        .grid()
        .map(ToString::to_string)
        .ok_or_eyre("starting a session generated no maze")
}
