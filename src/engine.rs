//! Game flow state machine.
//!
//! The [`GameController`] owns the current [`GameState`], the running session and the random number
//! generator mazes are drawn from. The presentation layer drives it through [`GameController::tick`]
//! once per frame and renders the [`Snapshot`] it gets back.

use rand::{rngs::StdRng, Rng, SeedableRng as _};

use crate::{
    countdown::{self, GameClock, TIME_BUDGET_SECS},
    maze::{self, Grid},
    types::{Button, Cell, Direction, GameState, Input, Outcome, Position},
};

/// Manhattan distance up to which the player can see.
pub const VISIBILITY_RADIUS: usize = 4;

/// Default number of maze rows.
pub const DEFAULT_ROWS: usize = 15;

/// Default number of maze columns.
pub const DEFAULT_COLS: usize = 20;

/// Fixed parameters every session is played with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    /// Rows of each generated maze.
    pub rows: usize,
    /// Columns of each generated maze.
    pub cols: usize,
    /// Length of the countdown in seconds.
    pub time_budget_secs: u64,
    /// Manhattan distance up to which cells are disclosed to the player.
    pub visibility_radius: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self::with_size(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Rules {
    /// Standard rules played on a maze of `rows` by `cols` cells.
    pub const fn with_size(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            time_budget_secs: TIME_BUDGET_SECS,
            visibility_radius: VISIBILITY_RADIUS,
        }
    }
}

/// Returns whether `cell` is within `radius` steps of `player` by Manhattan distance.
pub const fn is_visible(player: Position, cell: Position, radius: usize) -> bool {
    player.manhattan_distance(cell) <= radius
}

/// State of a single playthrough, from start to outcome.
#[derive(Clone, Debug)]
struct Session {
    /// Maze the session is played on.
    grid: Grid,
    /// Current player cell. Always a floor of [`grid`](Session::grid).
    player: Position,
    /// Countdown started when the session began.
    clock: GameClock,
    /// How the session ended, if it has.
    outcome: Outcome,
    /// Seconds left when the session ended, kept for display.
    final_remaining: Option<i64>,
}

impl Session {
    /// Starts a session on `grid` with the player on the start cell.
    fn new(grid: Grid, clock: GameClock) -> Self {
        Self {
            player: grid.start(),
            grid,
            clock,
            outcome: Outcome::Pending,
            final_remaining: None,
        }
    }

    /// Moves the player one cell in `direction` if that cell exists and is a floor.
    fn step(&mut self, direction: Direction) {
        if let Some(candidate) = self.player.offset(direction, 1) {
            if self.grid.is_floor(candidate) {
                self.player = candidate;
            }
        }
    }

    /// Applies every held movement button for one tick.
    ///
    /// Each direction is checked against the cell the player stood on when the tick began, and the
    /// accepted steps are summed: opposite steps cancel, orthogonal ones combine. When the combined
    /// diagonal would end on a wall, the held directions are stepped one after another instead so
    /// the player still ends on a floor.
    fn apply_moves(&mut self, input: &Input) {
        let origin = self.player;
        let held: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|direction| input.is_pressed(direction.button()))
            .collect();
        let accepted = |direction: Direction| {
            held.contains(&direction)
                && origin
                    .offset(direction, 1)
                    .is_some_and(|candidate| self.grid.is_floor(candidate))
        };
        let net = |towards: Direction, away: Direction| match (accepted(towards), accepted(away)) {
            (true, false) => Some(towards),
            (false, true) => Some(away),
            _ => None,
        };

        let vertical = net(Direction::Up, Direction::Down);
        let horizontal = net(Direction::Left, Direction::Right);
        let target = [vertical, horizontal]
            .into_iter()
            .flatten()
            .try_fold(origin, |position, direction| position.offset(direction, 1));

        match target {
            Some(target) if self.grid.is_floor(target) => self.player = target,
            _ => {
                for direction in held {
                    self.step(direction);
                }
            }
        }
    }

    /// Records the outcome and freezes the countdown value.
    fn finish(&mut self, outcome: Outcome, remaining: i64) {
        self.outcome = outcome;
        self.final_remaining = Some(remaining);
    }

    /// Seconds left at `now_ms`, or the frozen value once the session has ended.
    fn remaining(&self, now_ms: u64) -> i64 {
        self.final_remaining
            .unwrap_or_else(|| self.clock.remaining(now_ms))
    }
}

/// Read-only view of the game handed to the renderer after every tick.
///
/// The snapshot only discloses what the player may see: cells outside the visibility radius are
/// absent and the exit is flagged only when it is within reach of sight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Active state.
    pub state: GameState,
    /// Rows of the maze in play, or of the next maze while in the menu.
    pub rows: usize,
    /// Columns of the maze in play, or of the next maze while in the menu.
    pub cols: usize,
    /// Cells within the visibility radius of the player, in row-major order.
    pub visible_cells: Vec<(Position, Cell)>,
    /// Player cell, when a session exists.
    pub player: Option<Position>,
    /// Exit cell, when a session exists and it is visible.
    pub exit: Option<Position>,
    /// Whether the exit is within the visibility radius.
    pub exit_visible: bool,
    /// Seconds left, clamped at zero.
    pub remaining_seconds: u64,
    /// Session outcome, [`Outcome::Pending`] unless in [`GameState::GameOver`].
    pub outcome: Outcome,
}

/// Finite state machine driving the game.
///
/// The controller moves between [`GameState::Menu`], [`GameState::Playing`] and
/// [`GameState::GameOver`]. A session exists exactly while the state is not the menu.
#[derive(Debug)]
pub struct GameController<R = StdRng> {
    /// Parameters applied to every new session.
    rules: Rules,
    /// Source of randomness for maze generation.
    rng: R,
    /// Active state.
    state: GameState,
    /// Running or finished session.
    session: Option<Session>,
}

impl GameController<StdRng> {
    /// Creates a controller whose mazes come from a [`StdRng`].
    ///
    /// With a seed the sequence of generated mazes is reproducible; without one the generator is
    /// seeded from system entropy.
    pub fn from_seed(rules: Rules, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Self::new(rules, rng)
    }
}

impl<R: Rng> GameController<R> {
    /// Creates a controller in the menu, drawing mazes from `rng`.
    pub fn new(rules: Rules, rng: R) -> Self {
        Self {
            rules,
            rng,
            state: GameState::Menu,
            session: None,
        }
    }

    /// Active state.
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Rules applied to new sessions.
    pub const fn rules(&self) -> Rules {
        self.rules
    }

    /// Outcome of the current session, or [`Outcome::Pending`] without one.
    pub fn outcome(&self) -> Outcome {
        self.session
            .as_ref()
            .map_or(Outcome::Pending, |session| session.outcome)
    }

    /// Player cell of the current session.
    pub fn player(&self) -> Option<Position> {
        self.session.as_ref().map(|session| session.player)
    }

    /// Maze of the current session.
    pub fn grid(&self) -> Option<&Grid> {
        self.session.as_ref().map(|session| &session.grid)
    }

    /// Advances the game by one tick and returns what the renderer should show.
    ///
    /// At most one state transition happens per tick:
    /// - In the menu only [`Button::Start`] has an effect; it starts a session.
    /// - While playing, every held movement button is checked against the position the tick began
    ///   at and the accepted steps are combined. The exit check runs before the timeout check, so
    ///   reaching the exit on the tick the clock runs out still wins.
    /// - After the game only [`Button::Restart`] and [`Button::ReturnToMenu`] have an effect, with
    ///   restart taking precedence when both are held.
    pub fn tick(&mut self, input: &Input, now_ms: u64) -> Snapshot {
        match self.state {
            GameState::Menu => {
                if input.is_pressed(Button::Start) {
                    self.start_session(now_ms);
                }
            }
            GameState::Playing => self.advance(input, now_ms),
            GameState::GameOver => {
                if input.is_pressed(Button::Restart) {
                    self.start_session(now_ms);
                } else if input.is_pressed(Button::ReturnToMenu) {
                    self.return_to_menu();
                }
            }
        }

        self.snapshot(now_ms)
    }

    /// Builds the render snapshot at `now_ms` without advancing the game.
    pub fn snapshot(&self, now_ms: u64) -> Snapshot {
        let Some(session) = &self.session else {
            return Snapshot {
                state: self.state,
                rows: self.rules.rows,
                cols: self.rules.cols,
                visible_cells: Vec::new(),
                player: None,
                exit: None,
                exit_visible: false,
                remaining_seconds: self.rules.time_budget_secs,
                outcome: Outcome::Pending,
            };
        };

        let radius = self.rules.visibility_radius;
        let player = session.player;
        let exit = session.grid.exit();
        let exit_visible = is_visible(player, exit, radius);

        let rows = player.row.saturating_sub(radius)..=player.row.saturating_add(radius);
        let visible_cells = rows
            .flat_map(|row| {
                let cols = player.col.saturating_sub(radius)..=player.col.saturating_add(radius);
                cols.map(move |col| Position::new(row, col))
            })
            .filter(|position| is_visible(player, *position, radius))
            .filter_map(|position| Some((position, session.grid.get(position)?)))
            .collect();

        Snapshot {
            state: self.state,
            rows: session.grid.rows(),
            cols: session.grid.cols(),
            visible_cells,
            player: Some(player),
            exit: exit_visible.then_some(exit),
            exit_visible,
            remaining_seconds: countdown::display_seconds(session.remaining(now_ms)),
            outcome: session.outcome,
        }
    }

    /// Discards any previous session and starts a fresh one at `now_ms`.
    fn start_session(&mut self, now_ms: u64) {
        let grid = maze::generate(self.rules.rows, self.rules.cols, &mut self.rng);
        let clock = GameClock::start(now_ms, self.rules.time_budget_secs);

        tracing::info!(
            rows = grid.rows(),
            cols = grid.cols(),
            started_at = now_ms,
            "session started"
        );
        tracing::debug!(from = ?self.state, to = ?GameState::Playing, "state transition");

        self.session = Some(Session::new(grid, clock));
        self.state = GameState::Playing;
    }

    /// Drops the session and goes back to the menu.
    fn return_to_menu(&mut self) {
        tracing::debug!(from = ?self.state, to = ?GameState::Menu, "state transition");

        self.session = None;
        self.state = GameState::Menu;
    }

    /// Applies one playing tick: movement first, then the win and timeout checks.
    fn advance(&mut self, input: &Input, now_ms: u64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let remaining = session.clock.remaining(now_ms);

        session.apply_moves(input);

        let outcome = if session.player == session.grid.exit() {
            Outcome::Won
        } else if remaining <= 0 {
            Outcome::Lost
        } else {
            return;
        };

        session.finish(outcome, remaining);
        self.state = GameState::GameOver;

        tracing::info!(?outcome, remaining, "session ended");
        tracing::debug!(from = ?GameState::Playing, to = ?GameState::GameOver, "state transition");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an input with the given buttons held.
    fn press(buttons: &[Button]) -> Input {
        buttons.iter().copied().collect()
    }

    /// Creates a seeded controller that has started a session at time zero on the given grid.
    fn playing_on(grid: &str) -> GameController {
        let mut controller = GameController::from_seed(Rules::default(), Some(1));
        let _ = controller.tick(&press(&[Button::Start]), 0);
        let session = controller
            .session
            .as_mut()
            .expect("start should create a session");
        session.grid = Grid::parse(grid).expect("test grid should parse");
        session.player = Position::new(0, 0);

        controller
    }

    /// Moves a controller straight to the game over screen by running out the clock.
    fn lost_controller() -> GameController {
        let mut controller = playing_on("...\n...\n...");
        let _ = controller.tick(&Input::new(), 60_000);
        assert_eq!(controller.state(), GameState::GameOver);

        controller
    }

    #[test]
    fn test_menu_ignores_everything_but_start() {
        let mut controller = GameController::from_seed(Rules::default(), Some(3));

        for button in [
            Button::MoveUp,
            Button::MoveDown,
            Button::MoveLeft,
            Button::MoveRight,
            Button::Restart,
            Button::ReturnToMenu,
            Button::Quit,
        ] {
            let snapshot = controller.tick(&press(&[button]), 100);

            assert_eq!(snapshot.state, GameState::Menu, "{button:?} must not leave the menu");
            assert!(controller.grid().is_none(), "{button:?} must not create a session");
        }
    }

    #[test]
    fn test_start_creates_session() {
        let mut controller = GameController::from_seed(Rules::with_size(9, 11), Some(3));
        let snapshot = controller.tick(&press(&[Button::Start, Button::MoveDown]), 500);

        assert_eq!(snapshot.state, GameState::Playing);
        assert_eq!(snapshot.player, Some(Position::new(0, 0)), "start tick does not move");
        assert_eq!(snapshot.outcome, Outcome::Pending);
        assert_eq!(snapshot.remaining_seconds, 60);
        assert_eq!((snapshot.rows, snapshot.cols), (9, 11));

        let grid = controller.grid().expect("session should exist");
        assert!(grid.is_floor(grid.start()));
        assert!(grid.is_floor(grid.exit()));
    }

    #[test]
    fn test_move_into_wall_is_rejected() {
        let mut controller = playing_on(".#.\n#..\n...");

        let _ = controller.tick(&press(&[Button::MoveRight]), 16);
        assert_eq!(controller.player(), Some(Position::new(0, 0)));

        let _ = controller.tick(&press(&[Button::MoveDown]), 32);
        assert_eq!(controller.player(), Some(Position::new(0, 0)));
    }

    #[test]
    fn test_move_out_of_bounds_is_rejected() {
        let mut controller = playing_on("...\n...\n...");

        let _ = controller.tick(&press(&[Button::MoveUp]), 16);
        let _ = controller.tick(&press(&[Button::MoveLeft]), 32);

        assert_eq!(controller.player(), Some(Position::new(0, 0)));
        assert_eq!(controller.state(), GameState::Playing);
    }

    #[test]
    fn test_move_onto_floor() {
        let mut controller = playing_on("..#\n#..\n#..");

        let _ = controller.tick(&press(&[Button::MoveRight]), 16);
        assert_eq!(controller.player(), Some(Position::new(0, 1)));

        let _ = controller.tick(&press(&[Button::MoveDown]), 32);
        assert_eq!(controller.player(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_two_orthogonal_steps_in_one_tick() {
        let mut controller = playing_on("...\n...\n...");

        let _ = controller.tick(&press(&[Button::MoveDown, Button::MoveRight]), 16);

        assert_eq!(controller.player(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_diagonal_through_wall_corner_stops_on_floor() {
        let mut controller = playing_on("..\n#.\n..");

        let _ = controller.tick(&press(&[Button::MoveDown, Button::MoveRight]), 16);

        assert_eq!(
            controller.player(),
            Some(Position::new(0, 1)),
            "down is blocked, right still applies"
        );
    }

    #[test]
    fn test_opposite_open_steps_cancel() {
        let mut controller = playing_on("...\n...\n...");
        let _ = controller.tick(&press(&[Button::MoveDown, Button::MoveRight]), 16);
        assert_eq!(controller.player(), Some(Position::new(1, 1)));

        let _ = controller.tick(&press(&[Button::MoveUp, Button::MoveDown]), 32);
        assert_eq!(controller.player(), Some(Position::new(1, 1)));

        let _ = controller.tick(&press(&[Button::MoveLeft, Button::MoveRight]), 48);
        assert_eq!(controller.player(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_opposite_steps_with_blocked_side() {
        let mut controller = playing_on(".\n.\n#\n.");
        if let Some(session) = controller.session.as_mut() {
            session.player = Position::new(1, 0);
        }

        let _ = controller.tick(&press(&[Button::MoveUp, Button::MoveDown]), 16);

        assert_eq!(
            controller.player(),
            Some(Position::new(0, 0)),
            "the open side applies, the walled side is ignored"
        );
    }

    #[test]
    fn test_opposite_steps_with_both_sides_blocked() {
        let mut controller = playing_on("#\n.\n#\n.");
        if let Some(session) = controller.session.as_mut() {
            session.player = Position::new(1, 0);
        }

        let _ = controller.tick(&press(&[Button::MoveUp, Button::MoveDown]), 16);

        assert_eq!(controller.player(), Some(Position::new(1, 0)));
    }

    #[test]
    fn test_diagonal_onto_wall_steps_in_order() {
        let mut controller = playing_on("..\n.#\n..");

        let _ = controller.tick(&press(&[Button::MoveDown, Button::MoveRight]), 16);

        let player = controller.player().expect("session should exist");
        assert_eq!(player, Position::new(1, 0), "down applies, right then hits the wall");
        assert!(
            controller.grid().is_some_and(|grid| grid.is_floor(player)),
            "player must stay on a floor"
        );
    }

    #[test]
    fn test_playing_ignores_flow_buttons() {
        let mut controller = playing_on("...\n...\n...");
        let _ = controller.tick(&press(&[Button::MoveRight]), 16);
        let grid = controller.grid().cloned();

        for button in [
            Button::Start,
            Button::Restart,
            Button::ReturnToMenu,
            Button::Quit,
        ] {
            let snapshot = controller.tick(&press(&[button]), 1_000);

            assert_eq!(snapshot.state, GameState::Playing, "{button:?} must not leave play");
            assert_eq!(snapshot.outcome, Outcome::Pending);
            assert_eq!(
                controller.player(),
                Some(Position::new(0, 1)),
                "{button:?} must not reset the player"
            );
            assert_eq!(controller.grid().cloned(), grid, "{button:?} must not swap the maze");
        }
    }

    #[test]
    fn test_reaching_exit_wins() {
        let mut controller = playing_on("..");

        let snapshot = controller.tick(&press(&[Button::MoveRight]), 10_500);

        assert_eq!(snapshot.state, GameState::GameOver);
        assert_eq!(snapshot.outcome, Outcome::Won);
        assert_eq!(controller.outcome(), Outcome::Won);
    }

    #[test]
    fn test_timeout_loses() {
        let mut controller = playing_on("...\n...\n...");

        let snapshot = controller.tick(&Input::new(), 59_999);
        assert_eq!(snapshot.state, GameState::Playing);
        assert_eq!(snapshot.remaining_seconds, 1);

        let snapshot = controller.tick(&Input::new(), 60_001);
        assert_eq!(snapshot.state, GameState::GameOver);
        assert_eq!(snapshot.outcome, Outcome::Lost);
        assert_eq!(snapshot.remaining_seconds, 0);
    }

    #[test]
    fn test_win_takes_precedence_over_timeout() {
        let mut controller = playing_on("..");

        let snapshot = controller.tick(&press(&[Button::MoveRight]), 60_000);

        assert_eq!(snapshot.outcome, Outcome::Won, "exit on the last tick still wins");
    }

    #[test]
    fn test_remaining_is_frozen_after_game_over() {
        let mut controller = playing_on("..");
        let _ = controller.tick(&press(&[Button::MoveRight]), 10_500);

        let later = controller.tick(&Input::new(), 45_000);

        assert_eq!(later.remaining_seconds, 50);
        assert_eq!(later.state, GameState::GameOver);
    }

    #[test]
    fn test_game_over_ignores_movement_and_start() {
        let mut controller = lost_controller();
        let player = controller.player();

        for button in [
            Button::Start,
            Button::MoveDown,
            Button::MoveRight,
            Button::Quit,
        ] {
            let snapshot = controller.tick(&press(&[button]), 61_000);

            assert_eq!(snapshot.state, GameState::GameOver, "{button:?} must not leave game over");
            assert_eq!(snapshot.outcome, Outcome::Lost, "outcome stays frozen");
            assert_eq!(controller.player(), player, "{button:?} must not move the player");
        }
    }

    #[test]
    fn test_restart_starts_fresh_session() {
        let mut controller = lost_controller();

        let snapshot = controller.tick(&press(&[Button::Restart]), 70_000);

        assert_eq!(snapshot.state, GameState::Playing);
        assert_eq!(snapshot.outcome, Outcome::Pending);
        assert_eq!(snapshot.player, Some(Position::new(0, 0)));
        assert_eq!(snapshot.remaining_seconds, 60, "clock restarts with the session");

        let snapshot = controller.tick(&Input::new(), 129_999);
        assert_eq!(snapshot.state, GameState::Playing);
    }

    #[test]
    fn test_return_to_menu_discards_session() {
        let mut controller = lost_controller();

        let snapshot = controller.tick(&press(&[Button::ReturnToMenu]), 70_000);

        assert_eq!(snapshot.state, GameState::Menu);
        assert_eq!(snapshot.player, None);
        assert!(snapshot.visible_cells.is_empty());
        assert_eq!(controller.outcome(), Outcome::Pending);
        assert!(controller.grid().is_none());
    }

    #[test]
    fn test_restart_wins_over_return_to_menu() {
        let mut controller = lost_controller();

        let snapshot = controller.tick(&press(&[Button::ReturnToMenu, Button::Restart]), 70_000);

        assert_eq!(snapshot.state, GameState::Playing);
    }

    #[test]
    fn test_is_visible_radius() {
        let player = Position::new(5, 5);

        assert!(is_visible(player, Position::new(5, 9), VISIBILITY_RADIUS));
        assert!(!is_visible(player, Position::new(5, 10), VISIBILITY_RADIUS));
        assert!(is_visible(player, Position::new(3, 3), VISIBILITY_RADIUS));
        assert!(!is_visible(player, Position::new(2, 3), VISIBILITY_RADIUS));
    }

    #[test]
    fn test_snapshot_discloses_only_visible_cells() {
        let mut controller = playing_on(
            "...........\n...........\n...........\n...........\n...........\n...........\n...........\n...........\n...........\n...........\n...........",
        );
        if let Some(session) = controller.session.as_mut() {
            session.player = Position::new(5, 5);
        }

        let snapshot = controller.snapshot(1_000);

        assert_eq!(snapshot.visible_cells.len(), 41, "a radius four diamond holds 41 cells");
        assert!(snapshot
            .visible_cells
            .iter()
            .all(|(position, _)| position.manhattan_distance(Position::new(5, 5)) <= 4));
        assert!(snapshot
            .visible_cells
            .iter()
            .any(|(position, _)| *position == Position::new(5, 9)));
        assert!(!snapshot.exit_visible, "exit at (10, 10) is ten steps away");
        assert_eq!(snapshot.exit, None);
    }

    #[test]
    fn test_snapshot_clips_to_grid_and_shows_near_exit() {
        let mut controller = playing_on("..........");
        if let Some(session) = controller.session.as_mut() {
            session.player = Position::new(0, 5);
        }

        let snapshot = controller.snapshot(1_000);

        assert_eq!(snapshot.visible_cells.len(), 9, "columns 1 through 9 of a single row");
        assert!(snapshot.exit_visible);
        assert_eq!(snapshot.exit, Some(Position::new(0, 9)));
    }

    #[test]
    fn test_same_seed_same_mazes() {
        let mut first = GameController::from_seed(Rules::default(), Some(99));
        let mut second = GameController::from_seed(Rules::default(), Some(99));

        let _ = first.tick(&press(&[Button::Start]), 0);
        let _ = second.tick(&press(&[Button::Start]), 0);

        assert_eq!(first.grid(), second.grid());
    }
}
