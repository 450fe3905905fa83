//! Type definitions shared by the maze generator, the game controller and the presentation layer.

use std::collections::BTreeSet;

/// Contents of a single maze cell.
///
/// A maze is made only of walls and floors. The player may stand on floors and never on walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Blocked cell.
    Wall,
    /// Passable cell.
    Floor,
}

impl Cell {
    /// Returns whether the player may stand on this cell.
    pub const fn is_floor(self) -> bool {
        matches!(self, Self::Floor)
    }
}

/// Cardinal direction on the grid.
///
/// Directions are shared by the generator, which carves two cells at a time, and by the controller,
/// which moves the player one cell at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row zero.
    Up,
    /// Away from row zero.
    Down,
    /// Towards column zero.
    Left,
    /// Away from column zero.
    Right,
}

impl Direction {
    /// All four directions in the order movement input is applied within a tick.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the logical button that requests a step in this direction.
    pub const fn button(self) -> Button {
        match self {
            Self::Up => Button::MoveUp,
            Self::Down => Button::MoveDown,
            Self::Left => Button::MoveLeft,
            Self::Right => Button::MoveRight,
        }
    }
}

/// Row and column of a cell, both zero-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Row index, growing downwards.
    pub row: usize,
    /// Column index, growing rightwards.
    pub col: usize,
}

impl Position {
    /// Builds a position from its row and column.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the sum of the absolute row and column differences between both positions.
    pub const fn manhattan_distance(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Returns the position `distance` cells away in `direction`.
    ///
    /// Stepping above row zero or left of column zero yields [`None`]. There is no upper bound here;
    /// positions past the far edge of a grid are rejected by the grid lookups themselves.
    pub fn offset(self, direction: Direction, distance: usize) -> Option<Self> {
        let position = match direction {
            Direction::Up => Self::new(self.row.checked_sub(distance)?, self.col),
            Direction::Down => Self::new(self.row.checked_add(distance)?, self.col),
            Direction::Left => Self::new(self.row, self.col.checked_sub(distance)?),
            Direction::Right => Self::new(self.row, self.col.checked_add(distance)?),
        };

        Some(position)
    }
}

/// Screen the game is currently on.
///
/// Exactly one state is active at any time. Transitions between them are driven by
/// [`GameController::tick`](crate::engine::GameController::tick).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameState {
    /// Title screen waiting for the start button.
    #[default]
    Menu,
    /// A session is running and the clock is counting down.
    Playing,
    /// The session has ended and its outcome is frozen.
    GameOver,
}

/// Result of a session.
///
/// The outcome is set once when the session ends and stays untouched until a new session starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// The session has not ended yet, or there is no session at all.
    #[default]
    Pending,
    /// The player reached the exit in time.
    Won,
    /// The clock ran out first.
    Lost,
}

/// Logical buttons the input source reports once per tick.
///
/// These are decoupled from physical keys; the mapping lives in the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Button {
    /// Step one cell up.
    MoveUp,
    /// Step one cell down.
    MoveDown,
    /// Step one cell left.
    MoveLeft,
    /// Step one cell right.
    MoveRight,
    /// Leave the menu and start a session.
    Start,
    /// Start a fresh session from the game over screen.
    Restart,
    /// Leave the game over screen for the menu.
    ReturnToMenu,
    /// Close the application.
    Quit,
}

/// Set of buttons held during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Input {
    /// Buttons reported as pressed.
    pressed: BTreeSet<Button>,
}

impl Input {
    /// Creates an input with no button pressed.
    pub const fn new() -> Self {
        Self {
            pressed: BTreeSet::new(),
        }
    }

    /// Marks `button` as pressed for this tick.
    pub fn press(&mut self, button: Button) {
        let _ = self.pressed.insert(button);
    }

    /// Returns whether `button` was pressed during this tick.
    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    /// Returns whether no button was pressed at all.
    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }
}

impl FromIterator<Button> for Input {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        Self {
            pressed: iter.into_iter().collect(),
        }
    }
}
