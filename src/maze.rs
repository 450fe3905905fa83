//! Maze generation and grid storage.
//!
//! This module holds the [`Grid`] type the game is played on and the randomized depth-first carver
//! that fills it. Carving only ever targets cells whose row and column are both even, so corridors
//! are always separated by at least one wall cell and the carved part of the grid is a perfect maze.

use std::fmt;

use color_eyre::eyre::{bail, Result};
use rand::{seq::SliceRandom as _, Rng};

use crate::types::{Cell, Direction, Position};

/// Character used for walls in the textual grid format.
const WALL_CHAR: char = '#';

/// Character used for floors in the textual grid format.
const FLOOR_CHAR: char = '.';

/// Fixed-size rectangle of wall and floor cells stored in row-major order.
///
/// A grid is never empty: every constructor yields at least one row and one column, so the start
/// cell at the top-left corner and the exit cell at the bottom-right corner always exist. On a
/// single cell grid both are the same cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Cells laid out row after row.
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid of the given size with every cell set to `cell`.
    ///
    /// Zero dimensions are raised to one.
    pub(crate) fn filled(rows: usize, cols: usize, cell: Cell) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);

        Self {
            rows,
            cols,
            cells: vec![cell; rows * cols],
        }
    }

    /// Parses a grid from text where `#` is a wall and `.` is a floor.
    ///
    /// Surrounding whitespace is ignored, every remaining line is one row.
    ///
    /// # Errors
    ///
    /// This function returns an error if:
    /// - The input holds no rows
    /// - Rows differ in length
    /// - Any character other than `#` or `.` appears
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.trim().lines().map(str::trim).collect();

        let Some(first) = lines.first() else {
            bail!("grid text holds no rows");
        };
        let cols = first.chars().count();
        if cols == 0 {
            bail!("grid rows must not be empty");
        }

        let mut cells = Vec::with_capacity(lines.len() * cols);
        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                bail!("row {row} is not {cols} cells wide");
            }

            for symbol in line.chars() {
                cells.push(match symbol {
                    WALL_CHAR => Cell::Wall,
                    FLOOR_CHAR => Cell::Floor,
                    other => bail!("unexpected character {other:?} in row {row}"),
                });
            }
        }

        Ok(Self {
            rows: lines.len(),
            cols,
            cells,
        })
    }

    /// Number of rows in the grid.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the grid.
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Top-left cell, where every session begins.
    pub const fn start(&self) -> Position {
        Position::new(0, 0)
    }

    /// Bottom-right cell the player has to reach.
    pub const fn exit(&self) -> Position {
        Position::new(self.rows.saturating_sub(1), self.cols.saturating_sub(1))
    }

    /// Translates a position into an index into [`cells`](Grid::cells).
    fn index(&self, position: Position) -> Option<usize> {
        (position.row < self.rows && position.col < self.cols)
            .then(|| position.row * self.cols + position.col)
    }

    /// Returns the cell at `position`, or [`None`] when it lies outside the grid.
    pub fn get(&self, position: Position) -> Option<Cell> {
        self.cells.get(self.index(position)?).copied()
    }

    /// Returns whether `position` lies inside the grid and holds a floor.
    pub fn is_floor(&self, position: Position) -> bool {
        self.get(position).is_some_and(Cell::is_floor)
    }

    /// Overwrites the cell at `position`. Positions outside the grid are ignored.
    pub(crate) fn set(&mut self, position: Position, cell: Cell) {
        if let Some(index) = self.index(position) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = cell;
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.cells.chunks(self.cols).enumerate() {
            if row > 0 {
                writeln!(formatter)?;
            }
            for cell in line {
                let symbol = match cell {
                    Cell::Wall => WALL_CHAR,
                    Cell::Floor => FLOOR_CHAR,
                };
                write!(formatter, "{symbol}")?;
            }
        }

        Ok(())
    }
}

/// Generates a maze of `rows` by `cols` cells.
///
/// The maze body is carved by a randomized depth-first walk from the start cell, after which the
/// exit corner and its left, upper and (on grids of at least three by three) diagonal neighbours are
/// forced open. The carve does not always visit the exit corner on its own, so the patch is what
/// makes the exit accessible. Zero dimensions are raised to one.
///
/// The same `rng` state always produces the same maze.
pub fn generate<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Grid {
    let mut grid = carve(rows, cols, rng);
    open_exit(&mut grid);

    tracing::debug!(rows = grid.rows(), cols = grid.cols(), "generated maze");

    grid
}

/// Carves a perfect maze on the even-parity lattice of a fully walled grid.
///
/// This is the recursive backtracker written with an explicit stack: look at the top cell, open the
/// first unvisited lattice neighbour two steps away in shuffled direction order together with the
/// cell in between, and pop the stack once no neighbour qualifies.
fn carve<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Grid {
    let mut grid = Grid::filled(rows, cols, Cell::Wall);
    let start = grid.start();
    grid.set(start, Cell::Floor);

    let mut stack = vec![start];
    let mut directions = Direction::ALL;

    while let Some(&current) = stack.last() {
        directions.shuffle(rng);

        let next = directions.iter().find_map(|&direction| {
            let target = current.offset(direction, 2)?;
            (grid.get(target) == Some(Cell::Wall)).then_some((direction, target))
        });

        match next {
            Some((direction, target)) => {
                if let Some(between) = current.offset(direction, 1) {
                    grid.set(between, Cell::Floor);
                }
                grid.set(target, Cell::Floor);
                stack.push(target);
            }
            None => {
                let _ = stack.pop();
            }
        }
    }

    grid
}

/// Forces the exit corner and its immediate surroundings open.
///
/// Only local accessibility is guaranteed here; nothing checks that the patched area joins the
/// carved body.
fn open_exit(grid: &mut Grid) {
    let exit = grid.exit();
    grid.set(exit, Cell::Floor);

    for direction in [Direction::Left, Direction::Up] {
        if let Some(neighbour) = exit.offset(direction, 1) {
            grid.set(neighbour, Cell::Floor);
        }
    }

    if grid.rows() > 2 && grid.cols() > 2 {
        grid.set(
            Position::new(exit.row.saturating_sub(1), exit.col.saturating_sub(1)),
            Cell::Floor,
        );
    }
}
