//! Rendering of game snapshots for every screen.

use color_eyre::eyre::Result;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    engine::Snapshot,
    types::{Cell, GameState, Outcome, Position},
};

/// Draws `snapshot` onto the frame.
///
/// The menu gets its own screen. While playing the visible part of the maze is drawn with the
/// countdown above it, and once the game is over the final maze stays on screen under a popup
/// announcing the outcome.
///
/// # Errors
///
/// This function returns an error if the maze does not fit terminal coordinates.
pub(crate) fn draw(snapshot: &Snapshot, frame: &mut Frame) -> Result<()> {
    clear(frame);

    match snapshot.state {
        GameState::Menu => menu(snapshot, frame),
        GameState::Playing => in_game(snapshot, frame)?,
        GameState::GameOver => {
            in_game(snapshot, frame)?;
            game_over(snapshot.outcome, frame);
        }
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
pub(crate) fn clear(frame: &mut Frame) {
    frame.render_widget(Clear, frame.area());
}

/// Returns a `width` by `height` rectangle centred in `area`, shrunk to fit if needed.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [space] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    space
}

/// Renders the title screen with the rules and controls.
fn menu(snapshot: &Snapshot, frame: &mut Frame) {
    let heading_style = Style::default().fg(Color::Yellow);
    let text_style = Style::default().fg(Color::Green);

    let lines = vec![
        Line::styled("HOW TO PLAY", heading_style).centered(),
        Line::raw(""),
        Line::styled("Navigate through the dark maze", text_style).centered(),
        Line::styled("You can only see nearby tiles", text_style).centered(),
        Line::styled("Reach the EXIT before time runs out", text_style).centered(),
        Line::styled(
            format!(
                "You have {} seconds to escape!",
                snapshot.remaining_seconds
            ),
            text_style,
        )
        .centered(),
        Line::raw(""),
        Line::styled("CONTROLS", heading_style).centered(),
        Line::raw(""),
        Line::styled("arrows or h/j/k/l : move", text_style).centered(),
        Line::styled("r : restart   m : menu   q : quit", text_style).centered(),
    ];

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let area = centered(frame.area(), 44, height);

    let block = Block::bordered()
        .title("DARK MAZE")
        .title_bottom("(space) start / (q) quit")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);
    let inner_space = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical(vec![Constraint::Max(1); lines.len()]).split(inner_space);
    for (line, row) in lines.into_iter().zip(rows.iter()) {
        frame.render_widget(line, *row);
    }
}

/// Renders the visible part of the maze, the player, the exit and the countdown.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
fn in_game(snapshot: &Snapshot, frame: &mut Frame) -> Result<()> {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Line::styled(
            format!("Time: {} ", snapshot.remaining_seconds),
            Style::default().fg(Color::White),
        )
        .right_aligned(),
        header,
    );

    let width = u16::try_from(snapshot.cols)?;
    let height = u16::try_from(snapshot.rows)?;
    let space = centered(body, width, height);

    let (walls, floors): (Vec<(Position, Cell)>, Vec<(Position, Cell)>) = snapshot
        .visible_cells
        .iter()
        .copied()
        .partition(|(_, cell)| *cell == Cell::Wall);
    let walls: Vec<Position> = walls.into_iter().map(|(position, _)| position).collect();
    let floors: Vec<Position> = floors.into_iter().map(|(position, _)| position).collect();
    let exit: Vec<Position> = snapshot.exit.into_iter().collect();
    let player: Vec<Position> = snapshot.player.into_iter().collect();

    let wall_coords = to_screen_coords(&walls, snapshot.rows, snapshot.cols)?;
    let floor_coords = to_screen_coords(&floors, snapshot.rows, snapshot.cols)?;
    let exit_coords = to_screen_coords(&exit, snapshot.rows, snapshot.cols)?;
    let player_coords = to_screen_coords(&player, snapshot.rows, snapshot.cols)?;

    let half_width = (f64::from(width) - 1.) / 2.;
    let half_height = (f64::from(height) - 1.) / 2.;

    let maze = Canvas::default()
        .x_bounds([-half_width, half_width])
        .y_bounds([-half_height, half_height])
        .marker(Marker::Block)
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &wall_coords,
                color: Color::Green,
            });
            ctx.draw(&Points {
                coords: &floor_coords,
                color: Color::DarkGray,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &exit_coords,
                color: Color::Red,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &player_coords,
                color: Color::Yellow,
            });
        });
    frame.render_widget(maze, space);

    let tooltip = Block::default()
        .title("(arrows/hjkl) move / (q) quit")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .borders(Borders::TOP);
    frame.render_widget(tooltip, footer);

    Ok(())
}

/// Renders the end-of-game popup over the maze.
fn game_over(outcome: Outcome, frame: &mut Frame) {
    let (message, color) = match outcome {
        Outcome::Won => ("YOU WIN!", Color::Yellow),
        Outcome::Lost | Outcome::Pending => ("TIME'S UP!", Color::Red),
    };

    let area = centered(frame.area(), 30, 5);
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title("Game Over")
        .title_bottom("(r) restart / (m) menu")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);
    let inner_space = block.inner(area);
    frame.render_widget(block, area);

    let [text] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(inner_space);
    frame.render_widget(
        Line::styled(
            message,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
        .centered(),
        text,
    );
}

/// Transforms maze positions into canvas coordinates centred on the origin.
///
/// Rows map to `y = (rows - 1) / 2 - row` and columns to `x = col - (cols - 1) / 2`, so a canvas
/// exactly `cols` cells wide and `rows` cells tall with matching bounds puts every position on its
/// own terminal cell.
///
/// # Errors
///
/// This function returns an error if a dimension or position exceeds [`u16::MAX`].
pub(crate) fn to_screen_coords(
    positions: &[Position],
    rows: usize,
    cols: usize,
) -> Result<Vec<(f64, f64)>> {
    let rows_n = f64::from(u16::try_from(rows)?);
    let cols_n = f64::from(u16::try_from(cols)?);

    positions
        .iter()
        .map(|position| {
            let screen_y = (rows_n - 1.) / 2. - f64::from(u16::try_from(position.row)?);
            let screen_x = f64::from(u16::try_from(position.col)?) - (cols_n - 1.) / 2.;

            Ok((screen_x, screen_y))
        })
        .collect()
}
