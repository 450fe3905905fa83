//! Keyboard sampling for the frame loop.
//!
//! Terminals only report key presses, not which keys are currently held, so a held key shows up as
//! the stream of repeat presses the terminal generates for it. Every press seen during a tick counts
//! as the matching button being held for that tick.

use std::time::Instant;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::{Button, Input};

/// Collects every key press until `deadline` and returns the buttons they map to.
///
/// This function also drains any events already queued when the deadline has passed, so a slow
/// frame never leaves input behind for the next one.
///
/// # Errors
///
/// - [`std::io::Error`]
pub(crate) fn sample_input(deadline: Instant) -> Result<Input> {
    let mut input = Input::new();

    while event::poll(deadline.saturating_duration_since(Instant::now()))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Release {
                continue;
            }
            if let Some(button) = button_for(key) {
                input.press(button);
            }
        }
    }

    Ok(input)
}

/// Maps a key to the logical button it stands for.
///
/// Arrows and the `h`/`j`/`k`/`l` keys move, space starts, `r` restarts, `m` returns to the menu,
/// and `q`, escape or control-c quit.
pub(crate) fn button_for(key: KeyEvent) -> Option<Button> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(Button::Quit);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Button::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Button::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Button::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Button::MoveRight),
        KeyCode::Char(' ') => Some(Button::Start),
        KeyCode::Char('r' | 'R') => Some(Button::Restart),
        KeyCode::Char('m' | 'M') => Some(Button::ReturnToMenu),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Button::Quit),
        _ => None,
    }
}
