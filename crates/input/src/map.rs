//! Key and mouse mapping from terminal events to game commands.

use crate::types::{GameAction, GameMode};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// What the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the burst-mode selection cursor.
    Cursor { d_row: i8, d_col: i8 },
    /// Burst the cluster under the cursor.
    Activate,
    Action(GameAction),
}

/// Map keyboard input to a command for the given mode.
///
/// Key releases are ignored so terminals that report them do not double up.
pub fn map_key(key: KeyEvent, mode: GameMode) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Char('p') | KeyCode::Char('P') => return Some(Command::Action(GameAction::Pause)),
        KeyCode::Char('r') | KeyCode::Char('R') => {
            return Some(Command::Action(GameAction::Restart))
        }
        _ => {}
    }

    match mode {
        GameMode::Burst => map_burst_key(key.code),
        GameMode::Drop => map_drop_key(key.code).map(Command::Action),
    }
}

fn map_burst_key(code: KeyCode) -> Option<Command> {
    let cursor = |d_row, d_col| Some(Command::Cursor { d_row, d_col });
    match code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            cursor(0, -1)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            cursor(0, 1)
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            cursor(-1, 0)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            cursor(1, 0)
        }
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Activate),
        _ => None,
    }
}

fn map_drop_key(code: KeyCode) -> Option<GameAction> {
    match code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(GameAction::MoveLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(GameAction::MoveRight)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(GameAction::SoftDrop)
        }
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W')
        | KeyCode::Char(' ') => Some(GameAction::HardDrop),
        _ => None,
    }
}

/// Terminal cell `(x, y)` of a left click, if this is one.
pub fn map_mouse(event: MouseEvent) -> Option<(u16, u16)> {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some((event.column, event.row)),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
