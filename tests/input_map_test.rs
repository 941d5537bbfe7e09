use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use autumn_burst::input::{map_key, map_mouse, should_quit, Command};
use autumn_burst::types::{GameAction, GameMode};

#[test]
fn arrows_mean_different_things_per_mode() {
    let left = KeyEvent::from(KeyCode::Left);
    assert_eq!(
        map_key(left, GameMode::Burst),
        Some(Command::Cursor { d_row: 0, d_col: -1 })
    );
    assert_eq!(
        map_key(left, GameMode::Drop),
        Some(Command::Action(GameAction::MoveLeft))
    );

    let up = KeyEvent::from(KeyCode::Up);
    assert_eq!(
        map_key(up, GameMode::Burst),
        Some(Command::Cursor { d_row: -1, d_col: 0 })
    );
    assert_eq!(
        map_key(up, GameMode::Drop),
        Some(Command::Action(GameAction::HardDrop))
    );
}

#[test]
fn space_activates_or_hard_drops() {
    let space = KeyEvent::from(KeyCode::Char(' '));
    assert_eq!(map_key(space, GameMode::Burst), Some(Command::Activate));
    assert_eq!(
        map_key(space, GameMode::Drop),
        Some(Command::Action(GameAction::HardDrop))
    );
}

#[test]
fn unmapped_keys_and_quit() {
    assert_eq!(map_key(KeyEvent::from(KeyCode::Char('z')), GameMode::Burst), None);
    assert!(should_quit(KeyEvent::from(KeyCode::Char('Q'))));
    assert!(!should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
}

#[test]
fn only_left_press_is_a_click() {
    let down = MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 3,
        row: 7,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(map_mouse(down), Some((3, 7)));
    let up = MouseEvent {
        kind: MouseEventKind::Up(MouseButton::Left),
        ..down
    };
    assert_eq!(map_mouse(up), None);
}
