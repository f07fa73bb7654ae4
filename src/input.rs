//! Key bindings: arrows/space plus vim-style aliases.

use crate::game::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks for: a game command, or something the app handles itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Game(Command),
    Restart,
    Quit,
    None,
}

/// Map key event to action.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    match code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Char('p' | 'P') => Action::Game(Command::TogglePause),
        KeyCode::Left | KeyCode::Char('h') => Action::Game(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Action::Game(Command::MoveRight),
        KeyCode::Up | KeyCode::Char('k') => Action::Game(Command::Rotate),
        KeyCode::Down | KeyCode::Char('j') => Action::Game(Command::SoftDrop),
        KeyCode::Char(' ') | KeyCode::Enter => Action::Game(Command::HardDrop),
        _ => Action::None,
    }
}
