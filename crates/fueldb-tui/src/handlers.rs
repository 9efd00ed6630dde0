//! Keyboard event handling.

use crate::app::{App, InputMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fueldb_core::{Entity, Repository, WidgetKind};

/// Handle a key event. Returns true once the dialog has closed.
pub fn handle_key<E: Entity, R: Repository<E>>(app: &mut App<E, R>, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Editing => handle_editing_key(app, key),
        InputMode::ConfirmDelete => handle_confirm_key(app, key),
    }
    app.is_closed()
}

fn handle_editing_key<E: Entity, R: Repository<E>>(app: &mut App<E, R>, key: KeyEvent) {
    // Ctrl+C rejects the dialog like Esc
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.cancel();
        return;
    }

    match key.code {
        KeyCode::Enter => app.confirm(),
        KeyCode::Esc => app.cancel(),
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::Char(' ') if app.focused_kind() == Some(WidgetKind::CHECK_BOX) => app.toggle(),
        KeyCode::Char(c) => app.type_char(c),
        KeyCode::Backspace => app.backspace(),
        _ => {}
    }
}

fn handle_confirm_key<E: Entity, R: Repository<E>>(app: &mut App<E, R>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.answer_delete(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_delete(false),
        _ => {}
    }
}
