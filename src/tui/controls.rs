//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
/// While a notice is shown only dismiss and quit keys act.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }

    if app.dashboard.notice().is_some() {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => app.dismiss_notice(),
            KeyCode::Char('q') => app.quit = true,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('r') | KeyCode::Enter => app.run_evaluation(),
        KeyCode::Char('e') => app.export(),
        _ => {}
    }
}
