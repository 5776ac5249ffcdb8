//! Input handling for the TUI.
//!
//! Processes keyboard events and updates application state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::FormField;
use crate::domain::Stage;
use crate::App;

/// Handle keyboard events.
pub fn handle_events(key: KeyEvent, app: &mut App) {
    // Quit works everywhere, including while typing
    if key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        app.quit();
        return;
    }

    match app.stage() {
        Stage::Retrieve => handle_form_mode(key, app),
        _ => handle_stage_mode(key, app),
    }
}

/// Handle input while the retrieval form is shown.
fn handle_form_mode(key: KeyEvent, app: &mut App) {
    match key.code {
        // Alt+Enter adds a line to the content
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            if app.form.focus == FormField::Content {
                app.form.enter_char('\n');
            }
        }
        KeyCode::Enter => app.continue_stage(),

        KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_prev(),

        KeyCode::Left if app.form.focus == FormField::Classification => {
            app.form.prev_classification();
        }
        KeyCode::Right if app.form.focus == FormField::Classification => {
            app.form.next_classification();
        }

        KeyCode::Backspace => app.form.delete_char(),

        KeyCode::Char(c) => {
            app.form.enter_char(c);
            app.clear_status();
        }

        _ => {}
    }
}

/// Handle input on the analyze, document, advise and report panels.
fn handle_stage_mode(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('q') => app.quit(),

        KeyCode::Enter | KeyCode::Char('c') => app.continue_stage(),

        KeyCode::Char('r') => app.retry(),

        KeyCode::Char('n') if app.stage() == Stage::Report => app.new_session(),

        KeyCode::Up | KeyCode::Char('k') => app.scroll_document_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_document_down(),

        _ => {}
    }
}
