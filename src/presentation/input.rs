use crate::application::{App, AppMode};
use super::ui::help_line_count;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Form => Self::handle_form_mode(app, key, modifiers),
            AppMode::ConfirmDelete => Self::handle_confirm_delete_mode(app, key),
            AppMode::Export => Self::handle_export_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('e') = key {
                app.start_export();
            }
            return;
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Home | KeyCode::Char('g') => app.select_first(),
            KeyCode::End | KeyCode::Char('G') => app.select_last(),
            KeyCode::Char('a') => app.start_add(),
            KeyCode::Enter | KeyCode::Char('e') => app.start_edit(),
            KeyCode::Char('d') | KeyCode::Delete => app.stage_delete(),
            KeyCode::Char('s') | KeyCode::Char(' ') => app.toggle_selected_status(),
            KeyCode::Char('f') => app.cycle_filter(),
            KeyCode::F(1) | KeyCode::Char('?') => app.show_help(),
            KeyCode::Esc => app.status_message = None,
            // 'q' is handled by the main loop
            _ => {}
        }
    }

    fn handle_form_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Enter => app.submit_form(),
            KeyCode::Esc => app.cancel_form(),
            KeyCode::BackTab => app.focus_previous_field(),
            KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => app.focus_previous_field(),
            KeyCode::Tab | KeyCode::Down => app.focus_next_field(),
            KeyCode::Up => app.focus_previous_field(),
            _ => Self::handle_text_input(app, key),
        }
    }

    fn handle_confirm_delete_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => app.cancel_delete(),
            _ => {}
        }
    }

    fn handle_export_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_export(),
            KeyCode::Esc => app.cancel_export(),
            _ => Self::handle_text_input(app, key),
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        let last_line = help_line_count().saturating_sub(1);
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll = (app.help_scroll + 1).min(last_line);
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll = (app.help_scroll + 5).min(last_line);
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_text_input(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Backspace => app.delete_before_cursor(),
            KeyCode::Delete => app.delete_at_cursor(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }
}
