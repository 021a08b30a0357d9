use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect};

use crate::{
    ui::{render_game, render_settings},
    App, AppState,
};

/// What the event loop should do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A UI Screen boundary: responsible for rendering and key handling
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
    fn on_key(&self, _key: KeyEvent, _app: &mut App) -> Flow {
        Flow::Continue
    }
}

/// Mixing screen: swatches, stats and the mix controls
pub struct GameScreen;

impl Screen for GameScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_game(app, area, buf);
    }

    fn on_key(&self, key: KeyEvent, app: &mut App) -> Flow {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Enter => app.session.start(),
            KeyCode::Char('n') => app.session.reset(),
            KeyCode::Char('m') => {
                let mode = app.session.staged_config().mode.next();
                app.session.set_mode(mode);
            }
            KeyCode::Char('d') => {
                let difficulty = app.session.staged_config().difficulty.next();
                app.session.set_difficulty(difficulty);
            }
            KeyCode::Char('s') => app.open_settings(),
            KeyCode::Char(c) => {
                if let Some(adjustment) = app.adjustment_for(c) {
                    app.session.adjust_repeated(adjustment, app.repeat);
                }
            }
            _ => {}
        }
        Flow::Continue
    }
}

/// Settings form; edits are committed one field at a time
pub struct SettingsScreen;

impl Screen for SettingsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_settings(app, area, buf);
    }

    fn on_key(&self, key: KeyEvent, app: &mut App) -> Flow {
        match key.code {
            KeyCode::Esc => app.close_settings(),
            KeyCode::Tab | KeyCode::Down => {
                let next = app.form.field.next();
                app.load_field(next);
            }
            KeyCode::Backspace => {
                app.form.buffer.pop();
            }
            KeyCode::Enter => app.commit_field(),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                app.form.buffer.push(c);
            }
            _ => {}
        }
        Flow::Continue
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Game => Box::new(GameScreen),
        AppState::Settings => Box::new(SettingsScreen),
    }
}
