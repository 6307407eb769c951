use ratatui::{buffer::Buffer, layout::Rect};
use spellcard::session::GameState;

use crate::{
    ui::{render_card_screen, render_menu, render_results},
    App,
};

/// A UI Screen boundary: each game state draws itself into the frame buffer
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Language and mode selection
pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_menu(app, area, buf);
    }
}

/// The flashcard being judged, with score and timers
pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_card_screen(app, area, buf);
    }
}

pub struct ResultScreen;

impl Screen for ResultScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_results(app, area, buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: GameState) -> Box<dyn Screen> {
    match state {
        GameState::Menu => Box::new(MenuScreen),
        GameState::Playing => Box::new(PlayingScreen),
        GameState::Result => Box::new(ResultScreen),
    }
}
