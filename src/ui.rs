pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
    Frame,
};
use spellcard::{
    input::SwipeHint,
    session::{EndReason, Feedback, Mode, STARTING_LIVES, TIME_LIMIT_CHOICES},
    vocabulary::Language,
};
use unicode_width::UnicodeWidthStr;

use crate::{App, CELL_WIDTH_UNITS};
use screen::Screen;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const CARD_HEIGHT: u16 = 5;
const CARD_MIN_WIDTH: u16 = 24;
const CARD_PADDING: u16 = 6;

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(self.game.state()).render(self, area, buf);
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn key_hint(key: &str, label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("({key}) "), bold().fg(Color::Yellow)),
        Span::raw(label.to_string()),
    ])
}

pub(crate) fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![
        Line::from(Span::styled("Is it spelled correctly?", bold())),
        Line::from(Span::styled("เขียนถูกหรือผิด?", dim())),
        Line::default(),
    ];

    match app.game.language() {
        None => {
            lines.push(Line::from("Choose a language"));
            lines.push(Line::default());
            lines.push(key_hint("t", Language::Thai.label()));
            lines.push(key_hint("e", Language::English.label()));
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("(esc) quit", dim())));
        }
        Some(language) => {
            lines.push(Line::from(vec![
                Span::raw("Language: "),
                Span::styled(language.label(), bold().fg(Color::Cyan)),
            ]));
            lines.push(Line::default());
            lines.push(key_hint("p", "Practice  - focuses on the words you miss"));
            lines.push(key_hint("n", "Endless   - play until you stop"));
            lines.push(key_hint("x", "Test      - every word exactly once"));
            lines.push(key_hint("h", "Hardcore  - three lives"));

            let choices = TIME_LIMIT_CHOICES
                .iter()
                .enumerate()
                .map(|(i, secs)| format!("{}={secs}s", i + 1))
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(key_hint("1-6", &format!("Timer     - {choices}")));
            lines.push(key_hint(
                "t",
                &format!("Timer     - {}s", app.config.time_limit_secs),
            ));
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "(backspace) change language   (esc) back",
                dim(),
            )));
        }
    }

    if !app.recent_sessions.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Recent sessions", bold())));
        for record in &app.recent_sessions {
            lines.push(Line::from(Span::styled(
                format!(
                    "{} {}  {} pts  {}%  {}",
                    record.language,
                    record.mode,
                    record.score,
                    record.accuracy_percent,
                    record.played_at.format("%b %d %H:%M")
                ),
                dim(),
            )));
        }
    }

    if let Some(message) = &app.message {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            message.clone(),
            bold().fg(Color::Red),
        )));
    }

    let height = (lines.len() as u16).min(area.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
}

pub(crate) fn render_card_screen(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // hud
            Constraint::Min(0),
            Constraint::Length(1), // feedback
            Constraint::Length(CARD_HEIGHT),
            Constraint::Length(1), // swipe hint
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    render_hud(app, chunks[0], buf);

    let feedback = match app.game.feedback() {
        Some(Feedback::Correct) => Span::styled("Correct!", bold().fg(Color::Green)),
        Some(Feedback::Wrong) => Span::styled("Wrong!", bold().fg(Color::Red)),
        None => Span::raw(""),
    };
    Paragraph::new(feedback)
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    render_card(app, chunks[3], buf);

    let hint = match app.game.gestures().hint() {
        Some(SwipeHint::Correct) => Span::styled("✓ spelled correctly", bold().fg(Color::Green)),
        Some(SwipeHint::Incorrect) => Span::styled("✗ misspelled", bold().fg(Color::Red)),
        None => Span::raw(""),
    };
    Paragraph::new(hint)
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    Paragraph::new(Span::styled(
        "(←) correct / (→) misspelled / drag the card to swipe / (q) finish",
        dim().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[6], buf);
}

fn render_hud(app: &App, area: Rect, buf: &mut Buffer) {
    let (Some(config), Some(runtime)) = (app.game.config(), app.game.runtime()) else {
        return;
    };

    let mut spans = vec![
        Span::styled(format!("{}", config.mode), dim()),
        Span::raw("   "),
        Span::styled(format!("★ {}", runtime.score), bold().fg(Color::Yellow)),
    ];

    if config.mode == Mode::Test {
        let total = runtime.test_pool.len();
        let current = (runtime.test_index + 1).min(total);
        spans.push(Span::raw("   "));
        spans.push(Span::styled(format!("{current}/{total}"), bold()));
    }

    if let Some(secs) = runtime.time_remaining_secs() {
        let style = if secs <= 10 {
            bold().fg(Color::Red)
        } else {
            bold()
        };
        spans.push(Span::raw("   "));
        spans.push(Span::styled(format!("⏱ {secs}s"), style));
    }

    if config.mode == Mode::Hardcore {
        let lost = STARTING_LIVES.saturating_sub(runtime.lives_remaining);
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            "♥".repeat(runtime.lives_remaining as usize),
            bold().fg(Color::Red),
        ));
        spans.push(Span::styled("♡".repeat(lost as usize), dim()));
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// The card follows a drag horizontally and tints towards the answer it
/// would commit
fn render_card(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(word) = app.game.current_word() else {
        return;
    };
    if area.width == 0 || area.height == 0 {
        return;
    }

    let width = u16::try_from(word.word.width())
        .unwrap_or(u16::MAX)
        .saturating_add(CARD_PADDING * 2)
        .max(CARD_MIN_WIDTH)
        .min(area.width);
    let centered = area.x as i32 + (area.width - width) as i32 / 2;
    let shift = (app.game.gestures().offset() / CELL_WIDTH_UNITS).round() as i32;
    let x = (centered + shift).clamp(area.x as i32, (area.x + area.width - width) as i32) as u16;
    let card = Rect::new(x, area.y, width, area.height.min(CARD_HEIGHT));

    let border_style = match app.game.gestures().hint() {
        Some(SwipeHint::Correct) => Style::default().fg(Color::Green),
        Some(SwipeHint::Incorrect) => Style::default().fg(Color::Red),
        None if app.game.is_input_locked() => dim(),
        None => Style::default(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    let inner = block.inner(card);
    block.render(card, buf);

    if inner.height == 0 {
        return;
    }
    let row = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
    Paragraph::new(Span::styled(word.word.clone(), bold()))
        .alignment(Alignment::Center)
        .render(row, buf);
}

fn end_reason_text(reason: EndReason) -> &'static str {
    match reason {
        EndReason::Quit => "Session finished",
        EndReason::TimeUp => "Time's up!",
        EndReason::OutOfLives => "Out of lives!",
        EndReason::PoolExhausted => "Every word answered!",
        EndReason::Mastered => "All words mastered!",
    }
}

pub(crate) fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(summary) = app.game.summary() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled("Game Over!", bold())),
        Line::from(Span::styled(end_reason_text(summary.end_reason), dim())),
        Line::default(),
        Line::from(vec![
            Span::raw("Score: "),
            Span::styled(summary.score.to_string(), bold().fg(Color::Yellow)),
        ]),
        Line::from(format!(
            "Accuracy: {}% ({}/{})",
            summary.accuracy_percent, summary.total_correct, summary.total_answers
        )),
    ];

    if let Some(best) = app.best_score {
        lines.push(Line::from(Span::styled(format!("Best: {best}"), dim())));
    }
    lines.push(Line::default());

    if summary.words_seen == 0 {
        lines.push(Line::from(Span::styled("No words registered.", dim())));
    } else if summary.frequently_missed.is_empty() {
        lines.push(Line::from(Span::styled(
            "No mistakes!",
            bold().fg(Color::Green),
        )));
    } else {
        lines.push(Line::from(Span::styled("Frequently missed", bold())));
        for missed in &summary.frequently_missed {
            lines.push(Line::from(vec![
                Span::styled(missed.word.clone(), bold().fg(Color::Red)),
                Span::styled(
                    format!("  {} of {}", missed.wrong, missed.appearances),
                    dim(),
                ),
            ]));
        }
    }

    if !app.all_time_missed.is_empty() {
        let words = app
            .all_time_missed
            .iter()
            .map(|(word, wrong)| format!("{word} ({wrong})"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Most missed overall: {words}"),
            dim(),
        )));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        "(r)etry / (m)enu / (esc)ape",
        dim().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use spellcard::{
        config::Config,
        game::Game,
        history::SessionRecord,
        input::InputEvent,
        vocabulary::{Vocabulary, VocabularyWord},
    };

    fn create_test_app(words: &[(&str, bool)]) -> App {
        let english = words
            .iter()
            .map(|(w, c)| VocabularyWord::new(*w, *c))
            .collect();
        let game = Game::with_seed(Vocabulary::new(vec![], english), Some(3));
        App::new(game, Config::default(), None)
    }

    fn render_to_string(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .chunks(area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_menu_language_step() {
        let app = create_test_app(&[("cat", true)]);
        let text = render_to_string(&app, Rect::new(0, 0, 80, 24));

        assert!(text.contains("Is it spelled correctly?"));
        assert!(text.contains("English (US)"));
        assert!(text.contains("Choose a language"));
    }

    #[test]
    fn test_menu_mode_step_and_message() {
        let mut app = create_test_app(&[("cat", true)]);
        app.game.select_language(Language::English).unwrap();
        app.message = Some("no vocabulary words available for Thai".to_string());

        let text = render_to_string(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("Practice"));
        assert!(text.contains("Hardcore"));
        assert!(text.contains("1=30s"));
        assert!(text.contains("no vocabulary words"));
    }

    #[test]
    fn test_menu_lists_recent_sessions() {
        let mut app = create_test_app(&[("cat", true)]);
        app.recent_sessions = vec![SessionRecord {
            language: "english".to_string(),
            mode: "hardcore".to_string(),
            time_limit_secs: None,
            score: 12,
            accuracy_percent: 86,
            total_answers: 14,
            end_reason: "OutOfLives".to_string(),
            played_at: Local::now(),
        }];

        let text = render_to_string(&app, Rect::new(0, 0, 80, 30));
        assert!(text.contains("Recent sessions"));
        assert!(text.contains("english hardcore  12 pts  86%"));
    }

    #[test]
    fn test_oversized_word_does_not_overflow_card_width() {
        let long = "w".repeat(70_000);
        let mut app = create_test_app(&[(long.as_str(), true)]);
        app.game.select_language(Language::English).unwrap();
        app.game.start(Mode::Endless, None).unwrap();

        let text = render_to_string(&app, Rect::new(0, 0, 60, 20));
        assert!(text.contains("wwwww"));
    }

    #[test]
    fn test_playing_shows_word_and_score() {
        let mut app = create_test_app(&[("necessary", true)]);
        app.game.select_language(Language::English).unwrap();
        app.game.start(Mode::Endless, None).unwrap();

        let text = render_to_string(&app, Rect::new(0, 0, 80, 20));
        assert!(text.contains("necessary"));
        assert!(text.contains("★ 0"));
        assert!(!text.contains("⏱"));
    }

    #[test]
    fn test_playing_hud_for_timer_and_hardcore() {
        let mut app = create_test_app(&[("cat", true)]);
        app.game.select_language(Language::English).unwrap();
        app.game.start(Mode::Timer, Some(90)).unwrap();
        let text = render_to_string(&app, Rect::new(0, 0, 80, 20));
        assert!(text.contains("90s"));

        app.game.quit().unwrap();
        app.game.back_to_menu().unwrap();
        app.game.select_language(Language::English).unwrap();
        app.game.start(Mode::Hardcore, None).unwrap();
        app.game.answer(false);
        let text = render_to_string(&app, Rect::new(0, 0, 80, 20));
        assert!(text.contains("♥♥♡"));
        assert!(text.contains("Wrong!"));
    }

    #[test]
    fn test_playing_test_progress() {
        let mut app = create_test_app(&[("a", true), ("b", false), ("c", true)]);
        app.game.select_language(Language::English).unwrap();
        app.game.start(Mode::Test, None).unwrap();

        let text = render_to_string(&app, Rect::new(0, 0, 80, 20));
        assert!(text.contains("1/3"));
    }

    #[test]
    fn test_drag_shows_hint() {
        let mut app = create_test_app(&[("cat", true)]);
        app.game.select_language(Language::English).unwrap();
        app.game.start(Mode::Endless, None).unwrap();
        app.game.handle_input(InputEvent::PointerDown(400.0));
        app.game.handle_input(InputEvent::PointerMove(320.0));

        let text = render_to_string(&app, Rect::new(0, 0, 80, 20));
        assert!(text.contains("spelled correctly"));
        assert!(text.contains("cat"));
    }

    #[test]
    fn test_results_screen() {
        let mut app = create_test_app(&[("wierd", false)]);
        app.game.select_language(Language::English).unwrap();
        app.game.start(Mode::Endless, None).unwrap();
        app.game.answer(true);
        app.game.quit().unwrap();
        app.best_score = Some(7);
        app.all_time_missed = vec![("wierd".to_string(), 4)];

        let text = render_to_string(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("Game Over!"));
        assert!(text.contains("Accuracy: 0% (0/1)"));
        assert!(text.contains("Best: 7"));
        assert!(text.contains("Most missed overall: wierd (4)"));
        assert!(text.contains("wierd"));
    }

    #[test]
    fn test_results_without_answers() {
        let mut app = create_test_app(&[("cat", true)]);
        app.game.select_language(Language::English).unwrap();
        app.game.start(Mode::Endless, None).unwrap();
        app.game.quit().unwrap();

        let text = render_to_string(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("No words registered."));
        assert!(text.contains("Accuracy: 0% (0/0)"));
    }

    #[test]
    fn test_ui_small_areas_do_not_panic() {
        let mut app = create_test_app(&[("a-rather-long-word-indeed", true)]);
        for area in [Rect::new(0, 0, 1, 1), Rect::new(0, 0, 12, 4)] {
            render_to_string(&app, area);
        }
        app.game.select_language(Language::English).unwrap();
        app.game.start(Mode::Hardcore, None).unwrap();
        for area in [Rect::new(0, 0, 1, 1), Rect::new(0, 0, 12, 4), Rect::new(0, 0, 200, 60)] {
            render_to_string(&app, area);
        }
    }
}
