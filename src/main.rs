mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use spellcard::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    error::VocabularyError,
    game::Game,
    history::{HistoryDb, SessionRecord},
    input::InputEvent,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    session::{GameState, Mode, TIME_LIMIT_CHOICES},
    vocabulary::{Language, Vocabulary},
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;
/// Drag units per terminal column when translating mouse swipes
pub(crate) const CELL_WIDTH_UNITS: f64 = 8.0;
const ALL_TIME_MISSED_SHOWN: usize = 3;
const RECENT_SESSIONS_SHOWN: usize = 3;

/// swipe-style spelling flashcards for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Is it spelled correctly? Swipe or press left for a correct spelling and right for a misspelling. Practice mode adapts to the words you miss."
)]
pub struct Cli {
    /// language to play in (skips the language menu)
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// mode to start straight away (needs a language)
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// timer length in seconds: 30, 60, 90, 120, 150 or 180
    #[clap(short = 't', long = "time", value_parser = parse_time_limit)]
    time_limit_secs: Option<u64>,

    /// seed for a reproducible word order
    #[clap(long)]
    seed: Option<u64>,

    /// CSV word list (word,isCorrect) to use for Thai
    #[clap(long)]
    thai_file: Option<PathBuf>,

    /// CSV word list (word,isCorrect) to use for English
    #[clap(long)]
    english_file: Option<PathBuf>,

    /// don't record finished sessions in the history database
    #[clap(long)]
    no_history: bool,
}

fn parse_time_limit(s: &str) -> Result<u64, String> {
    let secs: u64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if TIME_LIMIT_CHOICES.contains(&secs) {
        Ok(secs)
    } else {
        Err(format!("time limit must be one of {TIME_LIMIT_CHOICES:?}"))
    }
}

impl Cli {
    /// Remember the language and timer preferences for later launches.
    /// Word-list files only apply to this run.
    fn remember(&self, cfg: &mut Config) {
        if let Some(language) = self.language {
            cfg.language = Some(language);
        }
        if let Some(secs) = self.time_limit_secs {
            cfg.time_limit_secs = secs;
        }
    }

    fn thai_vocabulary<'a>(&'a self, cfg: &'a Config) -> Option<&'a Path> {
        self.thai_file.as_deref().or(cfg.thai_vocabulary.as_deref())
    }

    fn english_vocabulary<'a>(&'a self, cfg: &'a Config) -> Option<&'a Path> {
        self.english_file.as_deref().or(cfg.english_vocabulary.as_deref())
    }
}

/// Load the word lists, then persist the preferences. Nothing is saved when
/// a word list can't be read.
fn load_settings<S: ConfigStore>(
    cli: &Cli,
    store: &S,
) -> Result<(Config, Vocabulary), VocabularyError> {
    let mut config = store.load();
    cli.remember(&mut config);

    let vocabulary = Vocabulary::load(
        cli.thai_vocabulary(&config),
        cli.english_vocabulary(&config),
    )?;

    if let Err(e) = store.save(&config) {
        log::warn!("failed to save config: {e}");
    }
    Ok((config, vocabulary))
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub config: Config,
    pub history: Option<HistoryDb>,
    pub best_score: Option<u32>,
    /// Words missed most across every recorded session for the language
    pub all_time_missed: Vec<(String, u32)>,
    /// Latest finished sessions, newest first, shown in the menu
    pub recent_sessions: Vec<SessionRecord>,
    pub message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(game: Game, config: Config, history: Option<HistoryDb>) -> Self {
        Self {
            game,
            config,
            history,
            best_score: None,
            all_time_missed: Vec::new(),
            recent_sessions: Vec::new(),
            message: None,
            should_quit: false,
        }
    }

    pub fn start(&mut self, mode: Mode, time_limit_secs: Option<u64>) {
        self.transition(|game| game.start(mode, time_limit_secs));
    }

    pub fn handle_event(&mut self, event: AppEvent, elapsed: Duration) {
        let before = self.game.state();
        self.game.advance(elapsed);
        self.after_transition(before);

        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Mouse(mouse) => self.on_mouse(mouse),
            AppEvent::Resize | AppEvent::Tick => {}
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        self.message = None;

        match self.game.state() {
            GameState::Menu => match (self.game.language(), key.code) {
                (None, KeyCode::Char('t') | KeyCode::Char('1')) => {
                    self.transition(|game| game.select_language(Language::Thai))
                }
                (None, KeyCode::Char('e') | KeyCode::Char('2')) => {
                    self.transition(|game| game.select_language(Language::English))
                }
                (None, KeyCode::Esc) => self.should_quit = true,
                (Some(_), KeyCode::Esc | KeyCode::Backspace) => {
                    self.transition(|game| game.clear_language())
                }
                (Some(_), KeyCode::Char('p')) => self.start(Mode::Practice, None),
                (Some(_), KeyCode::Char('n')) => self.start(Mode::Endless, None),
                (Some(_), KeyCode::Char('x')) => self.start(Mode::Test, None),
                (Some(_), KeyCode::Char('h')) => self.start(Mode::Hardcore, None),
                (Some(_), KeyCode::Char('t')) => {
                    self.start(Mode::Timer, Some(self.config.time_limit_secs))
                }
                (Some(_), KeyCode::Char(c @ '1'..='6')) => {
                    let idx = c as usize - '1' as usize;
                    self.start(Mode::Timer, Some(TIME_LIMIT_CHOICES[idx]));
                }
                _ => {}
            },
            GameState::Playing => match key.code {
                KeyCode::Left => self.input(InputEvent::KeyLeft),
                KeyCode::Right => self.input(InputEvent::KeyRight),
                KeyCode::Esc | KeyCode::Char('q') => self.transition(|game| game.quit()),
                _ => {}
            },
            GameState::Result => match key.code {
                KeyCode::Char('r') => self.transition(|game| game.play_again()),
                KeyCode::Char('m') => self.transition(|game| game.back_to_menu()),
                KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if self.game.state() != GameState::Playing {
            return;
        }
        let x = mouse.column as f64 * CELL_WIDTH_UNITS;
        let event = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => InputEvent::PointerDown(x),
            MouseEventKind::Drag(MouseButton::Left) => InputEvent::PointerMove(x),
            MouseEventKind::Up(MouseButton::Left) => InputEvent::PointerUp,
            _ => return,
        };
        self.input(event);
    }

    fn input(&mut self, event: InputEvent) {
        let before = self.game.state();
        self.game.handle_input(event);
        self.after_transition(before);
    }

    /// Run a game command, surfacing failures as a message on screen
    fn transition<F>(&mut self, command: F)
    where
        F: FnOnce(&mut Game) -> Result<(), spellcard::error::GameError>,
    {
        let before = self.game.state();
        if let Err(e) = command(&mut self.game) {
            log::info!("{e}");
            self.message = Some(e.to_string());
        }
        self.after_transition(before);
    }

    fn after_transition(&mut self, before: GameState) {
        if before == GameState::Playing && self.game.state() == GameState::Result {
            self.on_session_end();
        }
    }

    fn on_session_end(&mut self) {
        let Some(summary) = self.game.summary().cloned() else {
            return;
        };
        let Some(history) = self.history.as_mut() else {
            self.best_score = None;
            self.all_time_missed.clear();
            return;
        };

        if let Err(e) = history.record(&summary) {
            log::warn!("failed to record session: {e}");
        }
        self.best_score = history
            .best_score(summary.language, summary.mode, summary.time_limit_secs)
            .unwrap_or_else(|e| {
                log::warn!("failed to read best score: {e}");
                None
            });
        self.all_time_missed = history
            .most_missed(summary.language, ALL_TIME_MISSED_SHOWN)
            .unwrap_or_else(|e| {
                log::warn!("failed to read missed words: {e}");
                Vec::new()
            });
        self.refresh_recent();
    }

    fn refresh_recent(&mut self) {
        let Some(history) = self.history.as_ref() else {
            return;
        };
        self.recent_sessions = history
            .recent(RECENT_SESSIONS_SHOWN)
            .unwrap_or_else(|e| {
                log::warn!("failed to read recent sessions: {e}");
                Vec::new()
            });
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    // the terminal is in raw mode, so logs go to a file
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let (config, vocabulary) = load_settings(&cli, &FileConfigStore::new())?;

    let history = if config.record_history && !cli.no_history {
        AppDirs::history_path().and_then(|path| {
            HistoryDb::open(&path)
                .inspect_err(|e| log::warn!("history disabled: {e}"))
                .ok()
        })
    } else {
        None
    };

    let mut app = App::new(Game::with_seed(vocabulary, cli.seed), config, history);
    app.refresh_recent();
    if let Some(language) = app.config.language {
        app.transition(|game| game.select_language(language));
    }
    if let Some(mode) = cli.mode {
        let time_limit = (mode == Mode::Timer).then_some(app.config.time_limit_secs);
        app.start(mode, time_limit);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = run_app(&mut terminal, &mut app, runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut runner: Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui::draw(app, f))?;

    while !app.should_quit {
        let event = runner.step();
        let elapsed = runner.elapsed();
        app.handle_event(event, elapsed);
        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}
