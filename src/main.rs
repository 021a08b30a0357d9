pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use huemix::{
    clock::SystemClock,
    runtime::{CrosstermEventSource, FixedTicker, MixEvent, Runner},
    settings::parse_field,
    Adjustment, Channel, Difficulty, GameConfig, GameMode, SessionController, Settings,
    SettingsField,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::ui::screen::{current_screen, Flow};

const TICK_RATE_MS: u64 = 100;
const SHADE_STEP: f64 = 0.1;

/// mix RGB channels until your color matches the target
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A color-mixing game for the terminal: nudge red, green and blue until your mix matches a random target, racing the clock, an action budget, or both in endless mode."
)]
pub struct Cli {
    /// game mode
    #[clap(short = 'm', long, value_enum, default_value_t = GameMode::Time)]
    mode: GameMode,

    /// difficulty (easy shows hints)
    #[clap(short = 'd', long, value_enum, default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,

    /// seconds per round
    #[clap(short = 't', long, default_value_t = 60)]
    time_limit: u32,

    /// actions allowed per round
    #[clap(short = 'a', long, default_value_t = 20)]
    max_actions: u32,

    /// match percentage needed to win a round
    #[clap(short = 'p', long, default_value_t = 90.0, value_parser = parse_threshold)]
    accuracy_threshold: f64,

    /// how much one key press moves a channel
    #[clap(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..))]
    step: u8,

    /// adjustments applied per key press
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=255))]
    repeat: u32,

    /// seed for target colors, for reproducible games
    #[clap(long)]
    seed: Option<u64>,

    /// write debug logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    parse_field(SettingsField::AccuracyThreshold, s)
        .map(|patch| patch.accuracy_threshold.unwrap_or_default())
        .map_err(|e| e.to_string())
}

impl Cli {
    fn to_game_config(&self) -> GameConfig {
        GameConfig {
            mode: self.mode,
            difficulty: self.difficulty,
            settings: Settings {
                time_limit: self.time_limit,
                max_actions: self.max_actions,
                accuracy_threshold: self.accuracy_threshold,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Game,
    Settings,
}

/// In-progress edit of one settings field
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    pub field: SettingsField,
    pub buffer: String,
    pub message: Option<String>,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self {
            field: SettingsField::TimeLimit,
            buffer: String::new(),
            message: None,
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub session: SessionController<SystemClock>,
    pub state: AppState,
    pub form: SettingsForm,
    pub step: i32,
    pub repeat: u32,
}

impl App {
    pub fn new(cli: &Cli) -> Self {
        let config = cli.to_game_config();
        let session = match cli.seed {
            Some(seed) => SessionController::with_seed(config, SystemClock::new(), seed),
            None => SessionController::new(config),
        };

        Self {
            session,
            state: AppState::Game,
            form: SettingsForm::default(),
            step: i32::from(cli.step),
            repeat: cli.repeat,
        }
    }

    /// Map a game-screen key to the mix intent it stands for
    pub fn adjustment_for(&self, c: char) -> Option<Adjustment> {
        let step = self.step;
        let adj = match c {
            'r' => Adjustment::Channel(Channel::Red, step),
            'R' => Adjustment::Channel(Channel::Red, -step),
            'g' => Adjustment::Channel(Channel::Green, step),
            'G' => Adjustment::Channel(Channel::Green, -step),
            'b' => Adjustment::Channel(Channel::Blue, step),
            'B' => Adjustment::Channel(Channel::Blue, -step),
            '+' | '=' => Adjustment::All(step),
            '-' | '_' => Adjustment::All(-step),
            'l' => Adjustment::Shade {
                percentage: SHADE_STEP,
                toward_black: false,
            },
            'k' => Adjustment::Shade {
                percentage: SHADE_STEP,
                toward_black: true,
            },
            _ => return None,
        };
        Some(adj)
    }

    pub fn open_settings(&mut self) {
        self.state = AppState::Settings;
        self.form = SettingsForm::default();
        self.load_field(SettingsField::TimeLimit);
    }

    pub fn close_settings(&mut self) {
        self.state = AppState::Game;
    }

    pub fn load_field(&mut self, field: SettingsField) {
        self.form.field = field;
        self.form.buffer = self.session.staged_config().settings.get(field);
    }

    /// Commit the edit buffer; bad input keeps the old value and reports why
    pub fn commit_field(&mut self) {
        let field = self.form.field;
        let input = std::mem::take(&mut self.form.buffer);
        self.form.message = Some(match self.session.set_setting_raw(field, &input) {
            Ok(()) if self.session.is_playing() => format!("{field} saved, applies next round"),
            Ok(()) => format!("{field} saved"),
            Err(err) => err.to_string(),
        });
        self.load_field(field);
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }
        current_screen(&self.state).on_key(key, self)
    }
}

fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("huemix=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| err as Box<dyn Error>)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }
    info!(config = ?cli.to_game_config(), "starting huemix");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let was_playing = app.session.is_playing();

        match runner.step_session(&mut app.session) {
            MixEvent::Tick => {
                // redraw only while the clock can change what is on screen
                if was_playing {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            MixEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            MixEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    app.session.stop();
    Ok(())
}
