use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use clap::Parser;
use neon_snake::config::{
    Difficulty, FRAME_INTERVAL, GameConfig, GridSize, TERMINAL_SWIPE_THRESHOLD, THEME_NEON,
};
use neon_snake::driver::GameDriver;
use neon_snake::feedback::{Effect, Feedback};
use neon_snake::game::{GameEvent, GameSession, SessionStatus};
use neon_snake::input::{GameInput, InputHandler};
use neon_snake::renderer;
use neon_snake::scene;
use neon_snake::settings::{JsonSettingsStore, Settings, SettingsStore};
use neon_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use neon_snake::ui::hud::HudInfo;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "neon-snake.log";

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Difficulty for this run, overriding the stored setting.
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Grid width in cells; defaults to filling the terminal.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells; defaults to filling the terminal.
    #[arg(long)]
    height: Option<u16>,

    /// Cell edge in half-block pixels when fitting the grid to the terminal.
    #[arg(long, default_value_t = 3)]
    cell_px: u16,

    /// Seed for a reproducible food sequence.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the terminal bell on game events.
    #[arg(long = "no-sound")]
    no_sound: bool,

    /// Where to write logs (filter with RUST_LOG).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Zero the high score and games played before starting.
    #[arg(long)]
    reset_stats: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Err(error) = init_logging(cli.log_file.clone()) {
        eprintln!("Logging disabled: {error}");
    }

    let mut store = JsonSettingsStore::open_default();
    let mut settings = match store.load() {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!(
                "Failed to load settings from {}: {error}; using defaults",
                store.path().display()
            );
            tracing::warn!(%error, "settings unreadable, using defaults");
            Settings::default()
        }
    };

    if cli.reset_stats {
        settings.reset_stats();
        if let Err(error) = store.save(&settings) {
            tracing::warn!(%error, "failed to save reset statistics");
        }
        tracing::info!("statistics reset");
    }

    install_panic_hook();
    run(&cli, store, settings)
}

fn run(cli: &Cli, mut store: JsonSettingsStore, mut settings: Settings) -> io::Result<()> {
    let mut terminal = TerminalSession::enter()?;

    let (surface_width, surface_height) = renderer::play_surface(terminal.area()?);
    let fitted = scene::grid_for_surface(surface_width, surface_height, cli.cell_px);
    let bounds = GridSize {
        width: cli.width.unwrap_or(fitted.width),
        height: cli.height.unwrap_or(fitted.height),
    };
    let difficulty = cli.difficulty.unwrap_or(settings.difficulty);
    let config = GameConfig::new(bounds, difficulty);

    let built = match cli.seed {
        Some(seed) => GameSession::new_with_seed(config, seed),
        None => GameSession::new(config),
    };
    let session = built.map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    tracing::info!(
        width = bounds.width,
        height = bounds.height,
        %difficulty,
        "starting session"
    );

    let mut driver = GameDriver::spawn(session);
    let mut input = InputHandler::new(TERMINAL_SWIPE_THRESHOLD);
    let mut feedback = Feedback::from_settings(&settings);
    if cli.no_sound {
        feedback.mute();
    }

    // Best score before the current game; the game-over overlay compares
    // against it.
    let mut reference_high_score = settings.high_score;
    let clock = Instant::now();

    loop {
        let frame_started = Instant::now();
        let snapshot = driver.snapshot();
        let info = HudInfo {
            high_score: reference_high_score,
            games_played: settings.games_played,
            difficulty,
            theme: &THEME_NEON,
        };
        let clock_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);

        terminal.present(|frame| renderer::render(frame, &snapshot, &info, clock_ms));

        for event in driver.drain_events() {
            handle_event(event, &feedback, &mut settings, &mut store);
        }

        let timeout = FRAME_INTERVAL.saturating_sub(frame_started.elapsed());
        if let Some(game_input) = input.poll_input(timeout)? {
            if game_input == GameInput::Quit {
                break;
            }

            if driver.with_session(|session| apply_input(session, game_input)) {
                reference_high_score = settings.high_score;
            }
        }
    }

    // The simulation thread must be gone before the surface is released.
    driver.stop();
    drop(terminal);
    Ok(())
}

/// Applies one input to the session. Returns true when it restarted.
fn apply_input(session: &mut GameSession, input: GameInput) -> bool {
    match input {
        GameInput::Direction(direction) => session.submit_direction(direction),
        GameInput::Pause => session.toggle_pause(),
        GameInput::Confirm => match session.status() {
            SessionStatus::Idle | SessionStatus::Paused => session.start(),
            SessionStatus::GameOver => {
                session.restart();
                return true;
            }
            SessionStatus::Running => {}
        },
        GameInput::Restart => {
            session.restart();
            return true;
        }
        GameInput::Quit => {}
    }
    false
}

fn handle_event(
    event: GameEvent,
    feedback: &Feedback,
    settings: &mut Settings,
    store: &mut impl SettingsStore,
) {
    for effect in feedback.respond(&event) {
        match effect {
            Effect::Sound { clip, volume } => {
                tracing::trace!(?clip, volume, "sound cue");
                ring_bell();
            }
            Effect::Vibrate { pattern, intensity } => {
                tracing::debug!(?pattern, intensity, "no haptics on a terminal");
            }
        }
    }

    match event {
        GameEvent::ScoreUpdated { score, level } => {
            tracing::debug!(score, level, "score updated");
        }
        GameEvent::GameOver {
            final_score,
            reason,
        } => {
            if settings.record_game(final_score) {
                tracing::info!(final_score, "new high score");
            }
            tracing::info!(final_score, ?reason, games = settings.games_played, "game finished");

            if let Err(error) = store.save(settings) {
                tracing::warn!(%error, "failed to save settings");
            }
        }
    }
}

fn ring_bell() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(b"\x07").and_then(|()| stdout.flush());
}

fn init_logging(path: Option<PathBuf>) -> io::Result<()> {
    let path = path.unwrap_or_else(default_log_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push("neon-snake");
    base.push(LOG_FILE_NAME);
    base
}
