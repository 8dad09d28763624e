use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::app::{App, TickTimer};
use grid_snake::config::{Settings, SettingsOverrides, default_config_path, write_settings};
use grid_snake::error::{AppError, ConfigError};
use grid_snake::game::GameState;
use grid_snake::input::InputHandler;
use grid_snake::logging;
use grid_snake::renderer;
use grid_snake::terminal_runtime::{AppTerminal, TerminalSession};
use grid_snake::ui::hud::HudInfo;
use tracing::info;

/// How long to wait for input while the tick timer is stopped.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(version, about = "Minimal grid-based terminal Snake")]
struct Cli {
    /// Board height in cells.
    #[arg(long)]
    rows: Option<u16>,

    /// Board width in cells.
    #[arg(long)]
    cols: Option<u16>,

    /// Milliseconds between ticks.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Seed for reproducible food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file; defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file; defaults to the platform data directory.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Write the effective settings to the config file and exit.
    #[arg(long = "save-config")]
    save_config: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("grid-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let settings = resolve_settings(&cli)?;

    if cli.save_config {
        let path = cli.config.clone().or_else(default_config_path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no platform config directory")
        })?;
        write_settings(&path, &settings)?;
        println!("Wrote settings to {}", path.display());
        return Ok(());
    }

    logging::init(&settings.log_path())?;
    info!(?settings, "settings resolved");

    let bounds = settings.grid_size();
    let state = match settings.seed {
        Some(seed) => GameState::new_with_seed(bounds, seed)?,
        None => GameState::new(bounds)?,
    };
    let timer = TickTimer::new(settings.tick_interval(), Instant::now());
    let hud_info = HudInfo {
        tick_interval: settings.tick_interval(),
    };

    let mut session = TerminalSession::enter()?;
    run_loop(session.terminal_mut(), App::new(state, timer), hud_info)?;

    info!("exiting");
    Ok(())
}

fn resolve_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply_overrides(SettingsOverrides {
        rows: cli.rows,
        cols: cli.cols,
        tick_interval_ms: cli.tick_ms,
        seed: cli.seed,
        log_file: cli.log_file.clone(),
    });

    settings.validate()?;
    Ok(settings)
}

fn run_loop(terminal: &mut AppTerminal, mut app: App, hud_info: HudInfo) -> Result<(), AppError> {
    let mut input = InputHandler::new();

    loop {
        if app.take_redraw() {
            terminal.draw(|frame| renderer::render(frame, app.state(), &hud_info))?;
        }

        let timeout = app
            .timer()
            .time_until_due(Instant::now())
            .unwrap_or(IDLE_POLL_INTERVAL);

        if let Some(game_input) = input.poll_input(timeout)? {
            if app.handle_input(game_input, Instant::now())?.is_break() {
                break;
            }
        }

        app.on_timer(Instant::now());
    }

    Ok(())
}
