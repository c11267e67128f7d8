use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{info, warn};

use rail_snake::config::{GameConfig, GridSize, THEME_DEFAULT, Topology, default_config_path};
use rail_snake::error::SetupError;
use rail_snake::input::{GameInput, InputHandler};
use rail_snake::logging::init_file_logging;
use rail_snake::renderer::{self, grid_for_terminal};
use rail_snake::session::Session;
use rail_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use rail_snake::ui::hud::HudInfo;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Map topology.
    #[arg(long, value_enum)]
    topology: Option<Topology>,

    /// Seed for food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file; defaults to the per-user config path when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Size the grid to the terminal. Without it a resize restarts at the
    /// configured size.
    #[arg(long)]
    fit: bool,

    /// Append tracing output to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_file_logging(path)?;
    }

    // Config problems are reported before the terminal switches to raw mode.
    let config = load_config(&cli).map_err(invalid_input)?;
    let session = Session::new(config).map_err(invalid_input)?;

    install_panic_hook();
    run(session, cli.fit)
}

fn load_config(cli: &Cli) -> Result<GameConfig, SetupError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::load_or_default(&default_config_path())?,
    };

    if let Some(width) = cli.width {
        config.grid.width = width;
    }
    if let Some(height) = cli.height {
        config.grid.height = height;
    }
    if let Some(topology) = cli.topology {
        config.topology = topology;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate()?;
    Ok(config)
}

fn run(mut session: Session, fit: bool) -> io::Result<()> {
    let mut terminal = TerminalSession::enter()?;
    let mut input = InputHandler::default();

    if fit {
        let size = terminal.size()?;
        resize_session(&mut session, grid_for_terminal(size.width, size.height));
    }

    loop {
        let now = Instant::now();
        let snapshot = session.snapshot();
        terminal.terminal_mut().draw(|frame| {
            renderer::render(
                frame,
                &snapshot,
                session.map(),
                HudInfo {
                    elapsed: session.elapsed(now),
                    paused: session.is_paused(),
                    running: session.is_running(),
                    theme: &THEME_DEFAULT,
                },
            );
        })?;

        while let Some(game_input) = input.poll_input()? {
            match game_input {
                GameInput::Quit => {
                    info!(score = session.state().score, "quit");
                    return Ok(());
                }
                GameInput::Resize(columns, rows) if fit => {
                    resize_session(&mut session, grid_for_terminal(columns, rows));
                }
                other => session
                    .handle_input(other, Instant::now())
                    .map_err(invalid_input)?,
            }
        }

        let _ = session.tick_if_due(Instant::now());

        thread::sleep(FRAME_INTERVAL);
    }
}

fn resize_session(session: &mut Session, grid: GridSize) {
    if session.state().bounds() == grid {
        return;
    }

    let topology = session.config().topology;
    if let Err(error) = session.reset(grid, topology) {
        warn!(%error, "keeping previous grid after resize");
    }
}

fn invalid_input(error: SetupError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error)
}
