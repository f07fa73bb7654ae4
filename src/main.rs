//! Bugstack — falling-block puzzle in the terminal. Stack blocks into the target bug pattern.

mod app;
mod board;
mod game;
mod input;
mod patterns;
mod scheduler;
mod shapes;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Options derived from CLI that affect the simulation itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Seed for shape and target selection; None draws one from the OS.
    pub seed: Option<u64>,
    /// Gravity cadence; fixed for the whole session.
    pub drop_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            drop_interval_ms: scheduler::DROP_INTERVAL_MS,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path)?;
    }
    let theme = match theme::Theme::load(args.theme.as_deref(), args.palette) {
        Ok(t) => t,
        Err(e) => {
            log::warn!("theme: {e}; using defaults");
            let mut t = theme::Theme::default();
            t.apply_palette(args.palette);
            t
        }
    };
    let config = GameConfig {
        seed: args.seed,
        drop_interval_ms: args.drop_interval_ms,
    };
    log::info!("starting: {config:?}");
    let mut app = App::new(config, theme, args.frame_rate, args.no_animation);
    app.run()?;
    Ok(())
}

/// The terminal belongs to the UI, so log lines go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

/// Falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "bugstack",
    version,
    about = "Falling-block puzzle in the terminal. Stack blocks until they form the target 5x5 pattern.",
    long_about = "Bugstack is a terminal falling-block puzzle.\n\n\
        A 5x5 target pattern is shown next to the board. Stack falling blocks so that some 5x5 \
        window of the board has exactly that shape: blocks where the pattern is filled, nothing \
        where it is empty. Black void blocks count as empty. A match wipes the whole board, \
        scores 100 and picks a new target. The game ends when a new piece cannot spawn.\n\n\
        CONTROLS:\n  Left/Right (h/l)  Move    Up (k)   Rotate    Down (j)  Soft drop\n  \
        Space/Enter       Hard drop   P        Pause     R         Restart after game over\n  \
        Q / Esc           Quit"
)]
pub struct Args {
    /// Seed for the random source (same seed = same pieces and targets).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Gravity interval in milliseconds.
    #[arg(long, default_value_t = scheduler::DROP_INTERVAL_MS, value_name = "MS")]
    pub drop_interval_ms: u64,

    /// Target render frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Path to theme file (btop-style theme[key]="value"; keys kind1..kind7, void, bg, grid, main_fg, title, pattern).
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the flash when a pattern clears the board.
    #[arg(long)]
    pub no_animation: bool,

    /// Write logs to this file (filter with RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
