//! App: terminal init, main loop, frame timing and key handling.

use crate::GameConfig;
use crate::game::GameState;
use crate::input::{Action, key_to_action};
use crate::scheduler::FrameClock;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

pub struct App {
    config: GameConfig,
    theme: Theme,
    state: GameState,
    frame_interval: Duration,
    no_animation: bool,
    /// Board flash after a pattern match.
    flash: Option<Effect>,
    /// Match count at the last frame; an increase starts the flash.
    seen_matches: u32,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme, frame_rate: f64, no_animation: bool) -> Self {
        let state = GameState::new(&config);
        let frame_rate = if frame_rate.is_finite() && frame_rate > 0.0 {
            frame_rate
        } else {
            60.0
        };
        Self {
            config,
            theme,
            state,
            frame_interval: Duration::from_secs_f64(1.0 / frame_rate),
            no_animation,
            flash: None,
            seen_matches: 0,
        }
    }

    /// Throws the session away and starts a fresh one with the same config.
    fn reset_game(&mut self) {
        log::info!("restart; previous score {}", self.state.score());
        self.state = GameState::new(&self.config);
        self.flash = None;
        self.seen_matches = 0;
    }

    /// Returns false when the app should exit.
    fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Restart if self.state.is_game_over() => self.reset_game(),
            Action::Game(cmd) => self.state.apply(cmd),
            Action::Restart | Action::None => {}
        }
        true
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = terminal.show_cursor();
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut clock = FrameClock::new();
        loop {
            let frame_start = Instant::now();
            let delta_ms = clock.delta_ms();
            self.state.advance(delta_ms);

            if self.state.matches() != self.seen_matches {
                self.seen_matches = self.state.matches();
                if !self.no_animation {
                    self.flash = Some(crate::ui::clear_flash(&self.theme));
                }
            }

            let flash_delta = delta_ms.min(u64::from(u32::MAX)) as u32;
            terminal.draw(|f| {
                crate::ui::draw(f, &self.state, &self.theme, &mut self.flash, flash_delta);
            })?;
            if self.flash.as_ref().is_some_and(Effect::done) {
                self.flash = None;
            }

            let timeout = self.frame_interval.saturating_sub(frame_start.elapsed());
            if event::poll(timeout)? {
                // Drain everything that queued up; each command runs to completion before the next.
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if !self.handle_action(key_to_action(key)) {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
