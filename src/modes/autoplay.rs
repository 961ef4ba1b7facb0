//! Terminal mode for watching the snake play itself
//!
//! The game advances at the configured tick rate. When the hook collects a
//! target, ticks pause while the reel-in animation plays frame by frame.
//!
//! # Controls
//!
//! - Space/P: Pause/unpause
//! - R: Restart
//! - Q/Esc/Ctrl+C: Quit

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use crate::game::{GameConfig, GameEngine, GameState, HookFrame, Snapshot};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Refresh rate of the elapsed-time clock in the header
const CLOCK_INTERVAL: Duration = Duration::from_millis(250);

/// Reel-in animation in progress
#[derive(Debug, Clone, PartialEq)]
struct HookPlayback {
    frames: Vec<HookFrame>,
    shown: usize,
}

impl HookPlayback {
    fn new(frames: Vec<HookFrame>) -> Option<Self> {
        (!frames.is_empty()).then_some(Self { frames, shown: 0 })
    }

    /// Frames played so far, current one last
    fn visible(&self) -> &[HookFrame] {
        &self.frames[..=self.shown]
    }

    /// Move to the next frame; false once the last frame has been shown
    fn advance(&mut self) -> bool {
        if self.shown + 1 < self.frames.len() {
            self.shown += 1;
            true
        } else {
            false
        }
    }
}

pub struct AutoplayMode {
    engine: GameEngine,
    state: GameState,
    snapshot: Snapshot,
    hook: Option<HookPlayback>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    paused: bool,
    should_quit: bool,
}

impl AutoplayMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let mut engine = match seed {
            Some(seed) => GameEngine::seeded(config, seed),
            None => GameEngine::new(config),
        }
        .context("Failed to create game engine")?;
        let state = engine.reset().context("Failed to start game")?;
        let snapshot = engine.snapshot(&state);

        Ok(Self {
            engine,
            state,
            snapshot,
            hook: None,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            paused: false,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal before reporting, even if the loop failed
        self.cleanup_terminal(&mut terminal)?;

        println!("{}", self.final_report());

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.engine.config().tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut hook_timer = interval(self.engine.config().hook_frame_delay());
        hook_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut clock_timer = interval(CLOCK_INTERVAL);

        loop {
            // Each branch applies a whole tick or a whole animation frame, so
            // quitting between iterations never leaves a half-applied step
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                _ = tick_timer.tick(), if self.can_tick() => {
                    self.update_game()?;
                    if self.hook.is_some() {
                        hook_timer.reset();
                    }
                }

                _ = hook_timer.tick(), if self.hook.is_some() && !self.paused => {
                    self.advance_hook();
                }

                _ = clock_timer.tick() => {
                    if self.state.is_running() && !self.paused {
                        self.metrics.update();
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            let hook = self.hook.as_ref().map(HookPlayback::visible).unwrap_or(&[]);
            terminal
                .draw(|frame| {
                    self.renderer
                        .render(frame, &self.snapshot, hook, &self.metrics, self.paused);
                })
                .context("Failed to draw frame")?;
        }

        Ok(())
    }

    fn can_tick(&self) -> bool {
        self.state.is_running() && self.hook.is_none() && !self.paused
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Quit => self.should_quit = true,
                KeyAction::TogglePause => self.paused = !self.paused,
                KeyAction::Restart => self.reset_game()?,
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn update_game(&mut self) -> Result<()> {
        let result = self
            .engine
            .step(&mut self.state)
            .context("Game step failed")?;

        if let Some(reason) = self.state.outcome() {
            self.metrics
                .on_game_over(self.state.score, self.state.radius, reason);
        }

        self.snapshot = result.snapshot;
        self.hook = HookPlayback::new(result.hook);

        Ok(())
    }

    fn advance_hook(&mut self) {
        let still_playing = self.hook.as_mut().map(HookPlayback::advance).unwrap_or(false);
        if !still_playing {
            self.hook = None;
        }
    }

    fn reset_game(&mut self) -> Result<()> {
        self.state = self.engine.reset().context("Failed to restart game")?;
        self.snapshot = self.engine.snapshot(&self.state);
        self.hook = None;
        self.paused = false;
        self.metrics.on_game_start();
        info!("game restarted");
        Ok(())
    }

    fn final_report(&self) -> String {
        if self.state.is_running() {
            format!(
                "Stopped while running. Score: {} | {}",
                self.state.score,
                self.metrics.summary()
            )
        } else {
            self.metrics.summary()
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
