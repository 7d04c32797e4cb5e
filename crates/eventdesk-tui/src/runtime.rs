//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! Async work reports back through an inbox channel that the loop drains
//! every iteration.

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use eventdesk_core::api::{AdminClient, ApiResult};
use eventdesk_core::config::Config;
use eventdesk_core::session::SessionStore;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskCompleted, TaskId};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick cadence while a request is in flight (spinner animation).
pub const BUSY_TICK: Duration = Duration::from_millis(120);

/// Poll duration when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(250);

/// Full-screen console runtime.
///
/// Terminal state is restored on drop or panic.
pub struct ConsoleRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    client: ApiResult<AdminClient>,
    store: Arc<dyn SessionStore>,
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    last_tick: Instant,
}

impl ConsoleRuntime {
    /// Hydrates the session and enters the alternate screen.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(config: &Config, store: Arc<dyn SessionStore>) -> Result<Self> {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Ignoring unreadable session: {e:#}");
                None
            }
        };
        let client = AdminClient::from_config(config);
        if let Err(e) = &client {
            tracing::warn!("API client unavailable: {e}");
        }
        let state = AppState::new(config, token);

        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            client,
            store,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            let busy = self.state.is_busy();
            for event in self.collect_events()? {
                // Idle ticks change nothing visible.
                if busy || !matches!(event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let tick_interval = if self.state.is_busy() {
            BUSY_TICK
        } else {
            IDLE_POLL_DURATION
        };
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns `fut` and posts its result to the inbox.
    ///
    /// A cancelled task posts nothing.
    fn spawn_task<T, Fut>(
        &self,
        id: TaskId,
        cancel: Option<CancellationToken>,
        fut: Fut,
        into_event: fn(TaskCompleted<T>) -> UiEvent,
    ) where
        T: Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let result = match cancel {
                Some(cancel) => tokio::select! {
                    () = cancel.cancelled() => {
                        tracing::debug!(task = id.0, "task cancelled");
                        return;
                    }
                    result = fut => result,
                },
                None => fut.await,
            };
            let _ = tx.send(into_event(TaskCompleted { id, result }));
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::CancelTask { token } => {
                token.cancel();
            }
            UiEffect::SaveSession { token } => {
                if let Err(e) = self.store.save(&token) {
                    tracing::warn!("Failed to save session: {e:#}");
                }
            }
            UiEffect::ClearSession => {
                if let Err(e) = self.store.clear() {
                    tracing::warn!("Failed to clear session: {e:#}");
                }
            }
            UiEffect::Login {
                task,
                email,
                password,
            } => {
                let client = self.client.clone();
                self.spawn_task(
                    task,
                    None,
                    async move {
                        match client {
                            Ok(client) => client.login(&email, &password).await,
                            Err(e) => Err(e),
                        }
                    },
                    UiEvent::LoginCompleted,
                );
            }
            UiEffect::FetchQuizzes {
                task,
                token,
                query,
                cancel,
            } => {
                let client = self.client.clone();
                self.spawn_task(
                    task,
                    Some(cancel),
                    async move {
                        match client {
                            Ok(client) => client.list_quizzes(&token, query).await,
                            Err(e) => Err(e),
                        }
                    },
                    UiEvent::QuizzesLoaded,
                );
            }
            UiEffect::FetchEvents {
                task,
                token,
                cancel,
            } => {
                let client = self.client.clone();
                self.spawn_task(
                    task,
                    Some(cancel),
                    async move {
                        match client {
                            Ok(client) => client.list_events(&token).await,
                            Err(e) => Err(e),
                        }
                    },
                    UiEvent::EventsLoaded,
                );
            }
            UiEffect::FetchPolicies {
                task,
                token,
                cancel,
            } => {
                let client = self.client.clone();
                self.spawn_task(
                    task,
                    Some(cancel),
                    async move {
                        match client {
                            Ok(client) => client.list_reward_policies(&token).await,
                            Err(e) => Err(e),
                        }
                    },
                    UiEvent::PoliciesLoaded,
                );
            }
        }
    }
}

impl Drop for ConsoleRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
