// SPDX-License-Identifier: MIT
//! Full-screen terminal UI — the single task list page.
//!
//! One 50 ms poll loop owns the terminal: key presses go into the
//! [`app::App`] state machine, the [`app::Dispatch`] values that come out
//! run as spawned store calls, and their results come back over an mpsc
//! channel. The loop never blocks on the network, so the interface stays
//! responsive while a fetch or mutation is in flight; a result whose UI
//! state has moved on only produces a stale notice, never a cache write.

pub mod app;
pub mod draw;
pub mod form;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::store::TaskStore;

use app::{App, Dispatch, OpKind, UiEvent};
use draw::draw_ui;

pub struct TaskUi {
    store: Arc<TaskStore>,
}

impl TaskUi {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }

    /// Start the interactive loop, restoring the terminal on the way out.
    pub async fn run(self) -> Result<()> {
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("create terminal")?;

        let result = self.event_loop(&mut terminal).await;

        // Restore terminal regardless of result.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<UiEvent>();
        let mut invalidations = self.store.subscribe();
        let mut app = App::new();

        // Initial load.
        self.execute(Dispatch::Load, &tx);

        loop {
            terminal.draw(|f| draw_ui(f, &app))?;
            if app.should_quit {
                break;
            }

            // Poll for terminal events (non-blocking, 50ms timeout).
            if event::poll(std::time::Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if let Some(dispatch) = app.handle_key(key) {
                        self.execute(dispatch, &tx);
                    }
                }
            }

            // Drain async results.
            while let Ok(event) = rx.try_recv() {
                if let Some(dispatch) = app.handle_event(event) {
                    self.execute(dispatch, &tx);
                }
            }

            // Cache invalidated (by our own mutation) — schedule a re-read.
            if invalidations.has_changed().unwrap_or(false) {
                invalidations.borrow_and_update();
                if let Some(dispatch) = app.handle_event(UiEvent::Invalidated) {
                    self.execute(dispatch, &tx);
                }
            }
        }

        Ok(())
    }

    /// Run one store call on a spawned task and report the outcome back to
    /// the loop. Each mutation's error reaches exactly this initiating
    /// channel — nothing else observes it.
    fn execute(&self, dispatch: Dispatch, tx: &mpsc::UnboundedSender<UiEvent>) {
        let store = self.store.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let event = match dispatch {
                Dispatch::Load => {
                    UiEvent::Loaded(store.refresh().await.map_err(|e| e.to_string()))
                }
                Dispatch::Create(input) => UiEvent::MutationDone {
                    op: OpKind::Create,
                    result: store.create(input).await.map(|_| ()).map_err(|e| e.to_string()),
                },
                Dispatch::Update { id, input } => UiEvent::MutationDone {
                    op: OpKind::Update,
                    result: store
                        .update(&id, input)
                        .await
                        .map(|_| ())
                        .map_err(|e| e.to_string()),
                },
                Dispatch::Delete { id } => UiEvent::MutationDone {
                    op: OpKind::Delete,
                    result: store.delete(&id).await.map_err(|e| e.to_string()),
                },
            };
            // Receiver gone means the UI already shut down.
            let _ = tx.send(event);
        });
    }
}
