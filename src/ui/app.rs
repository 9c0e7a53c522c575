// SPDX-License-Identifier: MIT
//! Page state machine for the task list screen.
//!
//! Pure state + intent logic, no terminal handles — the event loop in
//! `ui::mod` feeds key presses and async results in and executes the
//! [`Dispatch`] values that come out. Keeping this free of I/O is what the
//! state-machine tests rely on.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::task::{CreateTaskInput, Task, UpdateTaskInput};
use crate::view::{StatusFilter, TaskCounts};

use super::form::TaskForm;

const NOTICE_TTL: Duration = Duration::from_secs(4);

// ─── Events in, dispatches out ───────────────────────────────────────────────

/// What kind of mutation an async result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Create,
    Update,
    Delete,
}

impl OpKind {
    pub fn success_message(self) -> &'static str {
        match self {
            OpKind::Create => "Task created successfully",
            OpKind::Update => "Task updated successfully",
            OpKind::Delete => "Task deleted successfully",
        }
    }

    pub fn failure_prefix(self) -> &'static str {
        match self {
            OpKind::Create => "Failed to create task",
            OpKind::Update => "Failed to update task",
            OpKind::Delete => "Failed to delete task",
        }
    }
}

/// Async results delivered back into the state machine.
#[derive(Debug)]
pub enum UiEvent {
    /// A list fetch resolved.
    Loaded(Result<Arc<Vec<Task>>, String>),
    /// The store invalidated its cache — re-read it.
    Invalidated,
    /// A mutation resolved.
    MutationDone {
        op: OpKind,
        result: Result<(), String>,
    },
}

/// Side effects the event loop must execute.
#[derive(Debug)]
pub enum Dispatch {
    /// Fetch the collection through the store.
    Load,
    Create(CreateTaskInput),
    Update { id: String, input: UpdateTaskInput },
    Delete { id: String },
}

// ─── Modes ───────────────────────────────────────────────────────────────────

/// Modal state of the page. Browse is the Viewing state of every card;
/// Edit is the per-card Editing state.
#[derive(Debug)]
pub enum Mode {
    Browse,
    Create(TaskForm),
    Edit { id: String, form: TaskForm },
    ConfirmDelete { id: String, title: String },
}

/// Initial-load lifecycle. After the first successful load the list stays
/// on screen through refetches; only the very first fetch gets the loading
/// and full-page failure treatments.
#[derive(Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Failed(String),
    Loaded,
}

/// A transient success/failure toast.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    expires: Instant,
}

// ─── App state ───────────────────────────────────────────────────────────────

pub struct App {
    pub tasks: Arc<Vec<Task>>,
    pub load: LoadState,
    pub filter: StatusFilter,
    pub selected: usize,
    pub mode: Mode,
    /// The one in-flight mutation; mutating controls are disabled while set.
    pub in_flight: Option<OpKind>,
    pub notice: Option<Notice>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(Vec::new()),
            load: LoadState::Loading,
            filter: StatusFilter::All,
            selected: 0,
            mode: Mode::Browse,
            in_flight: None,
            notice: None,
            should_quit: false,
        }
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts::of(&self.tasks)
    }

    /// Tasks matching the current filter, collection order preserved.
    pub fn visible(&self) -> Vec<&Task> {
        crate::view::filtered(&self.tasks, self.filter)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible().get(self.selected).copied()
    }

    /// Notice if it has not expired yet.
    pub fn active_notice(&self) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.expires > Instant::now())
    }

    fn set_notice(&mut self, text: impl Into<String>, is_error: bool) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error,
            expires: Instant::now() + NOTICE_TTL,
        });
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    // ─── Async results ──────────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: UiEvent) -> Option<Dispatch> {
        match event {
            UiEvent::Loaded(Ok(tasks)) => {
                self.tasks = tasks;
                self.load = LoadState::Loaded;
                self.clamp_selection();
                None
            }
            UiEvent::Loaded(Err(message)) => {
                if self.load == LoadState::Loaded {
                    // A refetch failed — keep the stale list, toast the error.
                    self.set_notice(format!("Failed to load tasks: {message}"), true);
                } else {
                    self.load = LoadState::Failed(message);
                }
                None
            }
            UiEvent::Invalidated => Some(Dispatch::Load),
            UiEvent::MutationDone { op, result } => {
                self.in_flight = None;
                match result {
                    Ok(()) => {
                        self.set_notice(op.success_message(), false);
                        // Leave the modal the mutation came from.
                        let close = matches!(
                            (&self.mode, op),
                            (Mode::Create(_), OpKind::Create)
                                | (Mode::Edit { .. }, OpKind::Update)
                                | (Mode::ConfirmDelete { .. }, OpKind::Delete)
                        );
                        if close {
                            self.mode = Mode::Browse;
                        }
                    }
                    Err(message) => {
                        self.set_notice(format!("{}: {message}", op.failure_prefix()), true);
                    }
                }
                None
            }
        }
    }

    // ─── Key handling ───────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Dispatch> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        // The full-page failure view only offers retry and quit.
        if let LoadState::Failed(_) = self.load {
            return match key.code {
                KeyCode::Char('r') => {
                    self.load = LoadState::Loading;
                    Some(Dispatch::Load)
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                    None
                }
                _ => None,
            };
        }

        if matches!(self.mode, Mode::Browse) {
            self.handle_browse_key(key.code)
        } else if matches!(self.mode, Mode::ConfirmDelete { .. }) {
            self.handle_confirm_key(key.code)
        } else {
            self.handle_form_key(key.code)
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> Option<Dispatch> {
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.visible().len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Tab => {
                self.filter = self.filter.cycle();
                self.clamp_selection();
                None
            }
            KeyCode::Char('1') => self.set_filter(StatusFilter::All),
            KeyCode::Char('2') => self.set_filter(StatusFilter::Pending),
            KeyCode::Char('3') => self.set_filter(StatusFilter::Completed),
            KeyCode::Char('n') => {
                self.mode = Mode::Create(TaskForm::default());
                None
            }
            KeyCode::Char('e') => {
                if self.in_flight.is_some() {
                    return None;
                }
                if let Some((id, form)) = self
                    .selected_task()
                    .map(|t| (t.id.clone(), TaskForm::for_task(t)))
                {
                    self.mode = Mode::Edit { id, form };
                }
                None
            }
            // Status toggle.
            KeyCode::Char(' ') | KeyCode::Enter => {
                if self.in_flight.is_some() {
                    return None;
                }
                let task = self.selected_task()?;
                let (id, next) = (task.id.clone(), task.status.toggle());
                self.in_flight = Some(OpKind::Update);
                Some(Dispatch::Update {
                    id,
                    input: UpdateTaskInput::status(next),
                })
            }
            KeyCode::Char('d') => {
                if self.in_flight.is_some() {
                    return None;
                }
                if let Some((id, title)) = self
                    .selected_task()
                    .map(|t| (t.id.clone(), t.title.clone()))
                {
                    self.mode = Mode::ConfirmDelete { id, title };
                }
                None
            }
            KeyCode::Char('r') => Some(Dispatch::Load),
            _ => None,
        }
    }

    fn set_filter(&mut self, filter: StatusFilter) -> Option<Dispatch> {
        self.filter = filter;
        self.clamp_selection();
        None
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Option<Dispatch> {
        match code {
            // Cancel discards local edits; the card falls back to its
            // last-known values because they were never touched.
            KeyCode::Esc => {
                if self.in_flight.is_none() {
                    self.mode = Mode::Browse;
                }
                None
            }
            KeyCode::Enter => {
                if self.in_flight.is_some() {
                    return None;
                }
                match &mut self.mode {
                    Mode::Create(form) => {
                        let input = form.submit()?;
                        self.in_flight = Some(OpKind::Create);
                        Some(Dispatch::Create(CreateTaskInput {
                            title: input.title,
                            description: input.description,
                            status: None,
                        }))
                    }
                    Mode::Edit { id, form } => {
                        let input = form.submit()?;
                        self.in_flight = Some(OpKind::Update);
                        Some(Dispatch::Update {
                            id: id.clone(),
                            input: UpdateTaskInput {
                                title: Some(input.title),
                                // Present-but-empty clears the column.
                                description: Some(input.description.unwrap_or_default()),
                                status: None,
                            },
                        })
                    }
                    _ => None,
                }
            }
            code => {
                if let Mode::Create(form) | Mode::Edit { form, .. } = &mut self.mode {
                    form.handle_key(code);
                }
                None
            }
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) -> Option<Dispatch> {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if self.in_flight.is_some() {
                    return None;
                }
                let Mode::ConfirmDelete { id, .. } = &self.mode else {
                    return None;
                };
                let id = id.clone();
                self.in_flight = Some(OpKind::Delete);
                Some(Dispatch::Delete { id })
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                if self.in_flight.is_none() {
                    self.mode = Mode::Browse;
                }
                None
            }
            _ => None,
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
