// SPDX-License-Identifier: MIT
//! Task form state — shared by the create form and the per-card editor.

use crossterm::event::KeyCode;

use crate::task::Task;
use crate::validate::{self, FieldErrors, ValidInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
}

/// Text buffers + inline errors for the title/description form.
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub focus: FormField,
    pub errors: FieldErrors,
}

impl TaskForm {
    /// Editor pre-filled with a card's last-known values.
    pub fn for_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Validate the buffers; on failure the field errors stick for inline
    /// rendering and the caller must not dispatch.
    pub fn submit(&mut self) -> Option<ValidInput> {
        match validate::validate(&self.title, &self.description) {
            Ok(input) => {
                self.errors = FieldErrors::default();
                Some(input)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    /// Route a key into the focused buffer. Returns true if consumed.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = match self.focus {
                    FormField::Title => FormField::Description,
                    FormField::Description => FormField::Title,
                };
                true
            }
            KeyCode::Up => {
                self.focus = FormField::Title;
                true
            }
            KeyCode::Backspace => {
                self.buffer_mut().pop();
                true
            }
            KeyCode::Char(c) => {
                self.buffer_mut().push(c);
                true
            }
            _ => false,
        }
    }

    fn buffer_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ERR_TITLE_REQUIRED;

    #[test]
    fn submit_blocks_on_empty_title_and_keeps_error() {
        let mut form = TaskForm::default();
        assert!(form.submit().is_none());
        assert_eq!(form.errors.title, Some(ERR_TITLE_REQUIRED));

        // Typing a title and resubmitting clears the error.
        for c in "Write report".chars() {
            form.handle_key(KeyCode::Char(c));
        }
        let input = form.submit().expect("valid after typing title");
        assert_eq!(input.title, "Write report");
        assert!(form.errors.is_empty());
    }

    #[test]
    fn tab_moves_focus_between_fields() {
        let mut form = TaskForm::default();
        form.handle_key(KeyCode::Char('t'));
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Char('d'));
        assert_eq!(form.title, "t");
        assert_eq!(form.description, "d");
    }
}
