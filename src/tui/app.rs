use ratatui::widgets::TableState;

use crate::commands::render_error;
use crate::error::TaskError;
use crate::i18n::{Language, MessageKey};
use crate::lifecycle::{build_update, parse_category, parse_priority, EditField, Session};
use crate::models::{CompletedTask, Priority, SortKey, Task};
use crate::storage::Storage;

#[derive(Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ViewMode {
    Ongoing,
    Completed,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub name: String,
    pub description: String,
    pub priority: Option<Priority>,
    pub step: usize, // 0: Name, 1: Description, 2: Priority, 3: Category
}

pub struct App<'a, S> {
    session: Session<'a, S>,
    pub lang: Language,
    pub tasks: Vec<Task>,
    pub completed: Vec<CompletedTask>,
    pub state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_field: Option<EditField>,
    pub input_buffer: String,
    pub target_id: Option<u32>,
    pub add_state: AddState,
    pub sort_key: SortKey,
    /// Last result or error, shown in the footer.
    pub status_line: Option<String>,
}

impl<'a, S: Storage> App<'a, S> {
    /// Creates a new App for an authenticated session and loads its tasks.
    pub fn new(session: Session<'a, S>, lang: Language) -> App<'a, S> {
        let mut app = App {
            session,
            lang,
            tasks: Vec::new(),
            completed: Vec::new(),
            state: TableState::default(),
            view_mode: ViewMode::Ongoing,
            input_mode: InputMode::Normal,
            input_field: None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            sort_key: SortKey::Priority,
            status_line: None,
        };
        app.reload();
        app
    }

    pub fn username(&self) -> &str {
        &self.session.user().username
    }

    fn row_count(&self) -> usize {
        match self.view_mode {
            ViewMode::Ongoing => self.tasks.len(),
            ViewMode::Completed => self.completed.len(),
        }
    }

    /// Selects the next row, wrapping around.
    pub fn next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous row, wrapping around.
    pub fn previous(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn selected_task(&self) -> Option<&Task> {
        if self.view_mode != ViewMode::Ongoing {
            return None;
        }
        self.state.selected().and_then(|i| self.tasks.get(i))
    }

    /// Reloads both collections and keeps the selection in range.
    pub fn reload(&mut self) {
        self.tasks = self.session.view(self.sort_key);
        self.completed = self.session.completed();

        let len = self.row_count();
        if len == 0 {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= len {
                self.state.select(Some(len - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn cycle_sort(&mut self) {
        self.sort_key = self.sort_key.next();
        self.reload();
    }

    /// Toggles between ongoing and completed tasks.
    pub fn toggle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Ongoing => ViewMode::Completed,
            ViewMode::Completed => ViewMode::Ongoing,
        };
        self.state.select(None);
        self.reload();
    }

    /// Moves the selected task to the completed collection.
    pub fn complete_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.task_id) else {
            return;
        };
        match self.session.complete(id) {
            Ok(done) => self.status_line = Some(self.lang.format(MessageKey::TaskDeleted, &done.name)),
            Err(e) => self.report(&e),
        }
        self.reload();
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        if self.view_mode != ViewMode::Ongoing {
            return;
        }
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Initiates editing of one field of the selected task.
    pub fn start_edit(&mut self, field: EditField) {
        let Some(t) = self.selected_task() else {
            return;
        };
        let id = t.task_id;
        // Pre-fill buffer for text fields
        let prefill = match field {
            EditField::Name => t.name.clone(),
            EditField::Description => t.description.clone(),
            _ => String::new(),
        };
        self.target_id = Some(id);
        self.input_field = Some(field);
        self.input_buffer = prefill;
        self.input_mode = InputMode::Editing;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_field = None;
        self.input_buffer.clear();
    }

    /// Handles Enter based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            InputMode::Normal => {}
        }
    }

    fn handle_adding_input(&mut self) {
        let value = self.input_buffer.trim().to_string();
        match self.add_state.step {
            0 | 1 => {
                if value.is_empty() {
                    return;
                }
                if self.add_state.step == 0 {
                    self.add_state.name = value;
                } else {
                    self.add_state.description = value;
                }
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            2 => match parse_priority(&value) {
                Ok(p) => {
                    self.add_state.priority = Some(p);
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
                Err(e) => self.report(&e),
            },
            3 => {
                let category = match parse_category(&value) {
                    Ok(c) => c,
                    Err(e) => return self.report(&e),
                };
                let priority = self.add_state.priority.unwrap_or(Priority::Low);
                match self.session.add(&self.add_state.name, &self.add_state.description, priority, category) {
                    Ok(task) => self.status_line = Some(self.lang.format(MessageKey::TaskAdded, task.task_id)),
                    Err(e) => self.report(&e),
                }
                self.cancel_input();
                self.reload();
            }
            _ => {}
        }
    }

    fn handle_editing_input(&mut self) {
        let (Some(id), Some(field)) = (self.target_id, self.input_field) else {
            self.cancel_input();
            return;
        };
        let update = match build_update(field, &self.input_buffer) {
            Ok(u) => u,
            Err(e) => return self.report(&e),
        };
        match self.session.edit(id, update) {
            Ok(task) => self.status_line = Some(self.lang.format(MessageKey::TaskUpdated, task.task_id)),
            Err(e) => self.report(&e),
        }
        self.cancel_input();
        self.reload();
    }

    fn report(&mut self, err: &TaskError) {
        tracing::debug!(error = %err, "tui operation failed");
        self.status_line = Some(render_error(self.lang, err));
    }
}
