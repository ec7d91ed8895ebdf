use std::io::{BufRead, Write};

use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::auth::CredentialStore;
use crate::error::TaskError;
use crate::i18n::{Language, MessageKey, LANGUAGE_MENU};
use crate::lifecycle::{build_update, parse_category, parse_edit_field, parse_priority, parse_sort_key, EditField, Session};
use crate::models::{Category, CompletedTask, Priority, SortKey, Status, Task, User, TIMESTAMP_FORMAT};
use crate::storage::Storage;
use crate::store::TaskStore;

/// Menu entries of the interactive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    View,
    Edit,
    Delete,
    Completed,
    Help,
    Exit,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Add,
        Action::View,
        Action::Edit,
        Action::Delete,
        Action::Completed,
        Action::Help,
        Action::Exit,
    ];

    pub fn parse(raw: &str) -> Option<Action> {
        match raw.trim().to_lowercase().as_str() {
            "add" => Some(Action::Add),
            "view" | "list" => Some(Action::View),
            "edit" => Some(Action::Edit),
            "delete" | "done" => Some(Action::Delete),
            "completed" => Some(Action::Completed),
            "help" | "?" => Some(Action::Help),
            "exit" | "quit" => Some(Action::Exit),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::View => "view",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Completed => "completed",
            Action::Help => "help",
            Action::Exit => "exit",
        }
    }

    fn description(self) -> MessageKey {
        match self {
            Action::Add => MessageKey::CmdAdd,
            Action::View => MessageKey::CmdView,
            Action::Edit => MessageKey::CmdEdit,
            Action::Delete => MessageKey::CmdDelete,
            Action::Completed => MessageKey::CmdCompleted,
            Action::Help => MessageKey::CmdHelp,
            Action::Exit => MessageKey::CmdExit,
        }
    }
}

/// Whether the menu loop keeps going after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Renders a core error through the message catalog.
pub fn render_error(lang: Language, err: &TaskError) -> String {
    match err {
        TaskError::InvalidInput(msg) => lang.format(MessageKey::InvalidInput, msg),
        TaskError::DuplicateUser(name) => lang.format(MessageKey::UsernameTaken, name),
        TaskError::UserNotFound(name) => lang.format(MessageKey::UserNotFound, name),
        TaskError::InvalidCredentials => lang.text(MessageKey::LoginFailed).to_string(),
        TaskError::TaskNotFound(id) => lang.format(MessageKey::TaskNotFound, id),
        TaskError::Persistence(e) => lang.format(MessageKey::ErrorSaving, e),
        TaskError::Hashing(e) => lang.format(MessageKey::ErrorUnexpected, e),
    }
}

/// The prompt-driven front end: authentication followed by the menu loop.
///
/// Generic over its input and output so it can be driven by scripts.
pub struct Shell<'a, R, W, S> {
    input: R,
    out: W,
    lang: Language,
    credentials: &'a CredentialStore<S>,
    tasks: &'a TaskStore<S>,
}

impl<'a, R: BufRead, W: Write, S: Storage> Shell<'a, R, W, S> {
    pub fn new(
        input: R,
        out: W,
        lang: Language,
        credentials: &'a CredentialStore<S>,
        tasks: &'a TaskStore<S>,
    ) -> Shell<'a, R, W, S> {
        Shell { input, out, lang, credentials, tasks }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn lang(&self) -> Language {
        self.lang
    }

    /// Lists every language by code and switches to the one chosen.
    ///
    /// Returns `None` when input runs out first.
    pub fn select_language(&mut self) -> Result<Option<Language>> {
        writeln!(self.out, "=== {} ===", LANGUAGE_MENU)?;
        for lang in Language::ALL {
            writeln!(self.out, "{}) {}", lang.code(), lang.native_name())?;
        }
        let codes: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
        loop {
            write!(self.out, "({}): ", codes.join("/"))?;
            let Some(raw) = self.read_line_raw()? else {
                return Ok(None);
            };
            if let Some(lang) = Language::from_code(&raw) {
                self.lang = lang;
                tracing::debug!(language = lang.code(), "language selected");
                return Ok(Some(lang));
            }
            writeln!(self.out, "Invalid choice. / Opción inválida.")?;
        }
    }

    /// Shows the welcome banner and asks whether to go on.
    ///
    /// End of input counts as no.
    pub fn confirm_start(&mut self) -> Result<bool> {
        self.say(MessageKey::WelcomeTitle)?;
        self.say(MessageKey::WelcomeMessage)?;
        loop {
            let Some(answer) = self.read_line(MessageKey::ConfirmStart)? else {
                return Ok(false);
            };
            match answer.to_lowercase().as_str() {
                "y" | "yes" | "s" | "si" | "sí" | "j" | "ja" | "是" | "d" | "da" => return Ok(true),
                "n" | "no" | "nei" | "否" | "nu" => {
                    self.say(MessageKey::Goodbye)?;
                    return Ok(false);
                }
                _ => self.say(MessageKey::InvalidYesNo)?,
            }
        }
    }

    /// Asks for login or registration until one succeeds.
    ///
    /// Returns `None` when input runs out first.
    pub fn authenticate(&mut self) -> Result<Option<User>> {
        loop {
            let Some(choice) = self.read_line(MessageKey::AuthChoice)? else {
                return Ok(None);
            };
            let register = match choice.to_lowercase().as_str() {
                "r" | "register" | "new" | "create" => true,
                "l" | "login" | "existing" | "old" => false,
                _ => {
                    self.say(MessageKey::AuthInvalidChoice)?;
                    continue;
                }
            };
            let Some(username) = self.read_line(MessageKey::PromptUsername)? else {
                return Ok(None);
            };
            let Some(password) = self.read_line(MessageKey::PromptPassword)? else {
                return Ok(None);
            };

            let result = if register {
                self.credentials.register(&username, &password)
            } else {
                self.credentials.authenticate(&username, &password)
            };
            match result {
                Ok(user) => {
                    let key = if register { MessageKey::RegisterSuccess } else { MessageKey::LoginSuccess };
                    let msg = self.lang.format(key, &user.username);
                    writeln!(self.out, "{}", msg)?;
                    return Ok(Some(user));
                }
                Err(e) => {
                    let msg = render_error(self.lang, &e);
                    writeln!(self.out, "{}", msg)?;
                }
            }
        }
    }

    /// Runs the menu loop for `user` until `exit` or end of input.
    ///
    /// Operation errors are reported and the loop continues.
    pub fn run(&mut self, user: User) -> Result<()> {
        let session = Session::new(user, self.tasks);
        self.say(MessageKey::HelpHint)?;
        loop {
            let Some(raw) = self.read_line(MessageKey::PromptAction)? else {
                return Ok(());
            };
            let Some(action) = Action::parse(&raw) else {
                self.say(MessageKey::InvalidAction)?;
                continue;
            };
            let outcome = match action {
                Action::Add => self.cmd_add(&session),
                Action::View => self.cmd_view(&session),
                Action::Edit => self.cmd_edit(&session),
                Action::Delete => self.cmd_delete(&session),
                Action::Completed => self.cmd_completed(&session),
                Action::Help => self.cmd_help(),
                Action::Exit => {
                    self.say(MessageKey::Goodbye)?;
                    Ok(Flow::Quit)
                }
            };
            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(e) => match e.downcast_ref::<TaskError>() {
                    Some(task_err) => {
                        tracing::debug!(action = action.name(), error = %task_err, "command failed");
                        let msg = render_error(self.lang, task_err);
                        writeln!(self.out, "{}", msg)?;
                    }
                    None => return Err(e),
                },
            }
        }
    }

    fn cmd_add(&mut self, session: &Session<'_, S>) -> Result<Flow> {
        let Some(name) = self.read_text(MessageKey::PromptTaskName)? else {
            return Ok(Flow::Quit);
        };
        let Some(description) = self.read_text(MessageKey::PromptTaskDescription)? else {
            return Ok(Flow::Quit);
        };
        let labels: Vec<&str> = Priority::ALL.iter().map(|p| p.as_str()).collect();
        let Some(priority) = self.choose(MessageKey::SelectPriority, &labels, parse_priority)? else {
            return Ok(Flow::Quit);
        };
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        let Some(category) = self.choose(MessageKey::SelectCategory, &labels, parse_category)? else {
            return Ok(Flow::Quit);
        };

        let task = session.add(&name, &description, priority, category)?;
        let msg = self.lang.format(MessageKey::TaskAdded, task.task_id);
        writeln!(self.out, "{}", msg)?;
        Ok(Flow::Continue)
    }

    fn cmd_view(&mut self, session: &Session<'_, S>) -> Result<Flow> {
        if session.tasks().is_empty() {
            self.say(MessageKey::NoTasks)?;
            return Ok(Flow::Continue);
        }
        let labels: Vec<&str> = SortKey::ALL.iter().map(|k| self.lang.sort_label(*k)).collect();
        let Some(key) = self.choose(MessageKey::SelectSortKey, &labels, parse_sort_key)? else {
            return Ok(Flow::Quit);
        };
        let tasks = session.view(key);
        writeln!(self.out, "{}, {}:", self.lang.text(MessageKey::AvailableTasks), session.user().username)?;
        writeln!(self.out, "{}", task_table(self.lang, &tasks))?;
        Ok(Flow::Continue)
    }

    fn cmd_edit(&mut self, session: &Session<'_, S>) -> Result<Flow> {
        let tasks = session.tasks();
        if tasks.is_empty() {
            self.say(MessageKey::NoTasks)?;
            return Ok(Flow::Continue);
        }
        writeln!(self.out, "{}", task_table(self.lang, &tasks))?;
        let Some(task_id) = self.read_task_id(tasks.len())? else {
            return Ok(Flow::Quit);
        };
        // Fail before asking for a value if the id is unknown.
        if !tasks.iter().any(|t| t.task_id == task_id) {
            return Err(TaskError::TaskNotFound(task_id).into());
        }

        let labels: Vec<&str> = EditField::ALL.iter().map(|f| self.lang.field_label(*f)).collect();
        let Some(field) = self.choose(MessageKey::SelectEditField, &labels, parse_edit_field)? else {
            return Ok(Flow::Quit);
        };

        let update = loop {
            let raw = match field {
                EditField::Name => self.read_line(MessageKey::EnterNewName)?,
                EditField::Description => self.read_line(MessageKey::EnterNewDescription)?,
                EditField::Status => self.read_choice(MessageKey::SelectStatus, &status_labels())?,
                EditField::Priority => {
                    let labels: Vec<&str> = Priority::ALL.iter().map(|p| p.as_str()).collect();
                    self.read_choice(MessageKey::SelectPriority, &labels)?
                }
                EditField::Category => {
                    let labels: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
                    self.read_choice(MessageKey::SelectCategory, &labels)?
                }
            };
            let Some(raw) = raw else {
                return Ok(Flow::Quit);
            };
            match build_update(field, &raw) {
                Ok(update) => break update,
                Err(e) => {
                    let msg = render_error(self.lang, &e);
                    writeln!(self.out, "{}", msg)?;
                }
            }
        };

        let task = session.edit(task_id, update)?;
        let msg = self.lang.format(MessageKey::TaskUpdated, task.task_id);
        writeln!(self.out, "{}", msg)?;
        Ok(Flow::Continue)
    }

    fn cmd_delete(&mut self, session: &Session<'_, S>) -> Result<Flow> {
        let tasks = session.tasks();
        if tasks.is_empty() {
            self.say(MessageKey::NoTasks)?;
            return Ok(Flow::Continue);
        }
        writeln!(self.out, "{}", task_table(self.lang, &tasks))?;
        let Some(task_id) = self.read_task_id(tasks.len())? else {
            return Ok(Flow::Quit);
        };
        let completed = session.complete(task_id)?;
        let msg = self.lang.format(MessageKey::TaskDeleted, &completed.name);
        writeln!(self.out, "{}", msg)?;
        Ok(Flow::Continue)
    }

    fn cmd_completed(&mut self, session: &Session<'_, S>) -> Result<Flow> {
        let completed = session.completed();
        if completed.is_empty() {
            self.say(MessageKey::NoCompletedTasks)?;
            return Ok(Flow::Continue);
        }
        writeln!(self.out, "{}:", self.lang.text(MessageKey::CompletedTasks))?;
        writeln!(self.out, "{}", completed_table(self.lang, &completed))?;
        Ok(Flow::Continue)
    }

    fn cmd_help(&mut self) -> Result<Flow> {
        self.say(MessageKey::AvailableCommands)?;
        for action in Action::ALL {
            writeln!(self.out, "  {:<10} - {}", action.name(), self.lang.text(action.description()))?;
        }
        Ok(Flow::Continue)
    }

    /// Prints `prompt` and reads one trimmed line; `None` at end of input.
    fn read_line(&mut self, prompt: MessageKey) -> Result<Option<String>> {
        write!(self.out, "{}", self.lang.text(prompt))?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Reads until a non-empty line is entered.
    fn read_text(&mut self, prompt: MessageKey) -> Result<Option<String>> {
        loop {
            match self.read_line(prompt)? {
                Some(s) if s.is_empty() => {
                    let msg = render_error(self.lang, &TaskError::InvalidInput("input cannot be empty".into()));
                    writeln!(self.out, "{}", msg)?;
                }
                other => return Ok(other),
            }
        }
    }

    /// Lists numbered `labels` under `title` and reads the raw selection.
    fn read_choice(&mut self, title: MessageKey, labels: &[&str]) -> Result<Option<String>> {
        self.say(title)?;
        for (i, label) in labels.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, label)?;
        }
        let prompt = self.lang.format(MessageKey::EnterChoice, labels.len());
        write!(self.out, "{}", prompt)?;
        self.read_line_raw()
    }

    /// Repeats `read_choice` until `parse` accepts the selection.
    fn choose<T>(
        &mut self,
        title: MessageKey,
        labels: &[&str],
        parse: impl Fn(&str) -> crate::error::Result<T>,
    ) -> Result<Option<T>> {
        loop {
            let Some(raw) = self.read_choice(title, labels)? else {
                return Ok(None);
            };
            match parse(&raw) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => {
                    let msg = render_error(self.lang, &e);
                    writeln!(self.out, "{}", msg)?;
                }
            }
        }
    }

    fn read_task_id(&mut self, max: usize) -> Result<Option<u32>> {
        loop {
            let prompt = self.lang.format(MessageKey::EnterTaskId, max);
            write!(self.out, "{}", prompt)?;
            let Some(raw) = self.read_line_raw()? else {
                return Ok(None);
            };
            match raw.parse::<u32>() {
                Ok(id) if id >= 1 => return Ok(Some(id)),
                _ => {
                    let err = TaskError::InvalidInput(format!("'{}' is not a valid task id", raw));
                    let msg = render_error(self.lang, &err);
                    writeln!(self.out, "{}", msg)?;
                }
            }
        }
    }

    fn read_line_raw(&mut self) -> Result<Option<String>> {
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, key: MessageKey) -> Result<()> {
        writeln!(self.out, "{}", self.lang.text(key))?;
        Ok(())
    }
}

fn status_labels() -> Vec<&'static str> {
    Status::ALL.iter().map(|s| s.as_str()).collect()
}

fn priority_color(priority: Option<Priority>) -> Color {
    match priority {
        Some(Priority::Urgent) => Color::Red,
        Some(Priority::High) => Color::Yellow,
        Some(Priority::Medium) => Color::Cyan,
        Some(Priority::Low) => Color::Green,
        None => Color::Grey,
    }
}

fn header(lang: Language, keys: &[MessageKey]) -> Vec<Cell> {
    keys.iter()
        .map(|k| Cell::new(lang.text(*k)).add_attribute(Attribute::Bold))
        .collect()
}

/// Formats ongoing tasks as a table.
pub fn task_table(lang: Language, tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(
            lang,
            &[
                MessageKey::FieldId,
                MessageKey::FieldName,
                MessageKey::FieldDescription,
                MessageKey::FieldPriority,
                MessageKey::FieldCategory,
                MessageKey::FieldStatus,
                MessageKey::FieldCreated,
                MessageKey::FieldDue,
            ],
        ));

    let not_set = lang.text(MessageKey::NotSet);
    for t in tasks {
        table.add_row(vec![
            Cell::new(t.task_id),
            Cell::new(&t.name),
            Cell::new(&t.description),
            Cell::new(t.priority.map_or(not_set, Priority::as_str)).fg(priority_color(t.priority)),
            Cell::new(t.category.map_or(not_set, Category::as_str)),
            Cell::new(t.status.as_str()),
            Cell::new(t.created_at.format(TIMESTAMP_FORMAT)),
            Cell::new(t.due_date.format(TIMESTAMP_FORMAT)),
        ]);
    }
    table
}

/// Formats completed tasks as a table.
pub fn completed_table(lang: Language, tasks: &[CompletedTask]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(
            lang,
            &[
                MessageKey::FieldId,
                MessageKey::FieldName,
                MessageKey::FieldDescription,
                MessageKey::FieldPriority,
                MessageKey::FieldCategory,
                MessageKey::FieldDue,
                MessageKey::FieldCompleted,
            ],
        ));

    let not_set = lang.text(MessageKey::NotSet);
    for t in tasks {
        table.add_row(vec![
            Cell::new(t.completed_id),
            Cell::new(&t.name),
            Cell::new(&t.description),
            Cell::new(t.priority.map_or(not_set, Priority::as_str)),
            Cell::new(t.category.map_or(not_set, Category::as_str)),
            Cell::new(t.due_date.format(TIMESTAMP_FORMAT)),
            Cell::new(t.completed_at.format(TIMESTAMP_FORMAT)).fg(Color::Green),
        ]);
    }
    table
}
