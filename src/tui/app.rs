use anyhow::Result;
use ratatui::widgets::TableState;

use taskboard_client::{ClientError, TaskClient};
use taskboard_core::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};

/// Blocking facade over the async REST client; the TUI event loop is
/// synchronous, so every call is one round-trip that blocks until the
/// response resolves or fails.
pub struct ApiBridge {
    runtime: tokio::runtime::Runtime,
    client: TaskClient,
}

impl ApiBridge {
    pub fn new(api_url: &str) -> Result<Self> {
        Ok(Self {
            runtime: tokio::runtime::Runtime::new()?,
            client: TaskClient::new(api_url),
        })
    }

    fn list(&self) -> Result<Vec<Task>, ClientError> {
        self.runtime.block_on(self.client.list_tasks())
    }

    fn create(&self, new: &NewTask) -> Result<Task, ClientError> {
        self.runtime.block_on(self.client.create_task(new))
    }

    fn update(&self, id: i64, patch: &TaskPatch) -> Result<Task, ClientError> {
        self.runtime.block_on(self.client.update_task(id, patch))
    }

    fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.runtime.block_on(self.client.delete_task(id))
    }
}

#[derive(Clone, Copy)]
pub enum Mode {
    Normal,
    AddingTitle,
    AddingDescription,
    /// Inline edit of the selected task; holds the pending values until
    /// Enter commits them.
    Editing {
        status: TaskStatus,
        priority: TaskPriority,
    },
    ConfirmDelete,
}

pub struct App {
    api: ApiBridge,
    all_tasks: Vec<Task>,
    /// The filtered view the table renders.
    pub tasks: Vec<Task>,
    pub state: TableState,
    pub mode: Mode,
    pub filter: Option<TaskStatus>,
    pub title_input: String,
    pub description_input: String,
    pub error: Option<String>,
}

impl App {
    pub fn new(api_url: &str) -> Result<App> {
        let mut app = App {
            api: ApiBridge::new(api_url)?,
            all_tasks: Vec::new(),
            tasks: Vec::new(),
            state: TableState::default(),
            mode: Mode::Normal,
            filter: None,
            title_input: String::new(),
            description_input: String::new(),
            error: None,
        };
        app.refresh();
        Ok(app)
    }

    /// Re-fetch the list from the server and re-apply the filter. Called on
    /// start and after every completed mutation.
    pub fn refresh(&mut self) {
        match self.api.list() {
            Ok(tasks) => {
                self.all_tasks = tasks;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        self.tasks = filter_tasks(&self.all_tasks, self.filter);
        if self.tasks.is_empty() {
            self.state.select(None);
        } else {
            match self.state.selected() {
                Some(i) if i < self.tasks.len() => {}
                Some(_) => self.state.select(Some(self.tasks.len() - 1)),
                None => self.state.select(Some(0)),
            }
        }
    }

    pub fn selected(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.tasks.get(i))
    }

    pub fn next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= self.tasks.len() - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.tasks.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn cycle_filter(&mut self) {
        self.filter = next_filter(self.filter);
        self.apply_filter();
    }

    // ── Add form ──

    pub fn enter_add_mode(&mut self) {
        self.mode = Mode::AddingTitle;
        self.title_input.clear();
        self.description_input.clear();
        self.error = None;
    }

    /// Enter in an add field: title → description → submit. The title is
    /// validated before any request goes out.
    pub fn advance_add(&mut self) {
        match self.mode {
            Mode::AddingTitle => {
                if self.title_input.trim().is_empty() {
                    self.error = Some("Title is required".into());
                    return;
                }
                self.error = None;
                self.mode = Mode::AddingDescription;
            }
            Mode::AddingDescription => self.submit_add(),
            _ => {}
        }
    }

    fn submit_add(&mut self) {
        let description = match self.description_input.trim() {
            "" => None,
            d => Some(d.to_string()),
        };
        let new = NewTask {
            title: self.title_input.trim().to_string(),
            description,
            priority: None,
        };
        match self.api.create(&new) {
            Ok(_) => {
                self.mode = Mode::Normal;
                self.title_input.clear();
                self.description_input.clear();
                self.refresh();
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn cancel_input(&mut self) {
        self.mode = Mode::Normal;
        self.title_input.clear();
        self.description_input.clear();
        self.error = None;
    }

    pub fn input_char(&mut self, c: char) {
        match self.mode {
            Mode::AddingTitle => self.title_input.push(c),
            Mode::AddingDescription => self.description_input.push(c),
            _ => {}
        }
    }

    pub fn delete_char(&mut self) {
        match self.mode {
            Mode::AddingTitle => {
                self.title_input.pop();
            }
            Mode::AddingDescription => {
                self.description_input.pop();
            }
            _ => {}
        }
    }

    // ── Inline edit ──

    pub fn enter_edit_mode(&mut self) {
        let Some((status, priority)) = self.selected().map(|t| (t.status, t.priority)) else {
            return;
        };
        self.mode = Mode::Editing { status, priority };
        self.error = None;
    }

    pub fn cycle_edit_status(&mut self) {
        if let Mode::Editing { status, priority } = self.mode {
            self.mode = Mode::Editing {
                status: next_status(status),
                priority,
            };
        }
    }

    pub fn cycle_edit_priority(&mut self) {
        if let Mode::Editing { status, priority } = self.mode {
            self.mode = Mode::Editing {
                status,
                priority: next_priority(priority),
            };
        }
    }

    pub fn commit_edit(&mut self) {
        let Mode::Editing { status, priority } = self.mode else {
            return;
        };
        let Some(task) = self.selected() else {
            self.mode = Mode::Normal;
            return;
        };
        let patch = TaskPatch {
            status: Some(status),
            priority: Some(priority),
            ..Default::default()
        };
        match self.api.update(task.id, &patch) {
            Ok(_) => {
                self.mode = Mode::Normal;
                self.refresh();
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    // ── Delete ──

    pub fn request_delete(&mut self) {
        if self.selected().is_some() {
            self.mode = Mode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        let Some(task) = self.selected() else {
            self.mode = Mode::Normal;
            return;
        };
        match self.api.delete(task.id) {
            Ok(()) => {
                self.mode = Mode::Normal;
                self.refresh();
            }
            Err(e) => {
                self.mode = Mode::Normal;
                self.error = Some(e.to_string());
            }
        }
    }
}

fn filter_tasks(all: &[Task], filter: Option<TaskStatus>) -> Vec<Task> {
    match filter {
        None => all.to_vec(),
        Some(status) => all.iter().filter(|t| t.status == status).cloned().collect(),
    }
}

fn next_filter(filter: Option<TaskStatus>) -> Option<TaskStatus> {
    match filter {
        None => Some(TaskStatus::Pending),
        Some(TaskStatus::Pending) => Some(TaskStatus::InProgress),
        Some(TaskStatus::InProgress) => Some(TaskStatus::Completed),
        Some(TaskStatus::Completed) => None,
    }
}

fn next_status(status: TaskStatus) -> TaskStatus {
    match status {
        TaskStatus::Pending => TaskStatus::InProgress,
        TaskStatus::InProgress => TaskStatus::Completed,
        TaskStatus::Completed => TaskStatus::Pending,
    }
}

fn next_priority(priority: TaskPriority) -> TaskPriority {
    match priority {
        TaskPriority::Low => TaskPriority::Medium,
        TaskPriority::Medium => TaskPriority::High,
        TaskPriority::High => TaskPriority::Low,
    }
}
