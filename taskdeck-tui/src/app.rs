//! Client-side state container.
//!
//! The task list only changes through [`App::apply`], driven by server
//! responses: nothing is inserted, toggled, or removed speculatively.  Every
//! user action issues one request and applies the returned representation.

use crate::api::{ApiError, TaskApi};
use crate::models::Task;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ListState;

pub enum InputMode {
    Normal,
    Insert,
    ConfirmDelete,
}

/// A state transition derived from a server response.
pub enum Action {
    /// Full list fetched; replace local state wholesale.
    Loaded(Vec<Task>),
    /// Server confirmed a creation; prepend its canonical record.
    Created(Task),
    /// Server confirmed an update; replace the matching record by id.
    Updated(Task),
    /// Server confirmed a deletion; remove by id.
    Deleted(String),
}

pub struct App {
    pub tasks: Vec<Task>,
    pub state: ListState,
    pub input_mode: InputMode,
    pub new_task_title: String,
    /// Last failure message; shown in the footer until the next keypress.
    pub error: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> App {
        App {
            tasks: Vec::new(),
            state: ListState::default(),
            input_mode: InputMode::Normal,
            new_task_title: String::new(),
            error: None,
            should_quit: false,
        }
    }

    /// Apply a server-confirmed transition to local state.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Loaded(tasks) => {
                self.tasks = tasks;
                self.state
                    .select(if self.tasks.is_empty() { None } else { Some(0) });
            }
            Action::Created(task) => {
                self.tasks.insert(0, task);
                self.state.select(Some(0));
            }
            Action::Updated(task) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    *slot = task;
                }
            }
            Action::Deleted(id) => {
                self.tasks.retain(|t| t.id != id);
                match self.state.selected() {
                    Some(_) if self.tasks.is_empty() => self.state.select(None),
                    Some(i) if i >= self.tasks.len() => {
                        self.state.select(Some(self.tasks.len() - 1))
                    }
                    _ => {}
                }
            }
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.tasks.get(i))
    }

    /// (total, completed, pending), recomputed from state on every render.
    pub fn counts(&self) -> (usize, usize, usize) {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        (total, completed, total - completed)
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

    pub async fn refresh(&mut self, api: &TaskApi) {
        match api.list_tasks().await {
            Ok(tasks) => self.apply(Action::Loaded(tasks)),
            Err(e) => self.alert(e),
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent, api: &TaskApi) {
        // Any keypress dismisses the previous alert.
        self.error = None;
        match self.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('j') | KeyCode::Down => self.next(),
                KeyCode::Char('k') | KeyCode::Up => self.previous(),
                KeyCode::Char('r') => self.refresh(api).await,
                KeyCode::Char('a') => {
                    self.new_task_title.clear();
                    self.input_mode = InputMode::Insert;
                }
                KeyCode::Char(' ') => self.toggle_selected(api).await,
                KeyCode::Char('d') => {
                    if self.selected_task().is_some() {
                        self.input_mode = InputMode::ConfirmDelete;
                    }
                }
                _ => {}
            },
            InputMode::Insert => match key.code {
                KeyCode::Enter => self.submit_new_task(api).await,
                KeyCode::Esc => {
                    self.new_task_title.clear();
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Char(c) => self.new_task_title.push(c),
                KeyCode::Backspace => {
                    self.new_task_title.pop();
                }
                _ => {}
            },
            InputMode::ConfirmDelete => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.delete_selected(api).await;
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.input_mode = InputMode::Normal;
                }
                _ => {}
            },
        }
    }

    async fn submit_new_task(&mut self, api: &TaskApi) {
        let title = self.new_task_title.trim().to_owned();
        if title.is_empty() {
            self.error = Some("task title cannot be empty".to_owned());
            return;
        }
        match api.create_task(&title).await {
            Ok(task) => {
                self.apply(Action::Created(task));
                // The draft is only cleared once the server confirmed, so a
                // failed request loses nothing typed.
                self.new_task_title.clear();
                self.input_mode = InputMode::Normal;
            }
            Err(e) => self.alert(e),
        }
    }

    async fn toggle_selected(&mut self, api: &TaskApi) {
        let Some((id, completed)) = self.selected_task().map(|t| (t.id.clone(), t.completed))
        else {
            return;
        };
        match api.set_completed(&id, !completed).await {
            Ok(task) => self.apply(Action::Updated(task)),
            Err(e) => self.alert(e),
        }
    }

    async fn delete_selected(&mut self, api: &TaskApi) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else {
            return;
        };
        match api.delete_task(&id).await {
            Ok(()) => self.apply(Action::Deleted(id)),
            Err(e) => self.alert(e),
        }
    }

    fn alert(&mut self, err: ApiError) {
        self.error = Some(err.to_string());
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    fn task(id: &str, title: &str, completed: bool) -> Task {
        Task {
            id: id.to_owned(),
            title: title.to_owned(),
            completed,
            created_at: "2026-01-01T00:00:00+00:00".to_owned(),
            updated_at: "2026-01-01T00:00:00+00:00".to_owned(),
        }
    }

    #[test]
    fn loaded_replaces_state_and_selects_first() {
        let mut app = App::new();
        app.apply(Action::Loaded(vec![task("1", "a", false), task("2", "b", true)]));
        assert_eq!(app.tasks.len(), 2);
        assert_eq!(app.state.selected(), Some(0));

        app.apply(Action::Loaded(vec![]));
        assert!(app.tasks.is_empty());
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn created_prepends() {
        let mut app = App::new();
        app.apply(Action::Loaded(vec![task("1", "old", false)]));
        app.apply(Action::Created(task("2", "new", false)));
        assert_eq!(app.tasks[0].id, "2");
        assert_eq!(app.tasks[1].id, "1");
    }

    #[test]
    fn updated_replaces_only_matching_task() {
        let mut app = App::new();
        app.apply(Action::Loaded(vec![task("1", "a", false), task("2", "b", false)]));
        app.apply(Action::Updated(task("2", "b", true)));
        assert!(!app.tasks[0].completed);
        assert!(app.tasks[1].completed);
    }

    #[test]
    fn updated_with_unknown_id_is_a_no_op() {
        let mut app = App::new();
        app.apply(Action::Loaded(vec![task("1", "a", false)]));
        app.apply(Action::Updated(task("ghost", "x", true)));
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].id, "1");
        assert!(!app.tasks[0].completed);
    }

    #[test]
    fn deleted_removes_and_clamps_selection() {
        let mut app = App::new();
        app.apply(Action::Loaded(vec![task("1", "a", false), task("2", "b", false)]));
        app.state.select(Some(1));

        app.apply(Action::Deleted("2".to_owned()));
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.state.selected(), Some(0));

        app.apply(Action::Deleted("1".to_owned()));
        assert!(app.tasks.is_empty());
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn counts_derive_from_state() {
        let mut app = App::new();
        app.apply(Action::Loaded(vec![
            task("1", "a", true),
            task("2", "b", false),
            task("3", "c", true),
        ]));
        assert_eq!(app.counts(), (3, 2, 1));
    }

    #[test]
    fn cursor_wraps_around() {
        let mut app = App::new();
        app.apply(Action::Loaded(vec![task("1", "a", false), task("2", "b", false)]));
        app.next();
        assert_eq!(app.state.selected(), Some(1));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.previous();
        assert_eq!(app.state.selected(), Some(1));
    }
}
