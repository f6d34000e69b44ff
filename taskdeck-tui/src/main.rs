//! taskdeck-tui – terminal client entry point.
//!
//! Connects to a running taskdeck-server (`TASKDECK_URL`, default
//! `http://localhost:5000`), loads the task list, then runs the
//! draw/poll/dispatch loop until `q`.

mod api;
mod app;
mod models;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::api::TaskApi;
use crate::app::App;

#[tokio::main]
async fn main() -> io::Result<()> {
    let base_url =
        std::env::var("TASKDECK_URL").unwrap_or_else(|_| "http://localhost:5000".to_owned());
    let api = TaskApi::new(base_url);

    let mut app = App::new();
    // Initial load; a failure lands in the footer alert rather than aborting.
    app.refresh(&api).await;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &api).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    api: &TaskApi,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(200))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, api).await;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
