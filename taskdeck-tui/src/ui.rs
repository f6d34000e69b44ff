//! Terminal layout and rendering.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_task_list(f, app, chunks[1]);
    draw_footer(f, app, chunks[2]);

    match app.input_mode {
        InputMode::Insert => draw_input_popup(f, app),
        InputMode::ConfirmDelete => draw_confirm_popup(f, app),
        InputMode::Normal => {}
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("taskdeck — a: add  Space: toggle  d: delete  r: refresh  q: quit")
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_task_list(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = if app.tasks.is_empty() {
        vec![ListItem::new("No tasks yet — press 'a' to add one")]
    } else {
        app.tasks
            .iter()
            .map(|task| {
                let marker = if task.completed { "[x] " } else { "[ ] " };
                let style = if task.completed {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(task.title.clone(), style),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::Blue))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut app.state);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(error) = &app.error {
        Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else {
        let (total, completed, pending) = app.counts();
        Line::from(format!(
            "Total: {total}  Completed: {completed}  Pending: {pending}"
        ))
    };
    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn draw_input_popup(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 3, f.area());
    let input = Paragraph::new(app.new_task_title.as_str())
        .block(Block::default().borders(Borders::ALL).title("New task (Enter: save, Esc: cancel)"));
    f.render_widget(Clear, area);
    f.render_widget(input, area);
    f.set_cursor_position((area.x + 1 + app.new_task_title.len() as u16, area.y + 1));
}

fn draw_confirm_popup(f: &mut Frame, app: &App) {
    let title = app
        .selected_task()
        .map(|t| t.title.as_str())
        .unwrap_or_default();
    let area = centered_rect(60, 3, f.area());
    let prompt = Paragraph::new(format!("Delete '{title}'? (y/n)"))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Confirm"));
    f.render_widget(Clear, area);
    f.render_widget(prompt, area);
}

/// A `height`-row rectangle horizontally centered at `percent_x` width.
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(height),
            Constraint::Min(1),
        ])
        .split(r);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
