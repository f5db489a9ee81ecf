use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use taskboard_core::{TaskPriority, TaskStatus};

use crate::tui::app::{App, Mode};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Error line
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let filter_label = match app.filter {
        None => "all".to_string(),
        Some(status) => status.to_string(),
    };
    let header = Paragraph::new(format!("TASKBOARD — filter: {filter_label}"))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[1]);

    draw_task_table(f, app, content_chunks[0]);
    draw_detail_view(f, app, content_chunks[1]);

    if let Some(error) = &app.error {
        let error_line = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(error_line, main_chunks[2]);
    }

    let help = match app.mode {
        Mode::Normal => "j/k: navigate | a: add | e: edit | d: delete | f: filter | r: refresh | q: quit",
        Mode::AddingTitle | Mode::AddingDescription => "Enter: next/submit | Esc: cancel",
        Mode::Editing { .. } => "s: status | p: priority | Enter: save | Esc: cancel",
        Mode::ConfirmDelete => "y: delete | n: keep",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);

    match app.mode {
        Mode::AddingTitle | Mode::AddingDescription => draw_add_form(f, app, size),
        Mode::ConfirmDelete => draw_confirm_modal(f, app, size),
        _ => {}
    }
}

fn draw_task_table(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .tasks
        .iter()
        .map(|task| {
            let status_icon = match task.status {
                TaskStatus::Pending => "☐",
                TaskStatus::InProgress => "◐",
                TaskStatus::Completed => "✔",
            };

            let priority_style = match task.priority {
                TaskPriority::High => Style::default().fg(Color::Red),
                TaskPriority::Medium => Style::default().fg(Color::Yellow),
                TaskPriority::Low => Style::default().fg(Color::Green),
            };
            let pri_str = match task.priority {
                TaskPriority::High => "H",
                TaskPriority::Medium => "M",
                TaskPriority::Low => "L",
            };

            Row::new(vec![
                Span::raw(format!("{}", task.id)),
                Span::styled(status_icon, Style::default()),
                Span::styled(pri_str, priority_style),
                Span::styled(task.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),  // Id
            Constraint::Length(3),  // Status
            Constraint::Length(3),  // Priority
            Constraint::Min(10),    // Title
        ],
    )
    .header(Row::new(vec!["Id", "St", "Pr", "Task"]).style(Style::default().fg(Color::Yellow)))
    .block(
        Block::default()
            .title(" Tasks ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_detail_view(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    let Some(task) = app.selected() else {
        f.render_widget(block, area);
        return;
    };

    // In edit mode the pending values are shown instead of the stored ones
    let (status, priority, editing) = match app.mode {
        Mode::Editing { status, priority } => (status, priority, true),
        _ => (task.status, task.priority, false),
    };
    let edit_style = if editing {
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut detail_text = vec![
        Line::from(vec![
            Span::styled("Title: ", Style::default().fg(Color::Blue)),
            Span::styled(task.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Id: ", Style::default().fg(Color::DarkGray)),
            Span::raw(task.id.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::Blue)),
            Span::styled(status.to_string(), edit_style),
        ]),
        Line::from(vec![
            Span::styled("Priority: ", Style::default().fg(Color::Blue)),
            Span::styled(priority.to_string(), edit_style),
        ]),
        Line::from(vec![
            Span::styled("Created: ", Style::default().fg(Color::Blue)),
            Span::raw(task.created_at.clone()),
        ]),
        Line::from(vec![
            Span::styled("Updated: ", Style::default().fg(Color::Blue)),
            Span::raw(task.updated_at.clone()),
        ]),
        Line::from(""),
    ];

    if let Some(desc) = &task.description {
        detail_text.push(Line::from(Span::styled(
            "Description:",
            Style::default().fg(Color::Blue),
        )));
        detail_text.push(Line::from(desc.clone()));
    }

    if editing {
        detail_text.push(Line::from(""));
        detail_text.push(Line::from(Span::styled(
            "editing — Enter to save",
            Style::default().fg(Color::Magenta),
        )));
    }

    let detail = Paragraph::new(detail_text)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(detail, area);
}

fn draw_add_form(f: &mut Frame, app: &App, size: Rect) {
    let area = centered_rect(60, 6, size);
    f.render_widget(Clear, area);

    let (label, value) = match app.mode {
        Mode::AddingTitle => ("Title", app.title_input.as_str()),
        _ => ("Description (optional)", app.description_input.as_str()),
    };

    let form = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(Color::Blue)),
            Span::raw(value),
            Span::styled("█", Style::default().fg(Color::White)),
        ]),
    ])
    .block(
        Block::default()
            .title(" New task ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(form, area);
}

fn draw_confirm_modal(f: &mut Frame, app: &App, size: Rect) {
    let Some(task) = app.selected() else {
        return;
    };

    let area = centered_rect(50, 5, size);
    f.render_widget(Clear, area);

    let modal = Paragraph::new(vec![
        Line::from(format!("Delete \"{}\"?", task.title)),
        Line::from(""),
        Line::from(Span::styled(
            "y: delete   n: keep",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(" Confirm ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(modal, area);
}

/// A rect centered in `r`, `percent_x` wide and `height` rows tall.
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(height),
            Constraint::Min(1),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
