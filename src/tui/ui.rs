use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::app::{App, InputMode, ViewMode};
use crate::i18n::MessageKey;
use crate::lifecycle::EditField;
use crate::models::{Category, Priority, Status, TIMESTAMP_FORMAT};
use crate::storage::Storage;

pub fn ui<S: Storage>(f: &mut Frame, app: &mut App<'_, S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let lang = app.lang;
    let not_set = lang.text(MessageKey::NotSet);
    let header_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let highlight = Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray);

    match app.view_mode {
        ViewMode::Ongoing => {
            let rows: Vec<Row> = app
                .tasks
                .iter()
                .map(|t| {
                    let style = match t.priority {
                        Some(Priority::Urgent) => Style::default().fg(Color::Red),
                        Some(Priority::High) => Style::default().fg(Color::Yellow),
                        _ => Style::default().fg(Color::Green),
                    };
                    Row::new(vec![
                        Cell::from(t.task_id.to_string()),
                        Cell::from(t.name.clone()),
                        Cell::from(t.description.clone()),
                        Cell::from(t.priority.map_or(not_set, Priority::as_str)),
                        Cell::from(t.category.map_or(not_set, Category::as_str)),
                        Cell::from(t.status.as_str()),
                        Cell::from(t.due_date.format(TIMESTAMP_FORMAT).to_string()),
                    ])
                    .style(style)
                })
                .collect();

            let widths = [
                Constraint::Length(4),
                Constraint::Min(16),
                Constraint::Min(20),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(12),
                Constraint::Length(20),
            ];

            let title = format!(
                "{} - {} ({})",
                lang.text(MessageKey::AvailableTasks),
                app.username(),
                lang.sort_label(app.sort_key)
            );
            let table = Table::new(rows, widths)
                .header(
                    Row::new(vec![
                        lang.text(MessageKey::FieldId),
                        lang.text(MessageKey::FieldName),
                        lang.text(MessageKey::FieldDescription),
                        lang.text(MessageKey::FieldPriority),
                        lang.text(MessageKey::FieldCategory),
                        lang.text(MessageKey::FieldStatus),
                        lang.text(MessageKey::FieldDue),
                    ])
                    .style(header_style)
                    .bottom_margin(1),
                )
                .block(Block::default().borders(Borders::ALL).title(title))
                .row_highlight_style(highlight)
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, chunks[0], &mut app.state);
        }
        ViewMode::Completed => {
            let rows: Vec<Row> = app
                .completed
                .iter()
                .map(|t| {
                    Row::new(vec![
                        Cell::from(t.completed_id.to_string()),
                        Cell::from(t.name.clone()),
                        Cell::from(t.description.clone()),
                        Cell::from(t.priority.map_or(not_set, Priority::as_str)),
                        Cell::from(t.completed_at.format(TIMESTAMP_FORMAT).to_string()),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Length(4),
                Constraint::Min(16),
                Constraint::Min(20),
                Constraint::Length(8),
                Constraint::Length(20),
            ];

            let table = Table::new(rows, widths)
                .header(
                    Row::new(vec![
                        lang.text(MessageKey::FieldId),
                        lang.text(MessageKey::FieldName),
                        lang.text(MessageKey::FieldDescription),
                        lang.text(MessageKey::FieldPriority),
                        lang.text(MessageKey::FieldCompleted),
                    ])
                    .style(header_style)
                    .bottom_margin(1),
                )
                .block(Block::default().borders(Borders::ALL).title(lang.text(MessageKey::CompletedTasks)))
                .row_highlight_style(highlight)
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, chunks[0], &mut app.state);
        }
    }

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Ongoing => {
                "q: Quit | a: Add | n: Name | e: Desc | s: Status | p: Prio | g: Category | d: Done | o: Sort | c: Completed"
            }
            ViewMode::Completed => "q: Quit | c: Ongoing tasks",
        },
        InputMode::Editing => "Enter: Save | Esc: Cancel",
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };
    let footer = match &app.status_line {
        Some(msg) => format!("{}  |  {}", msg, help_text),
        None => help_text.to_string(),
    };

    let help = Paragraph::new(footer)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    if app.input_mode == InputMode::Normal {
        return;
    }

    let area = centered_rect(70, 3, f.area());
    f.render_widget(Clear, area);

    let title = match app.input_mode {
        InputMode::Adding => match app.add_state.step {
            0 => lang.text(MessageKey::PromptTaskName).trim_end().to_string(),
            1 => lang.text(MessageKey::PromptTaskDescription).trim_end().to_string(),
            2 => numbered(lang.text(MessageKey::SelectPriority), Priority::ALL.iter().map(|p| p.as_str())),
            _ => numbered(lang.text(MessageKey::SelectCategory), Category::ALL.iter().map(|c| c.as_str())),
        },
        _ => match app.input_field {
            Some(EditField::Name) => lang.text(MessageKey::EnterNewName).trim_end().to_string(),
            Some(EditField::Description) => lang.text(MessageKey::EnterNewDescription).trim_end().to_string(),
            Some(EditField::Status) => numbered(lang.text(MessageKey::SelectStatus), Status::ALL.iter().map(|s| s.as_str())),
            Some(EditField::Priority) => {
                numbered(lang.text(MessageKey::SelectPriority), Priority::ALL.iter().map(|p| p.as_str()))
            }
            Some(EditField::Category) => {
                numbered(lang.text(MessageKey::SelectCategory), Category::ALL.iter().map(|c| c.as_str()))
            }
            None => String::new(),
        },
    };

    let input = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(input, area);
}

/// "Title 1 A 2 B ..." for a one-line popup title.
fn numbered<'a>(title: &str, labels: impl Iterator<Item = &'a str>) -> String {
    let options: Vec<String> = labels.enumerate().map(|(i, l)| format!("{} {}", i + 1, l)).collect();
    format!("{} {}", title, options.join(" | "))
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
