//! UI rendering with Ratatui.

use crate::app::{App, InputMode};
use fueldb_core::{CheckBox, Entity, FormRow, LineEdit, Repository};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Main render function.
pub fn render<E: Entity, R: Repository<E>>(frame: &mut Frame, app: &App<E, R>) {
    let area = frame.area();

    let block = Block::default()
        .title(format!(" {} ", app.dialog.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),    // Fields
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help line
        ])
        .split(inner);

    render_form(frame, app, chunks[0]);

    if let Some(ref status) = app.status {
        let status = Paragraph::new(status.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(status, chunks[1]);
    }

    let help = if app.is_read_only() {
        "Enter: delete | Esc: cancel"
    } else {
        "Enter: save | Esc: cancel | Tab/Up/Down: move | Space: toggle"
    };
    let help = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);

    if app.input_mode == InputMode::ConfirmDelete {
        render_delete_prompt(frame, app, area);
    }
}

/// Display text for one row's widget.
fn widget_text(row: &FormRow) -> String {
    let widget = row.widget.as_any();
    if let Some(line_edit) = widget.downcast_ref::<LineEdit>() {
        line_edit.text().to_string()
    } else if let Some(check_box) = widget.downcast_ref::<CheckBox>() {
        let mark = if check_box.is_checked() { "[x]" } else { "[ ]" };
        mark.to_string()
    } else {
        format!("<{}>", row.widget.kind())
    }
}

fn render_form<E: Entity, R: Repository<E>>(frame: &mut Frame, app: &App<E, R>, area: Rect) {
    let label_width = app
        .form
        .rows()
        .iter()
        .map(|row| row.label.chars().count())
        .max()
        .unwrap_or(0);

    let value_color = if app.is_read_only() {
        Color::Gray
    } else {
        Color::White
    };

    let items: Vec<ListItem> = app
        .form
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let focused = i == app.focus;
            let mut value = widget_text(row);
            if focused && !app.is_read_only() && row.widget.as_any().is::<LineEdit>() {
                value.push('_');
            }

            let style = if focused {
                Style::default()
                    .bg(Color::Rgb(60, 60, 80))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(value_color)
            };

            let line = Line::from(vec![
                Span::styled(
                    format!("{:>width$}: ", row.label, width = label_width),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(value, style),
            ]);
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items), area);
}

/// Render the yes/no deletion prompt.
fn render_delete_prompt<E: Entity, R: Repository<E>>(
    frame: &mut Frame,
    app: &App<E, R>,
    area: Rect,
) {
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 7.min(area.height.saturating_sub(2));
    let dialog_area = centered_rect(dialog_width, dialog_height, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Question ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let prompt = Paragraph::new(app.dialog.delete_prompt())
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });
    frame.render_widget(prompt, chunks[0]);

    let answer = Paragraph::new("y: yes | n: no")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(answer, chunks[1]);
}

/// Helper to create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
