// SPDX-License-Identifier: MIT
//! Rendering for the task list screen.
//!
//! Top-to-bottom layout: header, stats panel, filter bar, card
//! list, footer with key hints, transient notice line. The create form,
//! card editor, and delete confirmation render as centered popups over the
//! list.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::task::{Task, TaskStatus};
use crate::view::StatusFilter;

use super::app::{App, LoadState, Mode};
use super::form::{FormField, TaskForm};

pub fn draw_ui(f: &mut Frame, app: &App) {
    let area = f.area();

    if let LoadState::Failed(message) = &app.load {
        draw_load_failure(f, area, message);
        return;
    }

    let counts = app.counts();
    let show_stats = counts.all > 0;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                                // header
            Constraint::Length(if show_stats { 3 } else { 0 }),   // stats
            Constraint::Length(if show_stats { 1 } else { 0 }),   // filter bar
            Constraint::Min(3),                                   // task list
            Constraint::Length(1),                                // notice
            Constraint::Length(1),                                // footer
        ])
        .split(area);

    // Header.
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                " Task Manager ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  Organize your work efficiently",
                Style::default().fg(Color::DarkGray),
            ),
        ])),
        chunks[0],
    );

    if show_stats {
        draw_stats(f, chunks[1], app);
        draw_filter_bar(f, chunks[2], app);
    }

    if app.load == LoadState::Loading && app.tasks.is_empty() {
        f.render_widget(
            Paragraph::new("Loading tasks...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
            chunks[3],
        );
    } else {
        draw_task_list(f, chunks[3], app);
    }

    draw_notice(f, chunks[4], app);
    draw_footer(f, chunks[5], app);

    // Modal popups.
    match &app.mode {
        Mode::Create(form) => draw_form_popup(f, area, "New Task", form, app),
        Mode::Edit { form, .. } => draw_form_popup(f, area, "Edit Task", form, app),
        Mode::ConfirmDelete { title, .. } => draw_confirm_popup(f, area, title, app),
        Mode::Browse => {}
    }
}

// ─── Sections ────────────────────────────────────────────────────────────────

fn draw_load_failure(f: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(Span::styled(
            "Failed to load tasks",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_owned()),
        Line::from(""),
        Line::from(Span::styled(
            "r: try again   q: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        centered_rect(60, 40, area),
    );
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    let counts = app.counts();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let stats = [
        ("Total Tasks", counts.all, Color::Cyan),
        ("Pending", counts.pending, Color::Yellow),
        ("Completed", counts.completed, Color::Green),
    ];
    for ((label, value, color), cell) in stats.into_iter().zip(cells.iter()) {
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!(" {value} "),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(label),
            ]))
            .block(Block::default().borders(Borders::ALL)),
            *cell,
        );
    }
}

fn draw_filter_bar(f: &mut Frame, area: Rect, app: &App) {
    let counts = app.counts();
    let mut spans = vec![Span::raw(" ")];
    for filter in StatusFilter::ALL {
        let label = format!(" {} ({}) ", filter.label(), filter.count(&counts));
        if filter == app.filter {
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_task_list(f: &mut Frame, area: Rect, app: &App) {
    let visible = app.visible();

    if visible.is_empty() {
        let message = if app.tasks.is_empty() {
            "No tasks yet\n\nCreate your first task with `n` to get started."
        } else {
            "Nothing matches this filter."
        };
        f.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = visible.iter().map(|t| task_card(t)).collect();
    let mut state = ListState::default();
    state.select(Some(app.selected.min(visible.len() - 1)));

    f.render_stateful_widget(
        List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().bg(Color::Rgb(40, 40, 40)))
            .highlight_symbol("▸ "),
        area,
        &mut state,
    );
}

/// One card: status glyph + title + badge, optional description, created
/// date. Completed titles render struck-through.
fn task_card(task: &Task) -> ListItem<'_> {
    let completed = task.status == TaskStatus::Completed;

    let glyph = if completed {
        Span::styled("✓ ", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ ", Style::default().fg(Color::DarkGray))
    };
    let title_style = if completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let badge = Span::styled(
        format!("[{}]", task.status.label()),
        Style::default().fg(if completed { Color::Green } else { Color::Yellow }),
    );

    let mut lines = vec![Line::from(vec![
        glyph,
        Span::styled(task.title.clone(), title_style),
        Span::raw("  "),
        badge,
    ])];
    if let Some(description) = &task.description {
        lines.push(Line::from(Span::styled(
            format!("  {description}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("  Created {}", task.created_at.format("%b %-d, %Y")),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    ListItem::new(lines)
}

fn draw_notice(f: &mut Frame, area: Rect, app: &App) {
    if let Some(notice) = app.active_notice() {
        let style = if notice.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        f.render_widget(
            Paragraph::new(Span::styled(format!(" {}", notice.text), style)),
            area,
        );
    }
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let hints = match &app.mode {
        Mode::Browse => {
            "n: new   e: edit   space: toggle   d: delete   tab/1-3: filter   r: refresh   q: quit"
        }
        Mode::Create(_) | Mode::Edit { .. } => "Enter: save   Esc: cancel",
        Mode::ConfirmDelete { .. } => "y: confirm   n: cancel",
    };
    let mut spans = vec![Span::styled(
        format!(" {hints}"),
        Style::default().fg(Color::DarkGray),
    )];
    if app.in_flight.is_some() {
        spans.push(Span::styled(
            "   working…",
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ─── Popups ──────────────────────────────────────────────────────────────────

fn draw_form_popup(f: &mut Frame, area: Rect, title: &str, form: &TaskForm, app: &App) {
    let popup = centered_rect(70, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title input
            Constraint::Length(1), // title error
            Constraint::Length(3), // description input
            Constraint::Length(1), // description error
            Constraint::Length(1), // hint
        ])
        .split(inner);

    draw_input(
        f,
        rows[0],
        "Title",
        &form.title,
        form.focus == FormField::Title,
    );
    draw_field_error(f, rows[1], form.errors.title);
    draw_input(
        f,
        rows[2],
        "Description (optional)",
        &form.description,
        form.focus == FormField::Description,
    );
    draw_field_error(f, rows[3], form.errors.description);

    let hint = if app.in_flight.is_some() {
        "Saving…"
    } else {
        "Enter: save   Tab: next field   Esc: cancel"
    };
    f.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        rows[4],
    );
}

fn draw_input(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    f.render_widget(
        Paragraph::new(value.to_owned()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(label),
        ),
        area,
    );
}

fn draw_field_error(f: &mut Frame, area: Rect, error: Option<&'static str>) {
    if let Some(message) = error {
        f.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(Color::Red))),
            area,
        );
    }
}

fn draw_confirm_popup(f: &mut Frame, area: Rect, title: &str, app: &App) {
    let popup = centered_rect(60, 30, area);
    f.render_widget(Clear, popup);

    let hint = if app.in_flight.is_some() {
        "Deleting…"
    } else {
        "y: delete   n: cancel"
    };
    let lines = vec![
        Line::from(format!("Are you sure you want to delete \"{title}\"?")),
        Line::from("This action cannot be undone."),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Delete Task")
                    .border_style(Style::default().fg(Color::Red)),
            ),
        popup,
    );
}

/// Centered sub-rect taking `percent_x` × `percent_y` of `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
