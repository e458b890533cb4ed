//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use shelf_core::flavor::{DONE_READING, YET_TO_READ};
use shelf_core::{AsideLink, NoticeKind};

use super::app::{ActivePane, App, FormField, InputMode};

/// Most notices shown at once, newest kept
const MAX_VISIBLE_NOTICES: usize = 4;

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    let notice_count = app.notices.active().len().min(MAX_VISIBLE_NOTICES) as u16;

    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(notice_count),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_heading(frame, app, outer_chunks[0]);

    if app.show_aside {
        let pane_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(outer_chunks[1]);
        draw_books_pane(frame, app, pane_chunks[0]);
        draw_aside_pane(frame, app, pane_chunks[1]);
    } else {
        draw_books_pane(frame, app, outer_chunks[1]);
    }

    draw_notices(frame, app, outer_chunks[2]);
    draw_status_bar(frame, app, outer_chunks[3]);

    if app.input_mode == InputMode::Form {
        draw_form_popup(frame, app);
    }

    if app.show_help {
        draw_help_overlay(frame);
    }

    if let Some(message) = &app.error_message {
        draw_error_modal(frame, message);
    }
}

fn draw_heading(frame: &mut Frame, app: &App, area: Rect) {
    let heading = Paragraph::new(Span::styled(
        app.view.heading,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(heading, area);
}

fn pane_styles(is_active: bool) -> (Style, Style) {
    let border_style = if is_active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let highlight_style = if is_active {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };
    (border_style, highlight_style)
}

/// Draw the book list (left)
fn draw_books_pane(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Books;
    let (border_style, highlight_style) = pane_styles(is_active);

    let items: Vec<ListItem> = app
        .view
        .rows
        .iter()
        .map(|row| {
            let read_style = if row.editing.is_some() {
                Style::default().fg(Color::Yellow)
            } else if row.have_read.is_read() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };

            let title = Line::from(vec![
                Span::styled(
                    row.book_name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(row.read_label(), read_style),
            ]);
            let detail = Line::from(vec![Span::styled(
                format!("{} · {} pages", row.author_name, row.pages),
                Style::default().add_modifier(Modifier::DIM),
            )]);

            ListItem::new(vec![title, detail])
        })
        .collect();

    let block = Block::default()
        .title(format!(" Books ({}) ", app.view.rows.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if items.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No books yet. Press a to add one.",
            Style::default().add_modifier(Modifier::DIM),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    let mut state = ListState::default();
    state.select(Some(app.book_index));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the aside panel (right)
fn draw_aside_pane(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Aside;
    let (border_style, highlight_style) = pane_styles(is_active);
    let aside = &app.view.aside;

    let header = |text: &str, count: usize| {
        ListItem::new(Line::from(Span::styled(
            format!("{} ({})", text, count),
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::UNDERLINED),
        )))
    };
    let link = |l: &AsideLink| ListItem::new(format!("  {}", l.title));

    let mut items = vec![header(DONE_READING, aside.done.len())];
    items.extend(aside.done.iter().map(link));
    items.push(header(YET_TO_READ, aside.yet_to_read.len()));
    items.extend(aside.yet_to_read.iter().map(link));

    let block = Block::default()
        .title(" Aside ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    // Skip the section headers when mapping the flat link index
    let mut state = ListState::default();
    if is_active && !aside.is_empty() {
        let offset = if app.aside_index < aside.done.len() { 1 } else { 2 };
        state.select(Some(app.aside_index + offset));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw stacked notices, oldest first
fn draw_notices(frame: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }

    let active = app.notices.active();
    let skip = active.len().saturating_sub(MAX_VISIBLE_NOTICES);
    let lines: Vec<Line> = active
        .iter()
        .skip(skip)
        .map(|notice| {
            let style = match notice.kind {
                NoticeKind::Info => Style::default().fg(Color::Cyan),
                NoticeKind::Error => Style::default().fg(Color::Red),
            };
            Line::from(Span::styled(format!("● {}", notice.message), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = match app.input_mode {
        InputMode::Normal => {
            "a:add  e:edit  d:del  u:undo  D:del all  b:aside  x:dismiss  ?:help  q:quit"
        }
        InputMode::Form => "Tab:next field  Enter:save  Esc:cancel",
        InputMode::Edit if app.is_dropdown_edit() => "j/k:toggle  y/n:choose  Enter:save  Esc:cancel",
        InputMode::Edit => "type Yes or No  Enter:save  Esc:cancel",
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Centered popup area of at most `width` x `height`
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

/// Draw the entry form popup
fn draw_form_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect(frame.area(), 56, 8);
    frame.render_widget(Clear, popup_area);

    let label_width = FormField::ALL
        .iter()
        .map(|f| f.label().len())
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let focused = field == app.form_field;
            let label_style = if focused {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}  ", field.label(), width = label_width),
                    label_style,
                ),
                Span::raw(app.field_value(field).to_string()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Add book ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);

    // Position cursor at the end of the focused field
    let row = FormField::ALL
        .iter()
        .position(|&f| f == app.form_field)
        .unwrap_or(0) as u16;
    let value_len = app.field_value(app.form_field).chars().count() as u16;
    let cursor_x = popup_area.x + 1 + label_width as u16 + 2 + value_len;
    let cursor_y = popup_area.y + 1 + row;
    if cursor_x < popup_area.right() && cursor_y < popup_area.bottom() {
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Draw an error modal
fn draw_error_modal(frame: &mut Frame, message: &str) {
    let popup_area = centered_rect(frame.area(), 60, 7);
    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let popup_area = centered_rect(frame.area(), 50, 22);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  h/l, ←/→    Switch panes"),
        Line::from("  Tab         Cycle panes"),
        Line::from("  Enter       Jump to book (aside)"),
        Line::from("  b           Open/close aside"),
        Line::from(""),
        Line::from("Commands:"),
        Line::from("  a           Add book"),
        Line::from("  e           Edit read status"),
        Line::from("  d           Delete book"),
        Line::from("  u           Undo delete"),
        Line::from("  D D         Delete all books"),
        Line::from("  x           Dismiss notice"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup_area);
}
