use crate::application::{App, AppMode};
use crate::domain::{DATE_FORMAT, FormField, LoanStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_loan_table(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    match app.mode {
        AppMode::Form => render_form_popup(f, app),
        AppMode::ConfirmDelete => render_confirm_popup(f, app),
        AppMode::Help => render_help_popup(f, app.help_scroll),
        AppMode::Normal | AppMode::Export => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible_records().len();
    let header = Paragraph::new(format!(
        "loanbook - Book Loans | Filter: {} | Showing {} of {}",
        app.filter.label(),
        visible,
        app.store().len()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn status_style(status: LoanStatus) -> Style {
    match status {
        LoanStatus::Returned => Style::default().fg(Color::Green),
        LoanStatus::NotReturned => Style::default().fg(Color::Red),
    }
}

fn render_loan_table(f: &mut Frame, app: &App, area: Rect) {
    let records = app.visible_records();
    // borders plus the header row
    let visible_rows = (area.height as usize).saturating_sub(3).max(1);
    let offset = app.selected.saturating_sub(visible_rows - 1);

    let header = Row::new(["No.", "Title", "Borrower", "Borrowed", "Due back", "Status"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .height(1);

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows)
        .map(|(index, record)| {
            let row = Row::new(vec![
                Cell::from(format!("{}", index + 1)),
                Cell::from(record.title.clone()),
                Cell::from(record.student.clone()),
                Cell::from(record.borrow_date.format(DATE_FORMAT).to_string()),
                Cell::from(record.return_date.format(DATE_FORMAT).to_string()),
                Cell::from(record.status.label()).style(status_style(record.status)),
            ]);
            if index == app.selected {
                row.style(Style::default().bg(Color::Blue).fg(Color::White))
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Percentage(35),
        Constraint::Percentage(25),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(13),
    ];

    let title = if records.is_empty() {
        "Loans (empty - press 'a' to add)"
    } else {
        "Loans"
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => app.status_message.clone().unwrap_or_else(|| {
            "a: add | e/Enter: edit | d: delete | s/Space: toggle status | f: filter | Ctrl+E: export CSV | ?: help | q: quit".to_string()
        }),
        AppMode::Form => app
            .status_message
            .clone()
            .unwrap_or_else(|| "Tab/↑↓: switch field | Enter: save | Esc: cancel".to_string()),
        AppMode::ConfirmDelete => "y/Enter: delete | n/Esc: keep".to_string(),
        AppMode::Export => format!("Export CSV as: {} (Enter to export, Esc to cancel)", app.filename_input),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
    };

    let style = match app.mode {
        AppMode::Normal => Style::default(),
        AppMode::Form if app.status_message.is_some() => Style::default().fg(Color::Red),
        AppMode::Form => Style::default().fg(Color::Green),
        AppMode::ConfirmDelete => Style::default().fg(Color::Red),
        AppMode::Export => Style::default().fg(Color::Magenta),
        AppMode::Help => Style::default().fg(Color::Cyan),
    };

    let status = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);

    if app.mode == AppMode::Export {
        let prefix = "Export CSV as: ".chars().count() + app.cursor_position;
        f.set_cursor_position((area.x + 1 + prefix as u16, area.y + 1));
    }
}

/// Rectangle of `width` x `height` centred in `area`, clipped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_form_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(60, 15, f.area());
    f.render_widget(Clear, popup_area);

    let title = if app.draft.is_edit() {
        "Update loan"
    } else {
        "New loan"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(Color::White));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let field_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    for (field, area) in FormField::ALL.iter().zip(field_areas.iter()) {
        let focused = *field == app.focused_field;
        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(app.draft.field(*field)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(field.label())
                .border_style(border_style),
        );
        f.render_widget(input, *area);

        if focused {
            f.set_cursor_position((area.x + 1 + app.cursor_position as u16, area.y + 1));
        }
    }
}

fn render_confirm_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(50, 7, f.area());
    f.render_widget(Clear, popup_area);

    let mut lines = vec![Line::from("Delete this loan record?")];
    if let Some(record) = &app.pending_delete {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(record.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" - {}", record.student)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("[y] Delete   [n] Cancel"));

    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm delete")
                .style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(popup, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("loanbook Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

/// Number of lines in the help popup; the last valid scroll offset is one less.
pub fn help_line_count() -> usize {
    HELP_TEXT.lines().count()
}

const HELP_TEXT: &str = r#"LOANBOOK - BOOK LOAN TRACKER

=== TABLE ===
↑↓ or j/k       Move selection
Home/g, End/G   First / last row
a               Add a loan
e or Enter      Edit the selected loan
d or Delete     Delete the selected loan (asks for confirmation)
s or Space      Toggle Returned / Not returned
f               Cycle filter: All → Returned → Not returned
Ctrl+E          Export the visible rows to CSV
? or F1         Show this help
q               Quit

=== LOAN FORM ===
Tab / ↓         Next field
Shift+Tab / ↑   Previous field
←→ Home End     Move cursor within the field
Enter           Save
Esc             Cancel

=== RULES ===
• Title, borrower, borrow date and return date are all required
• Dates use the YYYY-MM-DD format
• Neither date may be earlier than today
• Status changes are always allowed, even for old loans
• New loans start as "Not returned"

=== STORAGE ===
Every change is written immediately to books.json in the data
directory (LOANBOOK_DATA_DIR, default ./.loanbook).
Logs go to loanbook.log (LOANBOOK_LOG_DIR, filter via LOANBOOK_LOG).
Set LOANBOOK_RESET_ON_CORRUPT=true to start empty when books.json
cannot be read; the unreadable file is kept as books.json.corrupt.

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#;
