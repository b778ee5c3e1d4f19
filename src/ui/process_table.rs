use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

use crate::format::truncate_unicode;
use crate::system::process::ProcessRecord;
use crate::ui::theme::Theme;

pub const HEADERS: [&str; 7] = [
    "PID",
    "PPID",
    "Description",
    "Command Line",
    "Elevation",
    "Base Priority",
    "Username",
];

const COMMAND_WIDTH: usize = 48;

fn row_cells(record: &ProcessRecord) -> [String; 7] {
    [
        record.pid.to_string(),
        record.ppid.to_string(),
        record.name.clone(),
        truncate_unicode(&record.command_line, COMMAND_WIDTH),
        record.created_at.to_string(),
        record.priority_or_empty(),
        record.username_or_empty().to_string(),
    ]
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    rows: &[&ProcessRecord],
    state: &mut TableState,
    focused: bool,
    theme: &Theme,
) {
    let header = Row::new(HEADERS.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let body = rows.iter().map(|record| {
        Row::new(row_cells(record)).style(Style::default().fg(theme.text_primary))
    });

    let border = if focused {
        theme.focus_border
    } else {
        theme.overlay_border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" Processes ({}) ", rows.len()),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let table = Table::new(
        body,
        [
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(16),
            Constraint::Min(20),
            Constraint::Length(11),
            Constraint::Length(13),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .bg(theme.row_selected_bg)
            .fg(theme.row_selected_fg)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(table, area, state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_follow_header_order() {
        let record = ProcessRecord {
            pid: 42,
            ppid: 1,
            name: "demo".into(),
            command_line: "demo --serve".into(),
            created_at: 1_700_000_000,
            priority: Some(-2),
            username: None,
        };
        let cells = row_cells(&record);
        assert_eq!(cells[0], "42");
        assert_eq!(cells[2], "demo");
        assert_eq!(cells[4], "1700000000");
        assert_eq!(cells[5], "-2");
        assert_eq!(cells[6], "");
    }
}
