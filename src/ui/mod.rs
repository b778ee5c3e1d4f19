pub mod header;
pub mod help;
pub mod process_table;
pub mod statusbar;
pub mod theme;
pub mod viewport;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, Focus};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    let output_dir = app.output_dir();
    let visible_names = app.visible_names();
    let info = header::HeaderInfo {
        process_count: app.records.len(),
        name_count: visible_names.len(),
        selected_name: visible_names.get(app.name_index).copied(),
        name_position: if visible_names.is_empty() {
            0
        } else {
            app.name_index + 1
        },
        output_dir: &output_dir,
    };
    header::render(frame, chunks[0], &info, &app.theme);

    app.table_area = Some(body[0]);
    let rows = app.visible_rows();
    let mut table_state = app.table_state.clone();
    process_table::render(
        frame,
        body[0],
        &rows,
        &mut table_state,
        app.focus == Focus::Table,
        &app.theme,
    );
    app.table_state = table_state;

    viewport::render(
        frame,
        body[1],
        &app.view,
        &app.viewport,
        app.focus == Focus::Viewport,
        &app.theme,
    );

    statusbar::render(
        frame,
        chunks[2],
        app.input_mode,
        &app.filter_text,
        app.status.as_ref(),
        app.focus,
        &app.theme,
    );

    // Help overlay, rendered last to appear on top
    if app.show_help() {
        let config = app.config_label();
        let footer = help::HelpFooter {
            config: &config,
            output_dir: &output_dir,
        };
        help::render(
            frame,
            frame.area(),
            &app.help_sections(),
            app.focus,
            &footer,
            &app.theme,
        );
    }
}
