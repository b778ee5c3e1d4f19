use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::{truncate_path_left, truncate_unicode};
use crate::ui::theme::Theme;

pub struct HeaderInfo<'a> {
    pub process_count: usize,
    pub name_count: usize,
    pub selected_name: Option<&'a str>,
    /// 1-based position of the selected name among the visible names.
    pub name_position: usize,
    pub output_dir: &'a str,
}

pub fn render(frame: &mut Frame, area: Rect, info: &HeaderInfo, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_branding(frame, chunks[0], info, theme);
    render_selector(frame, chunks[1], info, theme);
}

fn render_branding(frame: &mut Frame, area: Rect, info: &HeaderInfo, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let room = (inner.width as usize).saturating_sub(40);
    let line = Line::from(vec![
        Span::styled(
            " procflow ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Procs: {}", info.process_count),
            Style::default().fg(theme.text_secondary),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Out: {}", truncate_path_left(info.output_dir, room.max(8))),
            Style::default().fg(theme.text_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_selector(frame: &mut Frame, area: Rect, info: &HeaderInfo, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Select a running process ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = match info.selected_name {
        Some(name) => {
            let room = (inner.width as usize).saturating_sub(16);
            Line::from(vec![
                Span::styled(" \u{25c0} ", Style::default().fg(theme.text_secondary)),
                Span::styled(
                    truncate_unicode(name, room),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" \u{25b6} ", Style::default().fg(theme.text_secondary)),
                Span::styled(
                    format!("{}/{}", info.name_position, info.name_count),
                    Style::default().fg(theme.text_secondary),
                ),
            ])
        }
        None => Line::from(Span::styled(
            " no matching names",
            Style::default().fg(theme.status_err),
        )),
    };
    frame.render_widget(Paragraph::new(line), inner);
}
