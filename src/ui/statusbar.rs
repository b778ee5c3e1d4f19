use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{Focus, InputMode, StatusKind, StatusMessage};
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    input_mode: InputMode,
    filter_text: &str,
    status: Option<&StatusMessage>,
    focus: Focus,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // Status message takes priority
    if let Some(status) = status {
        let color = match status.kind {
            StatusKind::Ok => theme.status_ok,
            StatusKind::Error => theme.status_err,
        };
        let line = Line::from(Span::styled(
            format!(" {}", status.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let line = match input_mode {
        InputMode::Filter => {
            let mut spans = vec![
                Span::styled(
                    " / ",
                    Style::default()
                        .fg(theme.pill_key_fg)
                        .bg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {filter_text}"),
                    Style::default().fg(theme.pill_desc_fg),
                ),
                Span::styled("\u{2588}", Style::default().fg(theme.pill_key_bg)),
            ];
            spans.extend(pill_spans("Esc", "Cancel", theme));
            spans.extend(pill_spans("Enter", "Apply", theme));
            Line::from(spans)
        }
        InputMode::Normal | InputMode::Help => {
            let mut spans = Vec::new();
            if !filter_text.is_empty() {
                spans.push(Span::styled(
                    " Filter: ",
                    Style::default()
                        .fg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled(filter_text, Style::default().fg(theme.pill_desc_fg)));
            }
            spans.extend(pill_spans("q", "Quit", theme));
            spans.extend(pill_spans("Enter", "Visualize", theme));
            spans.extend(pill_spans("[ ]", "Name", theme));
            spans.extend(pill_spans("/", "Filter", theme));
            spans.extend(pill_spans("Tab", "Focus", theme));
            match focus {
                Focus::Table => {
                    spans.extend(pill_spans("\u{2191}\u{2193}", "Select", theme));
                }
                Focus::Viewport => {
                    spans.extend(pill_spans("\u{2190}\u{2193}\u{2191}\u{2192}", "Pan", theme));
                    spans.extend(pill_spans("+ -", "Zoom", theme));
                    spans.extend(pill_spans("o", "Open", theme));
                }
            }
            spans.extend(pill_spans("?", "Help", theme));
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line).style(bg_style), area);
}

fn pill_spans<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}
