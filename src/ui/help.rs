use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::app::{Focus, HelpSection};
use crate::format::truncate_path_left;
use crate::ui::theme::Theme;

const KEY_COLUMN: usize = 9;
const OVERLAY_WIDTH: u16 = 58;

/// Where procflow reads settings from and writes reports to.
pub struct HelpFooter<'a> {
    pub config: &'a str,
    pub output_dir: &'a str,
}

/// Keybind overlay: one block per section, the focused pane's section marked,
/// then the config file and output directory.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    sections: &[HelpSection],
    focus: Focus,
    footer: &HelpFooter,
    theme: &Theme,
) {
    let lines = help_lines(sections, focus, footer, theme);

    let width = OVERLAY_WIDTH.min(area.width.saturating_sub(4));
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let overlay = centered_rect(width, height, area);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " procflow keys ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(theme.surface_bg)),
        inner,
    );
}

fn help_lines<'a>(
    sections: &'a [HelpSection],
    focus: Focus,
    footer: &HelpFooter,
    theme: &Theme,
) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    for section in sections {
        let active = section.focus == Some(focus);
        let marker = if active { "\u{25b8} " } else { "  " };
        let title_style = if active {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}", section.title),
            title_style,
        )));
        for (key, desc) in &section.entries {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!(" {key:>width$} ", width = KEY_COLUMN - 2),
                    Style::default()
                        .fg(theme.pill_key_fg)
                        .bg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {desc}"), Style::default().fg(theme.pill_desc_fg)),
            ]));
        }
        lines.push(Line::default());
    }

    let room = OVERLAY_WIDTH as usize - 12;
    for (label, value) in [("Config", footer.config), ("Output", footer.output_dir)] {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {label}: "),
                Style::default().fg(theme.text_secondary),
            ),
            Span::styled(
                truncate_path_left(value, room),
                Style::default().fg(theme.text_primary),
            ),
        ]));
    }
    lines
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [vert] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [horiz] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(vert);
    horiz
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ResolvedKeybinds;
    use crate::config::KeybindsConfig;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn focused_section_is_marked() {
        let sections = ResolvedKeybinds::from_config(&KeybindsConfig::default()).help_sections();
        let footer = HelpFooter {
            config: "(defaults)",
            output_dir: "/tmp/out",
        };
        let text = plain(&help_lines(&sections, Focus::Viewport, &footer, &Theme::dark()));
        assert!(text.contains(&"\u{25b8} Hierarchy".to_string()));
        assert!(text.contains(&"  Process table".to_string()));
        assert!(text.iter().any(|l| l == "  Output: /tmp/out"));
    }
}
