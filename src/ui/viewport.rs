use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::truncate_path_left;
use crate::report::graph::root_label;
use crate::ui::theme::Theme;
use crate::visualize::Visualization;

/// How much of each root label the hierarchy view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomLevel {
    Pids,
    Summary,
    Full,
}

impl ZoomLevel {
    pub fn zoom_in(self) -> Self {
        match self {
            ZoomLevel::Pids => ZoomLevel::Summary,
            ZoomLevel::Summary | ZoomLevel::Full => ZoomLevel::Full,
        }
    }

    pub fn zoom_out(self) -> Self {
        match self {
            ZoomLevel::Full => ZoomLevel::Summary,
            ZoomLevel::Summary | ZoomLevel::Pids => ZoomLevel::Pids,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ZoomLevel::Pids => "pids",
            ZoomLevel::Summary => "summary",
            ZoomLevel::Full => "full",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pids" | "compact" => ZoomLevel::Pids,
            "full" | "labels" => ZoomLevel::Full,
            _ => ZoomLevel::Summary,
        }
    }
}

/// What the hierarchy pane currently shows.
#[derive(Debug, Clone)]
pub enum ViewState {
    Empty,
    Ready(Box<Visualization>),
    Failed { name: String, error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub offset_x: u16,
    pub offset_y: u16,
    pub zoom: ZoomLevel,
}

impl Viewport {
    pub fn new(zoom: ZoomLevel) -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            zoom,
        }
    }
}

/// Plain-text lines of the hierarchy view at `zoom`.
///
/// Mirrors the rendered graph: a block per root that made it into the
/// report, followed by an edge line per descendant.
pub fn content_lines(vis: &Visualization, zoom: ZoomLevel) -> Vec<String> {
    let hierarchy = &vis.hierarchy;
    let report = &vis.report;
    let mut lines = vec![format!(
        "{}: {} root(s), {} node(s), {} edge(s)",
        hierarchy.name, report.artifacts.records, report.artifacts.nodes, report.artifacts.edges
    )];
    if !report.artifacts.skipped.is_empty() {
        let skipped: Vec<String> = report.artifacts.skipped.iter().map(u32::to_string).collect();
        lines.push(format!("exited before lookup: {}", skipped.join(", ")));
    }
    if report.records.is_empty() {
        lines.push(String::new());
        lines.push(format!("No running process named `{}`", hierarchy.name));
        return lines;
    }

    for record in &report.records {
        lines.push(String::new());
        match zoom {
            ZoomLevel::Pids => lines.push(format!("[{}]", record.pid)),
            ZoomLevel::Summary => lines.push(format!(
                "[{}] {}  user={}  ppid={}",
                record.pid,
                record.name,
                record.username_or_empty(),
                record.ppid
            )),
            ZoomLevel::Full => {
                let label = root_label(record);
                let mut label_lines = label.lines();
                if let Some(first) = label_lines.next() {
                    lines.push(format!("[{first}]"));
                }
                lines.extend(label_lines.map(|l| format!("\u{2502} {l}")));
            }
        }

        let descendants = hierarchy.descendants(record.pid).unwrap_or(&[]);
        let last = descendants.len().saturating_sub(1);
        for (i, pid) in descendants.iter().enumerate() {
            let glyph = if i == last { "\u{2514}\u{2500}>" } else { "\u{251c}\u{2500}>" };
            lines.push(format!("{glyph} {pid}"));
        }
    }
    lines
}

fn styled_line<'a>(text: String, theme: &Theme) -> Line<'a> {
    if text.starts_with('[') {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
    } else if text.starts_with('\u{2514}') || text.starts_with('\u{251c}') {
        let (glyph, rest) = text.split_at(text.find(' ').unwrap_or(0));
        Line::from(vec![
            Span::styled(glyph.to_string(), Style::default().fg(theme.tree_glyph)),
            Span::styled(rest.to_string(), Style::default().fg(theme.text_primary)),
        ])
    } else {
        Line::from(Span::styled(text, Style::default().fg(theme.text_secondary)))
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    state: &ViewState,
    viewport: &Viewport,
    focused: bool,
    theme: &Theme,
) {
    let title = match state {
        ViewState::Ready(vis) => {
            let path = vis.report.artifacts.paths.image_path.display().to_string();
            let room = (area.width as usize).saturating_sub(24);
            format!(
                " Hierarchy [{}] {} ",
                viewport.zoom.label(),
                truncate_path_left(&path, room)
            )
        }
        _ => " Hierarchy ".to_string(),
    };
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
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let lines: Vec<Line> = match state {
        ViewState::Empty => vec![Line::from(Span::styled(
            "Pick a process name and press Enter to visualize",
            Style::default().fg(theme.text_secondary),
        ))],
        ViewState::Failed { name, error } => vec![
            Line::from(Span::styled(
                format!("Could not visualize `{name}`"),
                Style::default()
                    .fg(theme.status_err)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                error.clone(),
                Style::default().fg(theme.status_err),
            )),
        ],
        ViewState::Ready(vis) => content_lines(vis, viewport.zoom)
            .into_iter()
            .map(|l| styled_line(l, theme))
            .collect(),
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((viewport.offset_y, viewport.offset_x));
    frame.render_widget(paragraph, area);
}
