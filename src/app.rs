use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::widgets::TableState;
use unicode_width::UnicodeWidthStr;

use crate::action::{Action, Direction};
use crate::config::{Config, KeybindsConfig, parse_key};
use crate::report::{GraphRenderer, GraphStyle, GraphvizRenderer, ReportWriter};
use crate::system::collector::Collector;
use crate::system::platform;
use crate::system::process::ProcessRecord;
use crate::system::table::ProcessTable;
use crate::ui::theme::Theme;
use crate::ui::viewport::{ViewState, Viewport, ZoomLevel, content_lines};
use crate::visualize::{Visualizer, names_from_records};

pub type DynVisualizer = Visualizer<Box<dyn ProcessTable>, Box<dyn GraphRenderer>>;

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Viewport,
}

impl Focus {
    fn toggle(self) -> Self {
        match self {
            Focus::Table => Focus::Viewport,
            Focus::Viewport => Focus::Table,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Ok,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    created: Instant,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub visualize: KeyCode,
    pub next_name: KeyCode,
    pub prev_name: KeyCode,
    pub filter: KeyCode,
    pub zoom_in: KeyCode,
    pub zoom_out: KeyCode,
    pub reset_view: KeyCode,
    pub open_image: KeyCode,
    pub refresh: KeyCode,
    pub switch_focus: KeyCode,
    pub help: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            visualize: parse_key(&kb.visualize).unwrap_or(KeyCode::Char('v')),
            next_name: parse_key(&kb.next_name).unwrap_or(KeyCode::Char(']')),
            prev_name: parse_key(&kb.prev_name).unwrap_or(KeyCode::Char('[')),
            filter: parse_key(&kb.filter).unwrap_or(KeyCode::Char('/')),
            zoom_in: parse_key(&kb.zoom_in).unwrap_or(KeyCode::Char('+')),
            zoom_out: parse_key(&kb.zoom_out).unwrap_or(KeyCode::Char('-')),
            reset_view: parse_key(&kb.reset_view).unwrap_or(KeyCode::Char('0')),
            open_image: parse_key(&kb.open_image).unwrap_or(KeyCode::Char('o')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
            switch_focus: parse_key(&kb.switch_focus).unwrap_or(KeyCode::Tab),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
        }
    }

    /// Keybinds grouped by the pane they act on, in display order.
    pub fn help_sections(&self) -> Vec<HelpSection> {
        vec![
            HelpSection {
                title: "General",
                focus: None,
                entries: vec![
                    (key_label(self.quit), "Quit"),
                    ("Ctrl+C".to_string(), "Quit (always)"),
                    (key_label(self.switch_focus), "Switch table/hierarchy"),
                    (key_label(self.filter), "Filter process names"),
                    (key_label(self.refresh), "Refresh process list"),
                    (key_label(self.help), "Toggle help"),
                ],
            },
            HelpSection {
                title: "Process table",
                focus: Some(Focus::Table),
                entries: vec![
                    ("\u{2191}\u{2193}".to_string(), "Select row"),
                    (
                        format!("{} {}", key_label(self.prev_name), key_label(self.next_name)),
                        "Cycle process name",
                    ),
                    (
                        format!("Enter {}", key_label(self.visualize)),
                        "Visualize selected name",
                    ),
                ],
            },
            HelpSection {
                title: "Hierarchy",
                focus: Some(Focus::Viewport),
                entries: vec![
                    ("\u{2190}\u{2191}\u{2193}\u{2192}".to_string(), "Pan"),
                    (
                        format!("{} {}", key_label(self.zoom_in), key_label(self.zoom_out)),
                        "Zoom pids/summary/full",
                    ),
                    (key_label(self.reset_view), "Reset pan and zoom"),
                    (key_label(self.open_image), "Open image in viewer"),
                ],
            },
        ]
    }
}

/// One titled group of the help overlay. `focus` is the pane the keys act on.
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: &'static str,
    pub focus: Option<Focus>,
    pub entries: Vec<(String, &'static str)>,
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    }
}

pub struct App {
    pub running: bool,
    visualizer: DynVisualizer,
    pub records: Vec<ProcessRecord>,
    names: Vec<String>,
    pub name_index: usize,
    pub input_mode: InputMode,
    pub filter_text: String,
    pub focus: Focus,
    pub table_state: TableState,
    pub table_area: Option<Rect>,
    pub view: ViewState,
    pub viewport: Viewport,
    default_zoom: ZoomLevel,
    pan_step: u16,
    pub status: Option<StatusMessage>,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
    pub config_path: Option<PathBuf>,
}

/// Builds the live visualizer: sysinfo table + Graphviz renderer.
pub fn live_visualizer(config: &Config) -> DynVisualizer {
    let renderer: Box<dyn GraphRenderer> = Box::new(GraphvizRenderer::new(&config.graph.layout));
    let writer = ReportWriter::new(&config.general.output_dir, renderer).with_style(GraphStyle {
        rankdir: config.graph.rankdir.clone(),
        node_shape: config.graph.node_shape.clone(),
    });
    let table: Box<dyn ProcessTable> = Box::new(Collector::new());
    Visualizer::new(table, writer)
}

impl App {
    pub fn new(config: Config) -> Self {
        let visualizer = live_visualizer(&config);
        Self::with_visualizer(&config, visualizer)
    }

    pub fn with_visualizer(config: &Config, visualizer: DynVisualizer) -> Self {
        let default_zoom = ZoomLevel::from_str_config(&config.viewport.default_zoom);
        let mut app = App {
            running: true,
            visualizer,
            records: Vec::new(),
            names: Vec::new(),
            name_index: 0,
            input_mode: InputMode::Normal,
            filter_text: String::new(),
            focus: Focus::Table,
            table_state: TableState::default().with_selected(Some(0)),
            table_area: None,
            view: ViewState::Empty,
            viewport: Viewport::new(default_zoom),
            default_zoom,
            pan_step: config.viewport.pan_step.max(1),
            status: None,
            theme: Theme::from_config(&config.colors.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            config_path: crate::config::config_path().filter(|p| p.exists()),
        };
        app.refresh_data();
        app
    }

    pub fn refresh_data(&mut self) {
        let previous = self.selected_name().map(str::to_string);
        self.records = self.visualizer.table_mut().processes();
        self.names = names_from_records(&self.records).into_iter().collect();
        self.name_index = 0;
        if let Some(name) = previous {
            self.select_name(&name);
        }
        self.clamp_table_selection();
        tracing::debug!(
            processes = self.records.len(),
            names = self.names.len(),
            "process list refreshed"
        );
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = &self.status
            && status.created.elapsed() >= STATUS_TTL
        {
            self.status = None;
        }
    }

    fn matches_filter(&self, text: &str) -> bool {
        self.filter_text.is_empty() || text.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    pub fn visible_names(&self) -> Vec<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|name| self.matches_filter(name))
            .collect()
    }

    /// Rows whose name passes the filter, so every visible row has its name
    /// in the selector.
    pub fn visible_rows(&self) -> Vec<&ProcessRecord> {
        self.records
            .iter()
            .filter(|r| self.matches_filter(&r.name))
            .collect()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.visible_names().get(self.name_index).copied()
    }

    pub fn selected_record(&self) -> Option<&ProcessRecord> {
        let index = self.table_state.selected()?;
        self.visible_rows().get(index).copied()
    }

    fn select_name(&mut self, name: &str) {
        if let Some(pos) = self.visible_names().iter().position(|n| *n == name) {
            self.name_index = pos;
        }
    }

    fn clamp_table_selection(&mut self) {
        let len = self.visible_rows().len();
        let selected = self.table_state.selected().unwrap_or(0);
        if len == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(selected.min(len - 1)));
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        // Arrow keys and Enter are hardwired (not configurable)
        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::Left => return Action::Navigate(Direction::Left),
            KeyCode::Right => return Action::Navigate(Direction::Right),
            KeyCode::Enter => return Action::Visualize,
            _ => {}
        }

        if code == kb.quit {
            Action::Quit
        } else if code == kb.visualize {
            Action::Visualize
        } else if code == kb.next_name {
            Action::NextName
        } else if code == kb.prev_name {
            Action::PrevName
        } else if code == kb.filter {
            Action::EnterFilterMode
        } else if code == kb.zoom_in || code == KeyCode::Char('=') {
            Action::ZoomIn
        } else if code == kb.zoom_out {
            Action::ZoomOut
        } else if code == kb.reset_view {
            Action::ResetView
        } else if code == kb.open_image {
            Action::OpenImage
        } else if code == kb.refresh {
            Action::Refresh
        } else if code == kb.switch_focus {
            Action::SwitchFocus
        } else if code == kb.help {
            Action::ToggleHelp
        } else {
            Action::None
        }
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if key.code == self.keybinds.help || key.code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearFilter,
            KeyCode::Enter => Action::ExitFilterMode,
            KeyCode::Backspace => {
                let mut text = self.filter_text.clone();
                text.pop();
                Action::UpdateFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.filter_text.clone();
                text.push(c);
                Action::UpdateFilter(text)
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::SwitchFocus => self.focus = self.focus.toggle(),
            Action::NextName => self.cycle_name(1),
            Action::PrevName => self.cycle_name(-1),
            Action::Visualize => self.visualize_selected(),
            Action::EnterFilterMode => self.input_mode = InputMode::Filter,
            Action::ExitFilterMode => self.input_mode = InputMode::Normal,
            Action::ClearFilter => {
                self.filter_text.clear();
                self.input_mode = InputMode::Normal;
                self.name_index = 0;
                self.clamp_table_selection();
            }
            Action::UpdateFilter(text) => {
                self.filter_text = text;
                self.name_index = 0;
                self.table_state.select(Some(0));
                self.clamp_table_selection();
                self.sync_name_to_row();
            }
            Action::ZoomIn => self.viewport.zoom = self.viewport.zoom.zoom_in(),
            Action::ZoomOut => self.viewport.zoom = self.viewport.zoom.zoom_out(),
            Action::ResetView => self.viewport = Viewport::new(self.default_zoom),
            Action::OpenImage => self.open_image(),
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::Refresh => {
                self.refresh_data();
                self.set_status(
                    format!("Refreshed: {} processes", self.records.len()),
                    StatusKind::Ok,
                );
            }
            Action::SelectAt(col, row) => self.select_at(col, row),
            Action::None => {}
        }
    }

    /// Mouse wheel: pans the hierarchy or moves the table selection.
    pub fn scroll(&mut self, delta: i16) {
        let dir = if delta < 0 {
            Direction::Up
        } else {
            Direction::Down
        };
        for _ in 0..delta.unsigned_abs() {
            self.navigate(dir);
        }
    }

    fn navigate(&mut self, direction: Direction) {
        match self.focus {
            Focus::Table => match direction {
                Direction::Up => self.move_row(-1),
                Direction::Down => self.move_row(1),
                Direction::Left => self.cycle_name(-1),
                Direction::Right => self.cycle_name(1),
            },
            Focus::Viewport => self.pan(direction),
        }
    }

    fn move_row(&mut self, delta: isize) {
        let len = self.visible_rows().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.table_state.select(Some(next));
        self.sync_name_to_row();
    }

    fn sync_name_to_row(&mut self) {
        if let Some(name) = self.selected_record().map(|r| r.name.clone()) {
            self.select_name(&name);
        }
    }

    fn cycle_name(&mut self, delta: isize) {
        let len = self.visible_names().len();
        if len == 0 {
            return;
        }
        let next = (self.name_index as isize + delta).rem_euclid(len as isize);
        self.name_index = next as usize;
    }

    fn pan(&mut self, direction: Direction) {
        let ViewState::Ready(vis) = &self.view else {
            return;
        };
        let lines = content_lines(vis, self.viewport.zoom);
        let max_y = lines.len().saturating_sub(1).min(u16::MAX as usize) as u16;
        let max_x = lines
            .iter()
            .map(|l| l.width())
            .max()
            .unwrap_or(0)
            .saturating_sub(1)
            .min(u16::MAX as usize) as u16;
        let step = self.pan_step;
        let vp = &mut self.viewport;
        match direction {
            Direction::Up => vp.offset_y = vp.offset_y.saturating_sub(1),
            Direction::Down => vp.offset_y = vp.offset_y.saturating_add(1).min(max_y),
            Direction::Left => vp.offset_x = vp.offset_x.saturating_sub(step),
            Direction::Right => vp.offset_x = vp.offset_x.saturating_add(step).min(max_x),
        }
    }

    fn select_at(&mut self, col: u16, row: u16) {
        let Some(area) = self.table_area else {
            return;
        };
        // border + header row
        let first_row = area.y + 2;
        if col < area.x || col >= area.x + area.width || row < first_row || row + 1 >= area.y + area.height
        {
            return;
        }
        let index = (row - first_row) as usize + self.table_state.offset();
        if index < self.visible_rows().len() {
            self.focus = Focus::Table;
            self.table_state.select(Some(index));
            self.sync_name_to_row();
        }
    }

    fn visualize_selected(&mut self) {
        let Some(name) = self.selected_name().map(str::to_string) else {
            self.set_status("No process name selected".to_string(), StatusKind::Error);
            return;
        };

        match self.visualizer.visualize(&name) {
            Ok(vis) => {
                let artifacts = &vis.report.artifacts;
                self.set_status(
                    format!(
                        "Wrote {} ({} root(s), {} node(s))",
                        artifacts.paths.image_path.display(),
                        artifacts.records,
                        artifacts.nodes
                    ),
                    StatusKind::Ok,
                );
                self.view = ViewState::Ready(Box::new(vis));
                self.viewport = Viewport::new(self.default_zoom);
                self.focus = Focus::Viewport;
            }
            Err(err) => {
                tracing::error!(name = %name, error = %err, "visualization failed");
                self.set_status(format!("Visualization failed: {err}"), StatusKind::Error);
                self.view = ViewState::Failed {
                    name,
                    error: format!("{err:#}"),
                };
            }
        }
    }

    fn open_image(&mut self) {
        let ViewState::Ready(vis) = &self.view else {
            self.set_status("Nothing rendered yet".to_string(), StatusKind::Error);
            return;
        };
        let path = vis.report.artifacts.paths.image_path.clone();
        match platform::open_in_viewer(&path) {
            Ok(()) => self.set_status(format!("Opened {}", path.display()), StatusKind::Ok),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to open image viewer");
                self.set_status(format!("Could not open image: {err}"), StatusKind::Error);
            }
        }
    }

    fn set_status(&mut self, text: String, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text,
            kind,
            created: Instant::now(),
        });
    }

    pub fn output_dir(&self) -> String {
        self.visualizer.writer().output_root().display().to_string()
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_sections(&self) -> Vec<HelpSection> {
        self.keybinds.help_sections()
    }

    /// Config file in effect, shown in the help overlay.
    pub fn config_label(&self) -> String {
        self.config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(defaults)".to_string())
    }
}
