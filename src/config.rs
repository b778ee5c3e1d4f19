use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub graph: GraphConfig,
    pub viewport: ViewportConfig,
    pub logging: LoggingConfig,
    pub colors: ColorsConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory under which `<name>_info/` report directories are created.
    pub output_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub layout: String,
    pub rankdir: String,
    pub node_shape: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            layout: "dot".to_string(),
            rankdir: "TB".to_string(),
            node_shape: "box".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub default_zoom: String,
    pub pan_step: u16,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            default_zoom: "summary".to_string(),
            pan_step: 4,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Empty means the default location under the cache dir.
    pub file: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: String::new(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub visualize: String,
    pub next_name: String,
    pub prev_name: String,
    pub filter: String,
    pub zoom_in: String,
    pub zoom_out: String,
    pub reset_view: String,
    pub open_image: String,
    pub refresh: String,
    pub switch_focus: String,
    pub help: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            visualize: "v".to_string(),
            next_name: "]".to_string(),
            prev_name: "[".to_string(),
            filter: "/".to_string(),
            zoom_in: "+".to_string(),
            zoom_out: "-".to_string(),
            reset_view: "0".to_string(),
            open_image: "o".to_string(),
            refresh: "r".to_string(),
            switch_focus: "Tab".to_string(),
            help: "?".to_string(),
        }
    }
}

/// Parses a keybind string ("q", "Enter", "Tab", "F5", ...) into a key code.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        "space" => Some(KeyCode::Char(' ')),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        other => other
            .strip_prefix('f')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F),
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("procflow").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.output_dir, PathBuf::from("."));
        assert_eq!(config.graph.layout, "dot");
        assert_eq!(config.viewport.default_zoom, "summary");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.colors.theme, "dark");
        assert_eq!(config.keybinds.quit, "q");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[graph]
layout = "neato"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.graph.layout, "neato");
        // Other fields should be defaults
        assert_eq!(config.graph.rankdir, "TB");
        assert_eq!(config.viewport.pan_step, 4);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
output_dir = "/tmp/reports"

[graph]
layout = "dot"
rankdir = "LR"
node_shape = "ellipse"

[viewport]
default_zoom = "full"
pan_step = 8

[logging]
level = "debug"
file = "/tmp/procflow.log"
format = "json"

[colors]
theme = "light"

[keybinds]
quit = "x"
visualize = "Enter"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.output_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.graph.rankdir, "LR");
        assert_eq!(config.graph.node_shape, "ellipse");
        assert_eq!(config.viewport.default_zoom, "full");
        assert_eq!(config.viewport.pan_step, 8);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.colors.theme, "light");
        assert_eq!(config.keybinds.quit, "x");
        assert_eq!(config.keybinds.visualize, "Enter");
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.graph.layout, "dot");
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("procflow_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.viewport.pan_step, 4);
        let _ = std::fs::remove_file(&temp);
    }

    #[test]
    fn key_names_parse() {
        assert_eq!(parse_key("q"), Some(KeyCode::Char('q')));
        assert_eq!(parse_key("Enter"), Some(KeyCode::Enter));
        assert_eq!(parse_key("Tab"), Some(KeyCode::Tab));
        assert_eq!(parse_key("F5"), Some(KeyCode::F(5)));
        assert_eq!(parse_key("F13"), None);
        assert_eq!(parse_key("nonsense"), None);
    }
}
