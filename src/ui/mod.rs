pub mod plain;
pub mod screen;
pub mod theme;
pub mod tui;

pub use plain::{JsonRenderer, PlainRenderer};
pub use tui::TuiRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Tui,
    Plain,
    Json,
}

impl RenderMode {
    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "plain" | "text" | "simple" => RenderMode::Plain,
            "json" | "jsonl" => RenderMode::Json,
            _ => RenderMode::Tui,
        }
    }

    pub fn is_interactive(self) -> bool {
        self == RenderMode::Tui
    }
}
