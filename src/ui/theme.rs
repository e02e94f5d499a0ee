use ratatui::style::Color;

use crate::config::ColorsConfig;

#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Color,
    pub label: Color,
    pub muted: Color,
    /// idle, warning, critical
    pub heat_colors: [Color; 3],
}

impl Theme {
    pub fn from_config(colors: &ColorsConfig) -> Self {
        let mut theme = match colors.theme.to_lowercase().as_str() {
            "light" => Self::light(),
            "mono" | "monochrome" => return Self::mono(),
            _ => Self::dark(),
        };

        let low = parse_hex_color(&colors.heat_low);
        let mid = parse_hex_color(&colors.heat_mid);
        let high = parse_hex_color(&colors.heat_high);
        if let (Some(low), Some(mid), Some(high)) = (low, mid, high) {
            theme.heat_colors = [low, mid, high];
        }
        theme
    }

    pub fn dark() -> Self {
        Theme {
            title: Color::Green,
            label: Color::Gray,
            muted: Color::DarkGray,
            heat_colors: [Color::Green, Color::Yellow, Color::Red],
        }
    }

    pub fn light() -> Self {
        Theme {
            title: Color::Blue,
            label: Color::DarkGray,
            muted: Color::Gray,
            heat_colors: [
                Color::Rgb(0x2d, 0x7a, 0x27),
                Color::Rgb(0xb5, 0x89, 0x0a),
                Color::Rgb(0xa1, 0x2e, 0x2e),
            ],
        }
    }

    pub fn mono() -> Self {
        Theme {
            title: Color::White,
            label: Color::Gray,
            muted: Color::DarkGray,
            heat_colors: [Color::Gray, Color::White, Color::White],
        }
    }

    pub fn heat(&self, percent: f64) -> Color {
        if percent >= 80.0 {
            self.heat_colors[2]
        } else if percent >= 50.0 {
            self.heat_colors[1]
        } else {
            self.heat_colors[0]
        }
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#2d5a27"), Some(Color::Rgb(0x2d, 0x5a, 0x27)));
        assert_eq!(parse_hex_color("a12e2e"), Some(Color::Rgb(0xa1, 0x2e, 0x2e)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn config_heat_overrides_apply() {
        let theme = Theme::from_config(&ColorsConfig::default());
        assert_eq!(theme.title, Theme::dark().title);
        assert_eq!(theme.heat_colors[0], Color::Rgb(0x2d, 0x5a, 0x27));
        assert_eq!(theme.heat_colors[2], Color::Rgb(0xa1, 0x2e, 0x2e));
    }

    #[test]
    fn invalid_override_keeps_theme_heat() {
        let colors = ColorsConfig {
            heat_mid: "not-a-color".to_string(),
            ..ColorsConfig::default()
        };
        let theme = Theme::from_config(&colors);
        assert_eq!(theme.heat_colors, Theme::dark().heat_colors);
    }

    #[test]
    fn mono_ignores_overrides() {
        let colors = ColorsConfig {
            theme: "mono".to_string(),
            ..ColorsConfig::default()
        };
        assert_eq!(Theme::from_config(&colors).heat_colors, Theme::mono().heat_colors);
    }

    #[test]
    fn heat_thresholds() {
        let theme = Theme::dark();
        assert_eq!(theme.heat(0.0), Color::Green);
        assert_eq!(theme.heat(49.9), Color::Green);
        assert_eq!(theme.heat(50.0), Color::Yellow);
        assert_eq!(theme.heat(80.0), Color::Red);
    }
}
