use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

/// A `#rrggbb` color. Anything else reads as white.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Hex(Color);

impl Hex {
    const fn rgb(value: u32) -> Self {
        Hex(Color::Rgb(
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ))
    }

    fn parse(text: &str) -> Option<Color> {
        let digits = text.trim().strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Hex::rgb(value).0)
    }
}

impl From<String> for Hex {
    fn from(text: String) -> Self {
        Hex(Hex::parse(&text).unwrap_or(Color::White))
    }
}

impl From<Hex> for String {
    fn from(hex: Hex) -> Self {
        match hex.0 {
            Color::Rgb(r, g, b) => format!("#{r:02x}{g:02x}{b:02x}"),
            _ => "#ffffff".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    bg: Hex,
    fg: Hex,
    text_dim: Hex,
    /// The word being asked.
    prompt: Hex,
    choice_selected_bg: Hex,
    choice_selected_fg: Hex,
    accent: Hex,
    border: Hex,
    header_bg: Hex,
    header_fg: Hex,
    bar_filled: Hex,
    bar_empty: Hex,
    error: Hex,
    warning: Hex,
    success: Hex,
}

fn user_theme_path(name: &str) -> Option<PathBuf> {
    Some(
        dirs::config_dir()?
            .join("wordquiz")
            .join("themes")
            .join(format!("{name}.toml")),
    )
}

impl Theme {
    /// Looks in the user theme directory first, then the bundled themes.
    pub fn load(name: &str) -> Option<Self> {
        let user_file = user_theme_path(name)
            .and_then(|path| fs::read_to_string(&path).ok().map(|content| (path, content)));
        if let Some((path, content)) = user_file {
            match toml::from_str::<Theme>(&content) {
                Ok(theme) => return Some(theme),
                Err(e) => tracing::warn!("{}: {e}", path.display()),
            }
        }

        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str(content).ok()
    }

    /// Bundled theme names, sorted.
    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("catppuccin-mocha").unwrap_or_else(|| Self {
            name: "builtin".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: Hex::rgb(0x1e1e2e),
            fg: Hex::rgb(0xcdd6f4),
            text_dim: Hex::rgb(0x6c7086),
            prompt: Hex::rgb(0xf9e2af),
            choice_selected_bg: Hex::rgb(0x45475a),
            choice_selected_fg: Hex::rgb(0xcdd6f4),
            accent: Hex::rgb(0x89b4fa),
            border: Hex::rgb(0x45475a),
            header_bg: Hex::rgb(0x313244),
            header_fg: Hex::rgb(0xcdd6f4),
            bar_filled: Hex::rgb(0x89b4fa),
            bar_empty: Hex::rgb(0x313244),
            error: Hex::rgb(0xf38ba8),
            warning: Hex::rgb(0xf9e2af),
            success: Hex::rgb(0xa6e3a1),
        }
    }
}

macro_rules! color_getters {
    ($($field:ident),* $(,)?) => {
        impl ThemeColors {
            $(pub fn $field(&self) -> Color { self.$field.0 })*
        }
    };
}

color_getters!(
    bg,
    fg,
    text_dim,
    prompt,
    choice_selected_bg,
    choice_selected_fg,
    accent,
    border,
    header_bg,
    header_fg,
    bar_filled,
    bar_empty,
    error,
    warning,
    success,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"catppuccin-mocha".to_string()));
        for name in names {
            assert!(Theme::load(&name).is_some(), "theme {name} failed to parse");
        }
    }

    #[test]
    fn hex_parsing_falls_back_to_white() {
        assert_eq!(Hex::from("#ff0080".to_string()).0, Color::Rgb(255, 0, 128));
        assert_eq!(Hex::from("nope".to_string()).0, Color::White);
        assert_eq!(Hex::from("#12345".to_string()).0, Color::White);
    }

    #[test]
    fn hex_round_trips_through_text() {
        assert_eq!(String::from(Hex::rgb(0x0a0b0c)), "#0a0b0c");
    }
}
