//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::patterns::VOID_KIND;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Number of block kinds with their own colour (1..=7); the void kind is separate.
const BLOCK_KINDS: usize = 7;

/// Block colours and UI colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Colours for kinds 1..=7 (index = kind - 1).
    pub kinds: [Color; BLOCK_KINDS],
    /// Void blocks: drawn, but count as empty for patterns.
    pub void: Color,
    /// Empty board cell.
    pub bg: Color,
    /// Grid dots / border.
    pub grid: Color,
    /// Text (score, status).
    pub main_fg: Color,
    /// Titles.
    pub title: Color,
    /// Filled cells in the target preview.
    pub pattern: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark_default()
    }
}

impl Theme {
    /// Editor-dark defaults.
    pub fn dark_default() -> Self {
        Self {
            kinds: [
                Color::Rgb(0xf4, 0x87, 0x71), // bug red
                Color::Rgb(0x4e, 0xc9, 0xb0), // function cyan
                Color::Rgb(0xce, 0x91, 0x78), // string orange
                Color::Rgb(0xc5, 0x86, 0xc0), // class purple
                Color::Rgb(0xdc, 0xdc, 0xaa), // variable yellow
                Color::Rgb(0x56, 0x9c, 0xd6), // keyword blue
                Color::Rgb(0xb5, 0xce, 0xa8), // number green
            ],
            void: Color::Rgb(0, 0, 0),
            bg: Color::Rgb(0x25, 0x25, 0x26),
            grid: Color::Rgb(0x3e, 0x3e, 0x42),
            main_fg: Color::Rgb(0xd4, 0xd4, 0xd4),
            title: Color::Rgb(0xdc, 0xdc, 0xaa),
            pattern: Color::Rgb(0xf4, 0x87, 0x71),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Defaults are used if path is None or the file does not exist; missing keys keep their
    /// default colour. `palette` is applied on top.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => {
                let s = std::fs::read_to_string(p)?;
                Self::from_map(&parse_theme_file(&s))
            }
            _ => Self::default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override block colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.kinds = [
                    Color::Rgb(0xFF, 0x00, 0x00),
                    Color::Rgb(0x00, 0xFF, 0xFF),
                    Color::Rgb(0xFF, 0x88, 0x00),
                    Color::Rgb(0xFF, 0x00, 0xFF),
                    Color::Rgb(0xFF, 0xFF, 0x00),
                    Color::Rgb(0x00, 0x88, 0xFF),
                    Color::Rgb(0x00, 0xFF, 0x00),
                ];
                // Keep void distinguishable from the empty background.
                self.void = Color::Rgb(0x60, 0x60, 0x60);
            }
            crate::Palette::Colorblind => {
                self.kinds = [
                    Color::Rgb(0xCC, 0x33, 0x11),
                    Color::Rgb(0x00, 0x99, 0x88),
                    Color::Rgb(0xEE, 0x77, 0x33),
                    Color::Rgb(0xEE, 0x33, 0x77),
                    Color::Rgb(0xBB, 0xBB, 0x00),
                    Color::Rgb(0x00, 0x77, 0xBB),
                    Color::Rgb(0x33, 0xBB, 0xEE),
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let mut theme = Self::default();
        for (i, slot) in theme.kinds.iter_mut().enumerate() {
            if let Some(c) = get(&format!("kind{}", i + 1)) {
                *slot = c;
            }
        }
        for (key, slot) in [
            ("void", &mut theme.void),
            ("bg", &mut theme.bg),
            ("grid", &mut theme.grid),
            ("main_fg", &mut theme.main_fg),
            ("title", &mut theme.title),
            ("pattern", &mut theme.pattern),
        ] {
            if let Some(c) = get(key) {
                *slot = c;
            }
        }
        theme
    }

    /// Colour for a board cell value. 0 gives the background.
    #[inline]
    pub fn kind_color(&self, kind: u8) -> Color {
        match kind {
            0 => self.bg,
            VOID_KIND => self.void,
            k => self.kinds[(k as usize - 1) % BLOCK_KINDS],
        }
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let bad = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(bad)
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(bad()),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(matches!(parse_hex("#12"), Err(ThemeError::InvalidHex(_))));
        assert!(matches!(parse_hex("zzzzzz"), Err(ThemeError::InvalidHex(_))));
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[bg]="#31353F""##);
        assert_eq!(map.get("bg"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_from_map_overrides_only_given_keys() {
        let map = parse_theme_file("theme[kind2]='#010203'\ntheme[void]=\"#FFF\"\n# comment");
        let t = Theme::from_map(&map);
        assert_eq!(t.kind_color(2), Color::Rgb(1, 2, 3));
        assert_eq!(t.kind_color(VOID_KIND), Color::Rgb(255, 255, 255));
        assert_eq!(t.kind_color(1), Theme::default().kind_color(1));
        assert_eq!(t.kind_color(0), Theme::default().bg);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let t = Theme::load(
            Some(Path::new("/nonexistent/bugstack.theme")),
            crate::Palette::Normal,
        )
        .unwrap();
        assert_eq!(t, Theme::default());
    }
}
