use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::{Srgb, Srgba};
use serde::Deserialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PALETTE: [&str; 4] = ["#ff8000", "#ff00ff", "#0000ff", "#80ff00"];

#[derive(Debug, Error, PartialEq)]
pub enum ColorError {
    #[error("invalid hex color '{0}'")]
    Hex(String),
    #[error("palette must contain at least one color")]
    EmptyPalette,
}

/// Fill color of a slice, written as `#rrggbb` in config.
#[derive(Debug, Clone, Copy, PartialEq, SerializeDisplay, DeserializeFromStr)]
pub struct SliceColor(Srgb<u8>);

impl SliceColor {
    pub fn rgb(&self) -> (f64, f64, f64) {
        self.0.into_format::<f64>().into_components()
    }
}

impl FromStr for SliceColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Srgb::from_str(s.trim())
            .map(Self)
            .map_err(|_| ColorError::Hex(s.to_string()))
    }
}

impl fmt::Display for SliceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

/// Non-empty list of slice colors, cycled by item index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<SliceColor>")]
pub struct Palette(Vec<SliceColor>);

impl Palette {
    pub fn new(colors: Vec<SliceColor>) -> Result<Self, ColorError> {
        if colors.is_empty() {
            return Err(ColorError::EmptyPalette);
        }
        Ok(Self(colors))
    }

    pub fn color_for(&self, index: usize) -> SliceColor {
        self.0[index % self.0.len()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<SliceColor>> for Palette {
    type Error = ColorError;

    fn try_from(colors: Vec<SliceColor>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(
            DEFAULT_PALETTE
                .iter()
                .filter_map(|hex| hex.parse().ok())
                .collect(),
        )
    }
}

pub struct ThemeColors {
    pub label: Srgba<f64>,
    pub hub: Srgba<f64>,
    pub pointer: Srgba<f64>,
    pub selection: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            label: Srgba::new(1.0, 1.0, 1.0, 1.0),
            hub: Srgba::new(0.15, 0.15, 0.15, 0.9),
            pointer: Srgba::new(0.95, 0.95, 0.95, 0.95),
            selection: Srgba::new(0.4, 0.4, 0.8, 0.9),
        }
    }
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let fallback = Self::default();
        Self {
            label: fallback.label,
            hub: Self::lookup_color(context, "theme_bg_color", fallback.hub, Some(0.9)),
            pointer: Self::lookup_color(context, "theme_fg_color", fallback.pointer, None),
            selection: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                fallback.selection,
                Some(0.9),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.lunchwheel-window, .lunchwheel-drawing-area {
    background: none;
    background-color: transparent;
}
.lunchwheel-panel {
    background-color: alpha(@theme_bg_color, 0.85);
    border-radius: 12px;
    padding: 12px;
}
.lunchwheel-selection {
    font-weight: bold;
    font-size: 1.2em;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_has_four_colors() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 4);
        assert_eq!(palette.color_for(0).to_string(), "#ff8000");
        assert_eq!(palette.color_for(5).to_string(), "#ff00ff");
    }

    #[test]
    fn test_slice_color_parsing() {
        let color: SliceColor = "#0000ff".parse().unwrap();
        assert_eq!(color.rgb(), (0.0, 0.0, 1.0));
        assert_eq!(
            "blue".parse::<SliceColor>(),
            Err(ColorError::Hex("blue".to_string()))
        );
    }

    #[test]
    fn test_palette_deserialization() {
        let palette: Palette = serde_json::from_str(r##"["#112233", "#abcdef"]"##).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.color_for(3).to_string(), "#abcdef");

        assert!(serde_json::from_str::<Palette>("[]").is_err());
        assert!(serde_json::from_str::<Palette>(r#"["nope"]"#).is_err());
    }
}
