// File: crates/chart-core/src/theme.rs
// Summary: RGB color type, CSS color names, and light/dark theming for chart chrome.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const GREEN: Rgb = Rgb::new(0x00, 0x80, 0x00);
    pub const ORANGE: Rgb = Rgb::new(0xff, 0xa5, 0x00);
    pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    /// Parse `#rgb`, `#rrggbb` or a CSS color name.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::from_hex(hex);
        }
        named(s)
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let mut c = [0u8; 3];
                for (i, ch) in hex.chars().enumerate() {
                    let v = ch.to_digit(16)? as u8;
                    c[i] = v * 17;
                }
                Some(Self::new(c[0], c[1], c[2]))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    /// Linear interpolation per channel; `t` outside [0, 1] extrapolates and saturates.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| -> u8 {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse(&value).ok_or(ConfigError::UnknownColor(value))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

fn named(name: &str) -> Option<Rgb> {
    let rgb = match name.to_ascii_lowercase().as_str() {
        "black" => Rgb::BLACK,
        "white" => Rgb::WHITE,
        "green" => Rgb::GREEN,
        "orange" => Rgb::ORANGE,
        "red" => Rgb::RED,
        "blue" => Rgb::new(0x00, 0x00, 0xff),
        "yellow" => Rgb::new(0xff, 0xff, 0x00),
        "gray" | "grey" => Rgb::new(0x80, 0x80, 0x80),
        "steelblue" => Rgb::new(0x46, 0x82, 0xb4),
        "teal" => Rgb::new(0x00, 0x80, 0x80),
        "purple" => Rgb::new(0x80, 0x00, 0x80),
        _ => return None,
    };
    Some(rgb)
}

/// Colors for everything that is not a bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Rgb,
    pub axis_line: Rgb,
    pub tick: Rgb,
    pub tick_label: Rgb,
    pub tooltip: Rgb,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: Rgb::new(250, 250, 252),
            axis_line: Rgb::new(20, 20, 30),
            tick: Rgb::new(20, 20, 30),
            tick_label: Rgb::new(20, 20, 30),
            tooltip: Rgb::new(20, 20, 30),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Rgb::new(18, 18, 20),
            axis_line: Rgb::new(180, 180, 190),
            tick: Rgb::new(150, 150, 160),
            tick_label: Rgb::new(235, 235, 245),
            tooltip: Rgb::new(255, 230, 70),
        }
    }

    pub fn high_contrast_dark() -> Self {
        Self {
            name: "high-contrast-dark",
            background: Rgb::BLACK,
            axis_line: Rgb::WHITE,
            tick: Rgb::new(0xcc, 0xcc, 0xcc),
            tick_label: Rgb::WHITE,
            tooltip: Rgb::new(0xff, 0xff, 0x00),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark(), Theme::high_contrast_dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    presets()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_default()
}
