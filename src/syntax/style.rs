//! Style types for text rendering
//!
//! Theme documents describe styles as open key/value maps. This module
//! keeps that map intact and provides typed views of the keys a
//! renderer understands.

use std::collections::BTreeMap;
use std::fmt;

/// Foreground key
pub const FOREGROUND: &str = "foreground";
/// Background key
pub const BACKGROUND: &str = "background";
/// Font size key
pub const FONT_SIZE: &str = "fontSize";
/// Font style key (`italic`, `oblique`, `normal`, plus TextMate's `bold`/`underline` words)
pub const FONT_STYLE: &str = "fontStyle";
/// Font weight key (`thin` … `extrablack`)
pub const FONT_WEIGHT: &str = "fontWeight";
/// Selection color key
pub const SELECTION: &str = "selection";

/// An RGBA color parsed from `#RGB`, `#RRGGBB` or `#RRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse a hex color string
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                let r = digits.next()??;
                let g = digits.next()??;
                let b = digits.next()??;
                Some(Self::rgb(r, g, b))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

/// Slant of a font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

/// Weight of a font, ordered from lightest to heaviest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FontWeight {
    Thin,
    ExtraLight,
    Light,
    SemiLight,
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
    ExtraBlack,
}

impl FontWeight {
    /// Parse a weight keyword or a CSS numeric weight
    pub fn from_name(name: &str) -> Option<Self> {
        let weight = match name.trim().to_ascii_lowercase().as_str() {
            "thin" | "100" => FontWeight::Thin,
            "extralight" | "200" => FontWeight::ExtraLight,
            "light" | "300" => FontWeight::Light,
            "semilight" | "350" => FontWeight::SemiLight,
            "normal" | "400" => FontWeight::Normal,
            "medium" | "500" => FontWeight::Medium,
            "semibold" | "600" => FontWeight::SemiBold,
            "bold" | "700" => FontWeight::Bold,
            "extrabold" | "800" => FontWeight::ExtraBold,
            "black" | "900" => FontWeight::Black,
            "extrablack" | "950" => FontWeight::ExtraBlack,
            _ => return None,
        };
        Some(weight)
    }

    /// Whether this weight should render as bold on a terminal
    pub fn is_bold(&self) -> bool {
        *self >= FontWeight::SemiBold
    }
}

/// Open key/value style mapping as found in theme documents
///
/// Unknown keys are preserved so hosts can interpret them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StyleAttributes(BTreeMap<String, String>);

impl StyleAttributes {
    /// Create an empty style
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set an arbitrary key
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    /// Builder: set foreground color
    pub fn with_foreground(self, color: &str) -> Self {
        self.with(FOREGROUND, color)
    }

    /// Builder: set background color
    pub fn with_background(self, color: &str) -> Self {
        self.with(BACKGROUND, color)
    }

    /// Builder: set the font style words
    pub fn with_font_style(self, style: &str) -> Self {
        self.with(FONT_STYLE, style)
    }

    /// Builder: set font weight
    pub fn with_font_weight(self, weight: &str) -> Self {
        self.with(FONT_WEIGHT, weight)
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate over all key/value pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn foreground(&self) -> Option<Color> {
        self.get(FOREGROUND).and_then(Color::parse_hex)
    }

    pub fn background(&self) -> Option<Color> {
        self.get(BACKGROUND).and_then(Color::parse_hex)
    }

    pub fn selection(&self) -> Option<Color> {
        self.get(SELECTION).and_then(Color::parse_hex)
    }

    pub fn font_size(&self) -> Option<f32> {
        self.get(FONT_SIZE)?.trim().parse().ok()
    }

    /// Slant from `fontStyle`, last recognized word wins
    pub fn font_style(&self) -> Option<FontStyle> {
        self.font_style_words().fold(None, |found, word| match word {
            "italic" => Some(FontStyle::Italic),
            "oblique" => Some(FontStyle::Oblique),
            "normal" => Some(FontStyle::Normal),
            _ => found,
        })
    }

    /// Weight from `fontWeight`, or `Bold` when `fontStyle` contains `bold`
    pub fn font_weight(&self) -> Option<FontWeight> {
        if let Some(weight) = self.get(FONT_WEIGHT).and_then(FontWeight::from_name) {
            return Some(weight);
        }
        self.font_style_words()
            .any(|w| w == "bold")
            .then_some(FontWeight::Bold)
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight().is_some_and(|w| w.is_bold())
    }

    pub fn is_underline(&self) -> bool {
        self.font_style_words().any(|w| w == "underline")
    }

    /// Check if this is the default (no styling)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn font_style_words(&self) -> impl Iterator<Item = &str> {
        self.get(FONT_STYLE).unwrap_or("").split_whitespace()
    }
}

impl FromIterator<(String, String)> for StyleAttributes {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A styled span of the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Byte offset where this span starts (inclusive)
    pub start: usize,
    /// Byte offset where this span ends (exclusive)
    pub end: usize,
    /// Style to apply to this span
    pub style: StyleAttributes,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, style: StyleAttributes) -> Self {
        Self { start, end, style }
    }

    /// Check if this span contains a byte position
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Get the length of this span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
