//! Box styling: flat colours and label metadata

use super::geometry::{Point, Rect};
use std::str::FromStr;
use thiserror::Error;

/// Inset applied to edge-aligned labels
const TEXT_EDGE_INSET: f32 = 10.0;

/// RGBA colour with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::rgb(0.4, 0.4, 0.4)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseColorError {
    #[error("colour must start with '#': {0}")]
    MissingHash(String),
    #[error("colour must have 6 or 8 hex digits: {0}")]
    BadLength(String),
    #[error("invalid hex digits in colour: {0}")]
    BadDigit(String),
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse `#RRGGBB` or `#RRGGBBAA`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError::MissingHash(s.to_string()))?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ParseColorError::BadLength(s.to_string()));
        }

        let channel = |i: usize| -> Result<f32, ParseColorError> {
            let byte = hex
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ParseColorError::BadDigit(s.to_string()))?;
            Ok(byte as f32 / 255.0)
        };

        let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

/// Label placement inside a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

impl TextAlign {
    /// Anchor point handed to the text renderer for a label in `rect`
    pub fn anchor(&self, rect: &Rect) -> Point {
        let center_x = rect.x + rect.width / 2.0;
        let center_y = rect.y + rect.height / 2.0;
        match self {
            TextAlign::Center => Point { x: center_x, y: center_y },
            TextAlign::Left => Point {
                x: rect.x + TEXT_EDGE_INSET,
                y: center_y,
            },
            TextAlign::Right => Point {
                x: rect.right() - TEXT_EDGE_INSET,
                y: center_y,
            },
            TextAlign::Top => Point {
                x: center_x,
                y: rect.top() - TEXT_EDGE_INSET,
            },
            TextAlign::Bottom => Point {
                x: center_x,
                y: rect.y + TEXT_EDGE_INSET,
            },
        }
    }
}

impl FromStr for TextAlign {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to centred text
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "left" => TextAlign::Left,
            "right" => TextAlign::Right,
            "top" => TextAlign::Top,
            "bottom" => TextAlign::Bottom,
            _ => TextAlign::Center,
        })
    }
}

/// Display style of an interactive box
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStyle {
    pub background: Color,
    pub text_color: Color,
    pub text: String,
    pub align: TextAlign,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            background: Color::default(),
            text_color: Color::WHITE,
            text: String::new(),
            align: TextAlign::Center,
        }
    }
}

impl BoxStyle {
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>, align: TextAlign) -> Self {
        self.text = text.into();
        self.align = align;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }
}
