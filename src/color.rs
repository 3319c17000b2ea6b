//! # OKLCH Colors
//!
//! Concrete color values for the preview interpreter. Channel math happens in
//! OKLCH; conversion to and from sRGB hex and 50/50 mixing go through
//! `palette`.
//!
//! Accepted literals are `oklch(L C H)` / `oklch(L C H / A)` and `#rgb` /
//! `#rrggbb`. Results are written back as `oklch(L% C H)` with five
//! significant digits, which is what the editor's color picker produces.

use palette::{FromColor, Mix, Oklch, Oklcha, Srgb};
use std::fmt;
use std::str::FromStr;

/// Upper bound for chroma after an operation
pub const MAX_CHROMA: f64 = 0.4;

/// Swatch color used when a string can't be converted to hex
pub const FALLBACK_HEX: &str = "#808080";

/// Error returned when a color literal can't be read
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorParseError {
    #[error("Empty color string")]
    Empty,

    #[error("Unsupported color format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid color channel: {0}")]
    InvalidChannel(String),

    #[error("Invalid hex color: {0}")]
    Hex(String),
}

/// A color in OKLCH space with alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(Oklcha<f64>);

impl Color {
    pub fn new(l: f64, c: f64, h: f64) -> Self {
        Self::with_alpha(l, c, h, 1.0)
    }

    pub fn with_alpha(l: f64, c: f64, h: f64, alpha: f64) -> Self {
        Self(Oklcha::new(l, c, h, alpha))
    }

    /// Read a `#rgb` or `#rrggbb` sRGB hex literal
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let rgb: Srgb<u8> = hex
            .trim()
            .parse()
            .map_err(|_| ColorParseError::Hex(hex.to_string()))?;
        let oklch = Oklch::from_color(rgb.into_format::<f64>());
        Ok(Self(Oklcha::new(oklch.l, oklch.chroma, oklch.hue, 1.0)))
    }

    pub fn lightness(&self) -> f64 {
        self.0.l
    }

    pub fn chroma(&self) -> f64 {
        self.0.chroma
    }

    /// Hue in degrees, within `[0, 360)`
    pub fn hue(&self) -> f64 {
        self.0.hue.into_positive_degrees()
    }

    pub fn alpha(&self) -> f64 {
        self.0.alpha
    }

    /// Replace lightness, clamped to `[0, 1]`
    pub fn with_lightness(self, l: f64) -> Self {
        Self::with_alpha(l.clamp(0.0, 1.0), self.chroma(), self.hue(), self.alpha())
    }

    /// Replace chroma, clamped to `[0, MAX_CHROMA]`
    pub fn with_chroma(self, c: f64) -> Self {
        Self::with_alpha(self.lightness(), c.clamp(0.0, MAX_CHROMA), self.hue(), self.alpha())
    }

    /// Replace hue, wrapped into `[0, 360)`
    pub fn with_hue(self, h: f64) -> Self {
        Self::with_alpha(self.lightness(), self.chroma(), h.rem_euclid(360.0), self.alpha())
    }

    /// Interpolate toward `other` in OKLCH, taking the shorter hue arc
    pub fn mix(self, other: Color, factor: f64) -> Self {
        Self(self.0.mix(other.0, factor))
    }

    /// sRGB hex (`#rrggbb`), clamped into gamut
    pub fn to_hex(&self) -> String {
        let rgb: Srgb<f64> = Srgb::from_color(self.0.color);
        let rgb: Srgb<u8> = rgb.into_format();
        format!("#{:x}", rgb)
    }

    /// Short label for node UIs: `oklch(0.600 0.200 180)`
    pub fn label(&self) -> String {
        format!(
            "oklch({} {} {:.0})",
            to_precision(self.lightness(), 3),
            to_precision(self.chroma(), 3),
            self.hue()
        )
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if s.starts_with('#') {
            return Self::from_hex(s);
        }

        let lower = s.to_ascii_lowercase();
        let body = lower
            .strip_prefix("oklch(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ColorParseError::UnsupportedFormat(s.to_string()))?;

        let (channels, alpha) = match body.split_once('/') {
            Some((channels, alpha)) => (channels, Some(alpha.trim())),
            None => (body, None),
        };

        let parts: Vec<&str> = channels.split_whitespace().collect();
        let [l, c, h] = parts.as_slice() else {
            return Err(ColorParseError::InvalidChannel(channels.trim().to_string()));
        };

        let alpha = match alpha {
            Some(token) => parse_channel(token, 1.0)?.clamp(0.0, 1.0),
            None => 1.0,
        };

        Ok(Color::with_alpha(
            parse_channel(l, 1.0)?,
            parse_channel(c, MAX_CHROMA)?,
            parse_hue(h)?,
            alpha,
        ))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "oklch({}% {} {}",
            significant(self.lightness() * 100.0, 5),
            significant(self.chroma(), 5),
            significant(self.hue(), 5)
        )?;
        if self.alpha() < 1.0 {
            write!(f, " / {}", significant(self.alpha(), 5))?;
        }
        f.write_str(")")
    }
}

/// Hex swatch for any color string, `#808080` when it can't be read
pub fn color_to_hex(color: &str) -> String {
    color
        .parse::<Color>()
        .map(|color| color.to_hex())
        .unwrap_or_else(|_| FALLBACK_HEX.to_string())
}

/// Number or percentage; `100%` maps to `percent_scale`
fn parse_channel(token: &str, percent_scale: f64) -> Result<f64, ColorParseError> {
    if token == "none" {
        return Ok(0.0);
    }
    match token.strip_suffix('%') {
        Some(percent) => Ok(number(percent)? / 100.0 * percent_scale),
        None => number(token),
    }
}

fn parse_hue(token: &str) -> Result<f64, ColorParseError> {
    if token == "none" {
        return Ok(0.0);
    }
    if let Some(value) = token.strip_suffix("deg") {
        return number(value);
    }
    if let Some(value) = token.strip_suffix("grad") {
        return Ok(number(value)? * 0.9);
    }
    if let Some(value) = token.strip_suffix("rad") {
        return Ok(number(value)?.to_degrees());
    }
    if let Some(value) = token.strip_suffix("turn") {
        return Ok(number(value)? * 360.0);
    }
    number(token)
}

fn number(token: &str) -> Result<f64, ColorParseError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ColorParseError::InvalidChannel(token.to_string()))
}

/// Round to `digits` significant digits; prints without trailing zeros
fn significant(value: f64, digits: usize) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return 0.0;
    }
    format!("{:.*e}", digits - 1, value).parse().unwrap_or(value)
}

/// Fixed significant digits, trailing zeros kept (`0.6` -> `"0.600"`)
fn to_precision(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{:.*}", (digits - 1) as usize, 0.0);
    }
    let rounded = significant(value, digits as usize);
    let magnitude = rounded.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    format!("{:.*}", decimals, rounded)
}
