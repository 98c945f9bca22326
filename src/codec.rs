//! Numeric encodings shared by every symbolizer.
//!
//! These are the conversions where the renderer has its own conventions:
//! colors are normalized RGBA, rotations are counter-clockwise radians, dash
//! patterns are 16 bit masks and billboard sizes are expressed as a scale of
//! the source image.

use crate::errors::StyleError;

/// Number of bits in a renderer dash pattern.
pub const DASH_PATTERN_BITS: u32 = 16;

/// RGBA color with channels in the range `0.0 ..= 1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const WHITE: Color = Color { red: 1.0, green: 1.0, blue: 1.0, alpha: 1.0 };
    pub const BLACK: Color = Color { red: 0.0, green: 0.0, blue: 0.0, alpha: 1.0 };

    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Color {
        Color { red, green, blue, alpha }
    }

    /// Creates a new color from `u8` channel values in the range `0 ..= 255`.
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color {
            red: r as f64 / 255.0,
            green: g as f64 / 255.0,
            blue: b as f64 / 255.0,
            alpha: a as f64 / 255.0,
        }
    }
}

/// Dash settings of a polyline material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashEncoding {
    /// Length in pixels of one full pattern cycle.
    pub length: f64,
    /// 16 bit mask, most significant bit first, `1` meaning "draw".
    pub pattern: u16,
}

/// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` and applies `opacity`.
///
/// Opacity is clamped to `0.0 ..= 1.0` (a NaN opacity counts as fully opaque).
/// When the hex string carries its own alpha, both are multiplied.
pub fn to_packed_color(hex: &str, opacity: f64) -> Result<Color, StyleError> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.is_ascii())
        .ok_or_else(|| StyleError::InvalidColor(hex.to_string()))?;

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| StyleError::InvalidColor(hex.to_string()));

    let (r, g, b, a) = match digits.len() {
        3 => {
            let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
            (expand(0)?, expand(1)?, expand(2)?, 255)
        }
        6 => (channel(&digits[0..2])?, channel(&digits[2..4])?, channel(&digits[4..6])?, 255),
        8 => (
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
            channel(&digits[6..8])?,
        ),
        _ => return Err(StyleError::InvalidColor(hex.to_string())),
    };

    let mut color = Color::from_u8(r, g, b, a);
    let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    color.alpha = if a == 255 { opacity } else { color.alpha * opacity };
    Ok(color)
}

/// Converts clockwise degrees (north up) into the renderer's counter-clockwise radians.
pub fn to_rotation_radians(degrees: f64) -> f64 {
    -degrees.to_radians()
}

/// Encodes a dash array into the renderer's dash length and bit pattern.
///
/// Odd arrays are repeated once so that every cycle alternates on/off runs.
/// The cycle is mapped proportionally onto [`DASH_PATTERN_BITS`] bits, starting
/// with an "on" run at the most significant bit; run boundaries are rounded from
/// the cumulative length so the runs always fill the mask exactly. A run that
/// rounds to nothing still gets one bit, taken from the longest run. The dash
/// length is the length of the full cycle, so `[4]` encodes like `[4, 4]`.
///
/// Returns `None` when the array is empty, holds a non-positive or non-finite
/// value, or its cycle has more runs than the pattern has bits; the caller
/// then falls back to its defaults.
pub fn to_dash_encoding(dasharray: &[f64]) -> Option<DashEncoding> {
    if dasharray.is_empty() || dasharray.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return None;
    }

    let cycle: Vec<f64> = if dasharray.len() % 2 == 0 {
        dasharray.to_vec()
    } else {
        dasharray.iter().chain(dasharray.iter()).copied().collect()
    };
    if cycle.len() > DASH_PATTERN_BITS as usize {
        return None;
    }
    let total: f64 = cycle.iter().sum();

    let mut bits = Vec::with_capacity(cycle.len());
    let mut cumulative = 0.0;
    let mut start = 0u32;
    for run in &cycle {
        cumulative += run;
        let end = (((cumulative / total) * DASH_PATTERN_BITS as f64).round() as u32).min(DASH_PATTERN_BITS);
        bits.push(end - start);
        start = end;
    }
    // At most 16 runs share 16 bits, so a donor with two or more bits exists.
    while let Some(empty) = bits.iter().position(|b| *b == 0) {
        let (donor, _) = bits.iter().enumerate().max_by_key(|(idx, b)| (**b, usize::MAX - idx))?;
        bits[donor] -= 1;
        bits[empty] = 1;
    }

    let mut pattern: u32 = 0;
    let mut start = 0u32;
    for (idx, len) in bits.iter().enumerate() {
        if idx % 2 == 0 {
            for bit in start..start + len {
                pattern |= 1 << (DASH_PATTERN_BITS - 1 - bit);
            }
        }
        start += len;
    }

    Some(DashEncoding { length: total, pattern: pattern as u16 })
}

/// Scale to apply to an image of `natural_size` pixels so it renders at `requested_size`.
///
/// A zero natural size yields `1.0` so a broken image is drawn as-is.
pub fn to_scale_factor(requested_size: f64, natural_size: f64) -> f64 {
    if natural_size <= 0.0 {
        return 1.0;
    }
    requested_size / natural_size
}
