use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest possible distance between two colors: √(3·255²)
pub const MAX_DISTANCE: f64 = 441.672_955_930_063_7;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Fixed check order used wherever channels compete (red, then green, then blue)
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

/// An RGB color; `u8` channels keep every value within 0..=255.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Signed per-channel error `target - self`
    pub fn error_from(&self, target: Color) -> ColorDelta {
        ColorDelta {
            r: i32::from(target.r) - i32::from(self.r),
            g: i32::from(target.g) - i32::from(self.g),
            b: i32::from(target.b) - i32::from(self.b),
        }
    }

    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css())
    }
}

/// Signed per-channel offset applied by [`adjust_channel`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorDelta {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl ColorDelta {
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    pub fn channel(channel: Channel, amount: i32) -> Self {
        match channel {
            Channel::Red => Self::new(amount, 0, 0),
            Channel::Green => Self::new(0, amount, 0),
            Channel::Blue => Self::new(0, 0, amount),
        }
    }

    pub fn all(amount: i32) -> Self {
        Self::new(amount, amount, amount)
    }

    pub fn get(&self, channel: Channel) -> i32 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }
}

pub fn generate_random_color() -> Color {
    random_color(&mut rand::thread_rng())
}

pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::new(rng.gen(), rng.gen(), rng.gen())
}

pub fn distance(a: Color, b: Color) -> f64 {
    let sq = |x: u8, y: u8| (f64::from(x) - f64::from(y)).powi(2);
    (sq(a.r, b.r) + sq(a.g, b.g) + sq(a.b, b.b)).sqrt()
}

/// Similarity in percent, rounded half away from zero.
///
/// Distance can never exceed [`MAX_DISTANCE`] for valid colors, so the result
/// always lands in 0..=100.
pub fn match_percentage(target: Color, mix: Color) -> u8 {
    let ratio = 1.0 - distance(target, mix) / MAX_DISTANCE;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn clamp(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

pub fn adjust_channel(current: Color, delta: ColorDelta) -> Color {
    let add = |c: u8, d: i32| clamp(i32::from(c).saturating_add(d));
    Color {
        r: add(current.r, delta.r),
        g: add(current.g, delta.g),
        b: add(current.b, delta.b),
    }
}

/// Darken (toward black) or lighten a color by `percentage` in 0.0..=1.0.
pub fn adjust_shade(current: Color, percentage: f64, toward_black: bool) -> Color {
    let percentage = if percentage.is_finite() {
        percentage.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let factor = if toward_black {
        1.0 - percentage
    } else {
        1.0 + percentage
    };
    let scale = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;

    Color {
        r: scale(current.r),
        g: scale(current.g),
        b: scale(current.b),
    }
}

/// Rescale so the brightest channel becomes 255, keeping channel ratios.
pub fn normalize(color: Color) -> Color {
    let max = f64::from(color.r.max(color.g).max(color.b).max(1));
    let scale = |c: u8| (f64::from(c) / max * 255.0).round() as u8;

    Color {
        r: scale(color.r),
        g: scale(color.g),
        b: scale(color.b),
    }
}
