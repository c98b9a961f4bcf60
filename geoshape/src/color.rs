//! Colours and the fill-colour policy.
//!
//! Generated shapes are filled pure black or pure white, whichever has the
//! stronger perceptual contrast (APCA, W3 0.0.98G constants) against the
//! document background.

use serde::{Deserialize, Serialize};

/// An sRGB colour with channels in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb` or `#rgb`.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f64 / 255.0);
        match hex.len() {
            6 => Some(Rgb::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1].repeat(2));
                Some(Rgb::new(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }

    /// `#rrggbb`, channels clamped.
    pub fn to_hex(&self) -> String {
        let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    /// Screen luminance estimate used by APCA.
    pub fn luminance(&self) -> f64 {
        0.2126729 * self.r.powf(2.4) + 0.7151522 * self.g.powf(2.4) + 0.0721750 * self.b.powf(2.4)
    }
}

const BLACK_THRESHOLD: f64 = 0.022;
const BLACK_CLAMP: f64 = 1.414;
const DELTA_Y_MIN: f64 = 0.0005;
const NORM_BG: f64 = 0.56;
const NORM_TXT: f64 = 0.57;
const REV_TXT: f64 = 0.62;
const REV_BG: f64 = 0.65;
const SCALE: f64 = 1.14;
const LOW_OFFSET: f64 = 0.027;
const LOW_CLIP: f64 = 0.1;

fn soft_clamp(y: f64) -> f64 {
    if y > BLACK_THRESHOLD {
        y
    } else {
        y + (BLACK_THRESHOLD - y).powf(BLACK_CLAMP)
    }
}

/// APCA lightness contrast (Lc) of `text` on `background`.
///
/// Positive for dark-on-light, negative for light-on-dark, roughly ±108 at
/// the extremes and 0 for indistinguishable colours.
pub fn apca_contrast(text: Rgb, background: Rgb) -> f64 {
    let txt = soft_clamp(text.luminance());
    let bg = soft_clamp(background.luminance());
    if (bg - txt).abs() < DELTA_Y_MIN {
        return 0.0;
    }

    let output = if bg > txt {
        let sapc = (bg.powf(NORM_BG) - txt.powf(NORM_TXT)) * SCALE;
        if sapc < LOW_CLIP { 0.0 } else { sapc - LOW_OFFSET }
    } else {
        let sapc = (bg.powf(REV_BG) - txt.powf(REV_TXT)) * SCALE;
        if sapc > -LOW_CLIP { 0.0 } else { sapc + LOW_OFFSET }
    };
    output * 100.0
}

/// Black or white, whichever contrasts more with `background`. Ties go black.
pub fn pick_fill(background: Rgb) -> Rgb {
    let black = apca_contrast(Rgb::BLACK, background).abs();
    let white = apca_contrast(Rgb::WHITE, background).abs();
    if white > black { Rgb::WHITE } else { Rgb::BLACK }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgb::from_hex("#ffffff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("000"), Some(Rgb::BLACK));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("zzzzzz"), None);
        assert_eq!(Rgb::new(0.2, 0.6, 1.0).to_hex(), "#3399ff");
    }

    #[test]
    fn extremes_match_reference_values() {
        let dark_on_light = apca_contrast(Rgb::BLACK, Rgb::WHITE);
        let light_on_dark = apca_contrast(Rgb::WHITE, Rgb::BLACK);
        assert!((dark_on_light - 106.04).abs() < 0.1, "got {}", dark_on_light);
        assert!((light_on_dark + 107.88).abs() < 0.1, "got {}", light_on_dark);
    }

    #[test]
    fn same_colour_has_no_contrast() {
        let grey = Rgb::new(0.5, 0.5, 0.5);
        assert_eq!(apca_contrast(grey, grey), 0.0);
    }

    #[test]
    fn fill_follows_background() {
        assert_eq!(pick_fill(Rgb::WHITE), Rgb::BLACK);
        assert_eq!(pick_fill(Rgb::BLACK), Rgb::WHITE);
        assert_eq!(pick_fill(Rgb::from_hex("#1e1e1e").unwrap()), Rgb::WHITE);
        assert_eq!(pick_fill(Rgb::from_hex("#f5f5f5").unwrap()), Rgb::BLACK);
    }
}
