//! Color space conversion helpers.
//!
//! Converts the integer HSV channels adjusted by the user into an
//! [`RgbSample`] using the six-sector HSV model. The result feeds
//! [`PwmFrame::from_rgb`](crate::output::PwmFrame::from_rgb).

use crate::output::{Polarity, PwmFrame};
use crate::types::HsvColor;
use palette::Srgb;

/// Linear RGB fractions in `[0.0, 1.0]`.
pub type RgbSample = Srgb<f32>;

/// Converts `h` in degrees, `s` and `v` in percent to RGB fractions.
///
/// Hue is taken modulo 360 and saturation/value clamp at 100, so any input
/// produces a valid sample. Pure and deterministic.
pub fn hsv_to_rgb(h: u32, s: u32, v: u32) -> RgbSample {
    let h = h % 360;
    let s = s.min(100) as f32 / 100.0;
    let v = v.min(100) as f32 / 100.0;

    let c = v * s;
    // H' mod 2, computed on integers so sector boundaries are exact.
    let h_mod_2 = (h % 120) as f32 / 60.0;
    let x = c * (1.0 - libm::fabsf(h_mod_2 - 1.0));
    let m = v - c;

    let (r1, g1, b1) = match h / 60 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Srgb::new(r1 + m, g1 + m, b1 + m)
}

/// Converts an [`HsvColor`] to RGB fractions.
#[inline]
pub fn hsv(color: HsvColor) -> RgbSample {
    hsv_to_rgb(color.hue(), color.saturation(), color.value())
}

/// Converts an [`HsvColor`] straight to a three-channel PWM frame.
#[inline]
pub fn hsv_frame(color: HsvColor, top: u16, polarity: Polarity) -> PwmFrame {
    PwmFrame::from_rgb(hsv(color), top, polarity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::{FromColor, Hsv};
    extern crate std;

    fn colors_equal(a: Srgb, b: Srgb) -> bool {
        const EPSILON: f32 = 0.001;
        (a.red - b.red).abs() < EPSILON
            && (a.green - b.green).abs() < EPSILON
            && (a.blue - b.blue).abs() < EPSILON
    }

    #[test]
    fn primaries_are_exact() {
        assert_eq!(hsv_to_rgb(0, 100, 100), Srgb::new(1.0, 0.0, 0.0));
        assert_eq!(hsv_to_rgb(120, 100, 100), Srgb::new(0.0, 1.0, 0.0));
        assert_eq!(hsv_to_rgb(240, 100, 100), Srgb::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn matches_palette_model_across_the_wheel() {
        for h in (0..360).step_by(7) {
            for &(s, v) in &[(100, 100), (50, 80), (20, 30), (0, 60)] {
                let expected = Srgb::from_color(Hsv::new(h as f32, s as f32 / 100.0, v as f32 / 100.0));
                assert!(colors_equal(hsv_to_rgb(h, s, v), expected), "h={h} s={s} v={v}");
            }
        }
    }

    #[test]
    fn out_of_range_inputs_are_normalized() {
        assert_eq!(hsv_to_rgb(360, 100, 100), hsv_to_rgb(0, 100, 100));
        assert_eq!(hsv_to_rgb(30, 250, 400), hsv_to_rgb(30, 100, 100));
    }
}
