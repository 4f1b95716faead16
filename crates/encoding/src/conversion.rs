//! HSV/HLS to RGB conversion.
//!
//! Hue is a fraction of the color wheel in `[0, 1)`; saturation, value and
//! lightness are in `[0, 1]`. Channels are scaled by 255 and truncated.

use sighting_common::Rgb;

/// Convert HSV to RGB.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    if s <= 0.0 {
        return to_rgb(v, v, v);
    }

    let h = h.rem_euclid(1.0);
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as u8 % 6 {
        0 => to_rgb(v, t, p),
        1 => to_rgb(q, v, p),
        2 => to_rgb(p, v, t),
        3 => to_rgb(p, q, v),
        4 => to_rgb(t, p, v),
        _ => to_rgb(v, p, q),
    }
}

/// Convert HLS (hue, lightness, saturation) to RGB.
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> Rgb {
    if s <= 0.0 {
        return to_rgb(l, l, l);
    }

    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;

    to_rgb(
        hls_channel(m1, m2, h + 1.0 / 3.0),
        hls_channel(m1, m2, h),
        hls_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hls_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

fn to_rgb(r: f64, g: f64, b: f64) -> Rgb {
    Rgb::new(channel(r), channel(g), channel(b))
}

fn channel(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Rgb::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_hsv_grey() {
        assert_eq!(hsv_to_rgb(0.4, 0.0, 1.0), Rgb::WHITE);
        assert_eq!(hsv_to_rgb(0.4, 1.0, 0.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_hls_red() {
        // l=0.5, s=1 is the pure hue
        assert_eq!(hls_to_rgb(0.0, 0.5, 1.0), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_hls_light_red() {
        // m2 = 0.9 + 0.6 - 0.54 = 0.96, m1 = 1.8 - 0.96 = 0.84
        assert_eq!(hls_to_rgb(0.0, 0.9, 0.6), Rgb::new(244, 214, 214));
    }

    #[test]
    fn test_hls_wraps_hue() {
        assert_eq!(hls_to_rgb(1.25, 0.5, 1.0), hls_to_rgb(0.25, 0.5, 1.0));
    }
}
