//! Heat colouring of normalised densities.

/// An RGBA colour, one byte per channel
pub type Rgba = [u8; 4];

pub const WHITE: Rgba = [255, 255, 255, 255];

/// Hue in degrees at a normalised density of 0 (blue); 1 maps to 0 (red)
pub const COLD_HUE: f64 = 240.0;

/// Colour of a normalised density `value` in `[0, 1]`.
///
/// The hue sweeps from blue at 0 through green to red at 1
/// (`hue = (1 - value) * 240`) at full saturation and half lightness.
/// Values outside the range are clamped.
///
/// ```rust
/// use cytogate_plots::colormap::heat_color;
///
/// assert_eq!(heat_color(0.0), [0, 0, 255, 255]);
/// assert_eq!(heat_color(0.5), [0, 255, 0, 255]);
/// assert_eq!(heat_color(1.0), [255, 0, 0, 255]);
/// ```
pub fn heat_color(value: f64) -> Rgba {
    let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    let (r, g, b) = hsl_to_rgb((1.0 - value) * COLD_HUE, 1.0, 0.5);
    [to_byte(r), to_byte(g), to_byte(b), 255]
}

#[inline]
fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Convert HSL to RGB
///
/// Input: H in degrees, S and L in 0.0-1.0
/// Output: RGB values in range 0.0-1.0
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    // Achromatic case
    if s == 0.0 {
        return (l, l, l);
    }

    let h = h.rem_euclid(360.0) / 360.0;
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

#[inline]
fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
