//! Colors and colormaps shared by the chart renderers.

use plotters::style::RGBColor;

pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180); // KDE line over sky blue bars
pub const TEAL: RGBColor = RGBColor(0, 128, 128);
pub const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
pub const SALMON: RGBColor = RGBColor(250, 128, 114);
pub const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
pub const SILVER: RGBColor = RGBColor(200, 200, 200);
pub const SHADOW: RGBColor = RGBColor(120, 120, 120);

/// Sampled at t = 0, 1/8, ..., 1.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

/// Sampled at t = 0, 1/4, ..., 1.
const COOLWARM: [(u8, u8, u8); 5] = [
    (59, 76, 192),
    (141, 176, 254),
    (221, 221, 221),
    (244, 154, 123),
    (180, 4, 38),
];

/// Viridis at `t` in [0, 1].
pub fn viridis(t: f64) -> RGBColor {
    interpolate(&VIRIDIS, t)
}

/// Coolwarm at `t` in [0, 1].
pub fn coolwarm(t: f64) -> RGBColor {
    interpolate(&COOLWARM, t)
}

/// Diverging color for `value` on a scale symmetric around zero.
pub fn diverging(value: f64, limit: f64) -> RGBColor {
    if !value.is_finite() || limit <= 0.0 {
        return SILVER;
    }
    coolwarm((value / limit + 1.0) / 2.0)
}

/// Slice color bound to the sentiment name, not its position in the pie.
pub fn sentiment_color(sentiment: &str) -> RGBColor {
    match sentiment {
        "Positive" => LIGHT_GREEN,
        "Negative" => SALMON,
        "Neutral" => LIGHT_BLUE,
        _ => SILVER,
    }
}

fn interpolate(stops: &[(u8, u8, u8)], t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (stops.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(stops.len() - 1);
    let frac = scaled - lower as f64;

    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (stops[lower], stops[upper]);
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}
