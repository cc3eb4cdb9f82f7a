//! Colour previews for theme pickers.
//!
//! Theme values come in several notations (hex, `hsl()`, bare HSL triplets,
//! `rgb()`, `oklch()`); everything is reduced to 8-bit sRGB here.

use super::css::{custom_properties, is_bare_hsl_triplet};
use super::ThemeDefinition;

/// 8-bit sRGB triple.
pub type Rgb = [u8; 3];

/// The four dots shown next to a theme name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeSwatch {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub destructive: Rgb,
}

impl ThemeSwatch {
    pub fn from_theme(theme: &ThemeDefinition) -> Self {
        let color = |value: Option<&str>, fallback: Rgb| value.and_then(parse_color).unwrap_or(fallback);

        let primary = color(theme.light_var("primary"), [0, 0, 0]);
        let secondary = color(
            theme.light_var("secondary").or_else(|| theme.light_var("muted")),
            [0xf5, 0xf5, 0xf5],
        );
        let accent = color(theme.light_var("accent"), primary);
        let destructive = color(theme.light_var("destructive"), [0xef, 0x44, 0x44]);

        Self { primary, secondary, accent, destructive }
    }

    /// Fixed palette shown for user-authored stylesheets.
    pub fn custom() -> Self {
        Self {
            primary: [0xa8, 0x55, 0xf7],
            secondary: [0xec, 0x48, 0x99],
            accent: [0xf9, 0x73, 0x16],
            destructive: [0xef, 0x44, 0x44],
        }
    }

    pub fn colors(&self) -> [Rgb; 4] {
        [self.primary, self.secondary, self.accent, self.destructive]
    }
}

/// Primary sans-serif family of a theme, without quotes.
pub fn theme_font(theme: &ThemeDefinition) -> Option<String> {
    let stack = theme
        .shared_var("font-sans")
        .or_else(|| theme.light_var("font-sans"))?;
    let first = stack.split(',').next()?.trim().replace(['"', '\''], "");
    if first.is_empty() {
        None
    } else {
        Some(first)
    }
}

/// Effective palette colours of a stylesheet: `:root` values, overridden by
/// `.dark` values when `dark` is set. Declarations that are not colours are skipped.
pub fn stylesheet_palette(css: &str, dark: bool) -> Vec<(String, Rgb)> {
    let mut palette: Vec<(String, Rgb)> = Vec::new();
    for decl in custom_properties(css) {
        let applies = decl.selector == ":root" || (dark && decl.selector == ".dark");
        if !applies {
            continue;
        }
        let Some(rgb) = parse_color(&decl.value) else {
            continue;
        };
        match palette.iter_mut().find(|(name, _)| *name == decl.name) {
            Some(entry) => entry.1 = rgb,
            None => palette.push((decl.name, rgb)),
        }
    }
    palette
}

/// Parses a CSS colour value into sRGB. Alpha components are ignored.
pub fn parse_color(value: &str) -> Option<Rgb> {
    let value = value.trim().to_ascii_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    if is_bare_hsl_triplet(&value) {
        return parse_hsl_args(&value);
    }
    if let Some(args) = function_args(&value, "oklch") {
        return parse_oklch_args(args);
    }
    if let Some(args) = function_args(&value, "hsl").or_else(|| function_args(&value, "hsla")) {
        return parse_hsl_args(args);
    }
    if let Some(args) = function_args(&value, "rgb").or_else(|| function_args(&value, "rgba")) {
        let nums = numeric_args(args);
        if nums.len() < 3 {
            return None;
        }
        return Some([clamp_u8(nums[0]), clamp_u8(nums[1]), clamp_u8(nums[2])]);
    }
    None
}

fn function_args<'a>(value: &'a str, name: &str) -> Option<&'a str> {
    value
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Numbers from `a b c / alpha` or `a, b, c` argument lists, alpha dropped.
fn numeric_args(args: &str) -> Vec<f64> {
    let color_part = args.split('/').next().unwrap_or(args);
    color_part
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(|p| {
            let (text, scale) = match p.strip_suffix('%') {
                Some(t) => (t, 0.01),
                None => (p.strip_suffix("deg").unwrap_or(p), 1.0),
            };
            text.parse::<f64>().map(|v| v * scale)
        })
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_default()
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 | 4 => Some([digit(0)? * 17, digit(1)? * 17, digit(2)? * 17]),
        6 | 8 => Some([pair(0)?, pair(2)?, pair(4)?]),
        _ => None,
    }
}

fn parse_hsl_args(args: &str) -> Option<Rgb> {
    let nums = numeric_args(args);
    if nums.len() < 3 {
        return None;
    }
    Some(hsl_to_rgb(nums[0], nums[1], nums[2]))
}

/// `h` in degrees, `s` and `l` as fractions.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = h.rem_euclid(360.0) / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        let v = to_u8(l);
        return [v, v, v];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    [
        to_u8(channel(h + 1.0 / 3.0)),
        to_u8(channel(h)),
        to_u8(channel(h - 1.0 / 3.0)),
    ]
}

fn parse_oklch_args(args: &str) -> Option<Rgb> {
    let nums = numeric_args(args);
    let l = *nums.first()?;
    let c = nums.get(1).copied().unwrap_or(0.0);
    let h = nums.get(2).copied().unwrap_or(0.0);
    Some(oklch_to_rgb(l, c, h))
}

/// OKLCH → OKLab → linear sRGB → gamma-encoded sRGB.
fn oklch_to_rgb(l: f64, c: f64, h: f64) -> Rgb {
    let h_rad = h.to_radians();
    let a = c * h_rad.cos();
    let b = c * h_rad.sin();

    let l_ = l + 0.396_337_777_4 * a + 0.215_803_757_3 * b;
    let m_ = l - 0.105_561_345_8 * a - 0.063_854_172_8 * b;
    let s_ = l - 0.089_484_177_5 * a - 1.291_485_548_0 * b;

    let (l3, m3, s3) = (l_ * l_ * l_, m_ * m_ * m_, s_ * s_ * s_);

    let r = 4.076_741_662_1 * l3 - 3.307_711_591_3 * m3 + 0.230_969_929_2 * s3;
    let g = -1.268_438_004_6 * l3 + 2.609_757_401_1 * m3 - 0.341_319_396_5 * s3;
    let bl = -0.004_196_086_3 * l3 - 0.703_418_614_7 * m3 + 1.707_614_701_0 * s3;

    let gamma = |v: f64| {
        if v <= 0.003_130_8 {
            12.92 * v
        } else {
            1.055 * v.powf(1.0 / 2.4) - 0.055
        }
    };

    [to_u8(gamma(r)), to_u8(gamma(g)), to_u8(gamma(bl))]
}

fn to_u8(fraction: f64) -> u8 {
    clamp_u8(fraction * 255.0)
}

fn clamp_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
