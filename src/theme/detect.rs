//! Recognizing which built-in theme a stylesheet came from.
//!
//! Exact comparison is tried first on comment-free, whitespace-collapsed text.
//! Stylesheets that went through the editor rarely survive byte-for-byte, so
//! the fallback compares only palette declarations and accepts a theme when at
//! least `match_threshold` of its palette values are present unchanged.

use super::css::{collapse_whitespace, custom_properties, is_bare_hsl_triplet, normalize_stylesheet};
use super::{render::render_stylesheet, ThemeChoice, ThemeEngine};
use std::collections::BTreeMap;

/// Variable-name fragments that identify palette declarations.
const PALETTE_MARKERS: [&str; 9] = [
    "background",
    "foreground",
    "primary",
    "secondary",
    "muted",
    "accent",
    "destructive",
    "border",
    "ring",
];

/// `(selector, variable)` → normalized value.
type Palette = BTreeMap<(String, String), String>;

pub(crate) fn detect_theme(engine: &ThemeEngine, stylesheet: &str) -> ThemeChoice {
    let normalized = normalize_stylesheet(stylesheet);
    if normalized.is_empty() {
        return ThemeChoice::Named(engine.default_theme().to_string());
    }

    let rendered: Vec<(&str, String)> = engine
        .themes()
        .iter()
        .map(|t| (t.name.as_str(), render_stylesheet(t)))
        .collect();

    for (name, css) in &rendered {
        if normalize_stylesheet(css) == normalized {
            return ThemeChoice::Named(name.to_string());
        }
    }

    let input = extract_palette(stylesheet);
    if input.is_empty() {
        return ThemeChoice::Custom;
    }

    let mut best: Option<(&str, f64)> = None;
    for (name, css) in &rendered {
        let candidate = extract_palette(css);
        let score = agreement(&input, &candidate);
        log::trace!("Theme '{}' palette agreement {:.3}", name, score);
        if score >= engine.match_threshold() && best.map_or(true, |(_, s)| score > s) {
            best = Some((name, score));
        }
    }

    match best {
        Some((name, _)) => ThemeChoice::Named(name.to_string()),
        None => ThemeChoice::Custom,
    }
}

/// Fraction of the candidate's palette declarations found with equal values in the input.
fn agreement(input: &Palette, candidate: &Palette) -> f64 {
    if candidate.is_empty() {
        return 0.0;
    }
    let matching = candidate
        .iter()
        .filter(|(key, value)| input.get(*key) == Some(*value))
        .count();
    matching as f64 / candidate.len() as f64
}

fn extract_palette(css: &str) -> Palette {
    custom_properties(css)
        .into_iter()
        .filter(|decl| PALETTE_MARKERS.iter().any(|m| decl.name.contains(m)))
        .map(|decl| ((decl.selector, decl.name), normalize_value(&decl.value)))
        .collect()
}

/// Lowercases, collapses whitespace and treats `hsl(h s% l%)` like the bare triplet.
fn normalize_value(value: &str) -> String {
    let value = collapse_whitespace(&value.to_lowercase());
    if let Some(inner) = value
        .strip_prefix("hsl(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let inner = inner.trim();
        if is_bare_hsl_triplet(inner) {
            return inner.to_string();
        }
    }
    value
}
