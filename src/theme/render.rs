//! Stylesheet generation for a single theme.

use super::css::is_bare_hsl_triplet;
use super::{lookup, ThemeDefinition};
use std::fmt::Write;

/// Keys whose values are never colours and must not be wrapped.
const NON_COLOR_KEYS: &[&str] = &[
    "radius",
    "font-sans",
    "font-serif",
    "font-mono",
    "spacing",
    "tracking-normal",
    "tracking-tighter",
    "tracking-tight",
    "tracking-wide",
    "tracking-wider",
    "tracking-widest",
    "letter-spacing",
    "shadow-color",
    "shadow-opacity",
    "shadow-blur",
    "shadow-spread",
    "shadow-offset-x",
    "shadow-offset-y",
    "shadow-x",
    "shadow-y",
    "shadow-2xs",
    "shadow-xs",
    "shadow-sm",
    "shadow",
    "shadow-md",
    "shadow-lg",
    "shadow-xl",
    "shadow-2xl",
];

const DESTRUCTIVE_FOREGROUND: &str = "destructive-foreground";
const DESTRUCTIVE_FOREGROUND_FALLBACK: &str = "hsl(0 0% 98%)";

/// Wraps bare HSL triplets in `hsl(...)`; everything else passes through.
pub(crate) fn format_value(key: &str, value: &str) -> String {
    if NON_COLOR_KEYS.contains(&key) || value.contains('(') || value.starts_with('#') {
        return value.to_string();
    }
    let trimmed = value.trim();
    if is_bare_hsl_triplet(trimmed) {
        return format!("hsl({})", trimmed);
    }
    value.to_string()
}

fn push_var(out: &mut String, key: &str, value: &str) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "  --{}: {};", key, value);
}

/// Renders the `:root`/`.dark` variable blocks plus the global element rules.
pub(crate) fn render_stylesheet(theme: &ThemeDefinition) -> String {
    let mut out = String::with_capacity(2048);

    out.push_str(":root {\n");
    for (key, value) in &theme.shared {
        push_var(&mut out, key, value);
    }
    for (key, value) in &theme.light {
        push_var(&mut out, key, &format_value(key, value));
    }
    if lookup(&theme.light, DESTRUCTIVE_FOREGROUND).is_none() {
        push_var(&mut out, DESTRUCTIVE_FOREGROUND, DESTRUCTIVE_FOREGROUND_FALLBACK);
    }
    out.push_str("}\n\n");

    out.push_str(".dark {\n");
    for (key, value) in &theme.dark {
        push_var(&mut out, key, &format_value(key, value));
    }
    // Light values stand in for anything the dark group leaves out.
    for (key, value) in &theme.light {
        if lookup(&theme.dark, key).is_none() {
            push_var(&mut out, key, &format_value(key, value));
        }
    }
    if theme.dark_var(DESTRUCTIVE_FOREGROUND).is_none() {
        push_var(&mut out, DESTRUCTIVE_FOREGROUND, DESTRUCTIVE_FOREGROUND_FALLBACK);
    }
    out.push_str("}\n\n");

    out.push_str(
        "*,\n*::before,\n*::after {\n  border-color: var(--border);\n  outline-color: var(--ring);\n}\n\n",
    );
    out.push_str(
        "body {\n  background-color: var(--background);\n  color: var(--foreground);\n  font-family: var(--font-sans, \"Inter\", system-ui, -apple-system, BlinkMacSystemFont, \"Segoe UI\", sans-serif);\n  letter-spacing: var(--tracking-normal, 0em);\n}\n",
    );

    out
}
