//! Minimal stylesheet scanning used for theme detection and palette extraction.
//!
//! This is not a CSS parser: it understands flat `selector { decl; decl; }`
//! blocks, which is all a theme stylesheet contains. Nested at-rules are
//! scanned as if they were flat and simply contribute no custom properties.

/// Removes `/* ... */` comments. An unterminated comment swallows the rest of the input.
pub fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Collapses every whitespace run to a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comment-free, whitespace-collapsed form used for exact comparison.
pub fn normalize_stylesheet(css: &str) -> String {
    collapse_whitespace(&strip_comments(css))
}

/// A custom property declaration found inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    /// Normalized selector of the enclosing block, e.g. `:root` or `.dark`.
    pub selector: String,
    /// Property name without the leading `--`.
    pub name: String,
    pub value: String,
}

/// Lists every `--name: value` declaration in document order.
pub fn custom_properties(css: &str) -> Vec<VarDecl> {
    let cleaned = strip_comments(css);
    let mut decls = Vec::new();
    let mut rest = cleaned.as_str();

    while let Some(open) = rest.find('{') {
        let selector = collapse_whitespace(last_segment(&rest[..open]));
        let after = &rest[open + 1..];
        let close = after.find('}').unwrap_or(after.len());
        let body = &after[..close];

        for decl in body.split(';') {
            let Some((name, value)) = decl.split_once(':') else {
                continue;
            };
            let name = name.trim();
            if let Some(stripped) = name.strip_prefix("--") {
                decls.push(VarDecl {
                    selector: selector.clone(),
                    name: stripped.to_string(),
                    value: collapse_whitespace(value),
                });
            }
        }

        rest = if close < after.len() { &after[close + 1..] } else { "" };
    }

    decls
}

/// Selector text after the last `}` or `{` left over from nested blocks.
fn last_segment(text: &str) -> &str {
    match text.rfind(['}', '{']) {
        Some(idx) => &text[idx + 1..],
        None => text,
    }
}

/// True for a bare `"<deg> <pct>% <pct>%"` triplet (decimals allowed).
pub fn is_bare_hsl_triplet(value: &str) -> bool {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 3 {
        return false;
    }
    is_number(parts[0])
        && parts[1..]
            .iter()
            .all(|p| p.strip_suffix('%').is_some_and(is_number))
}

fn is_number(text: &str) -> bool {
    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in text.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a /* x */ b /* y"), "a  b ");
        assert_eq!(strip_comments("no comments"), "no comments");
    }

    #[test]
    fn test_custom_properties_tracks_selector() {
        let css = ":root {\n  --primary: #fff;\n  color: red;\n}\n.dark { --primary: #000 }";
        let decls = custom_properties(css);
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].selector, ":root");
        assert_eq!(decls[0].name, "primary");
        assert_eq!(decls[0].value, "#fff");
        assert_eq!(decls[1].selector, ".dark");
        assert_eq!(decls[1].value, "#000");
    }

    #[test]
    fn test_bare_triplet_detection() {
        assert!(is_bare_hsl_triplet("0 0% 100%"));
        assert!(is_bare_hsl_triplet("222.2 84% 4.9%"));
        assert!(!is_bare_hsl_triplet("hsl(0 0% 100%)"));
        assert!(!is_bare_hsl_triplet("0 0 100%"));
        assert!(!is_bare_hsl_triplet("0.5rem"));
    }
}
