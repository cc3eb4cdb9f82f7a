//! Cheap heuristics that catch obviously broken source before it is saved.
//!
//! These checks never block a save; the editor only logs the report.

/// Findings of [`validate_code`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Checks `code` for unclosed JSX attribute quotes and unbalanced angle brackets.
pub fn validate_code(code: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    if code.trim().is_empty() {
        report.errors.push("Code must be a non-empty string".to_string());
        return report;
    }

    if has_unclosed_attribute_quote(code) {
        report
            .errors
            .push("Found unclosed quotes in JSX attributes (check defaultValue and other attributes)".to_string());
    }

    let opening = code.matches('<').count();
    let closing = code.matches('>').count();
    if opening != closing {
        report.warnings.push(format!(
            "Possible mismatched brackets ({} < vs {} >)",
            opening, closing
        ));
    }

    report
}

/// Looks for `name=">` or `name='>` inside a tag: an attribute whose quote is
/// immediately followed by the tag's closing bracket.
fn has_unclosed_attribute_quote(code: &str) -> bool {
    let bytes = code.as_bytes();
    for (i, window) in bytes.windows(3).enumerate() {
        let quote = window[1];
        if window[0] != b'=' || (quote != b'"' && quote != b'\'') {
            continue;
        }
        let rest = &code[i + 2..];
        let after_ws = rest.trim_start();
        if !after_ws.starts_with('>') {
            continue;
        }
        // The attribute name must be preceded by whitespace inside an open tag.
        let before = &code[..i];
        let name_start = before
            .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .map_or(0, |p| p + 1);
        if name_start == i || name_start == 0 {
            continue;
        }
        let preceding = before[..name_start].chars().last();
        let inside_tag = before.rfind('<').is_some_and(|lt| before.rfind('>').map_or(true, |gt| gt < lt));
        if preceding.is_some_and(char::is_whitespace) && inside_tag {
            return true;
        }
    }
    false
}
