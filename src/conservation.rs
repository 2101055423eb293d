//! Conservation status strings and their bracketed IUCN codes.
//!
//! The API reports conservation status as a human-readable label with the
//! IUCN code embedded in parentheses: `"Vulnerable (VU)"`,
//! `"En peligro crítico (CR)"`. Cards, badges and the status filter all need
//! the code on its own, so the parsing lives here.

/// Statuses offered by the status filter, in severity order.
pub const STATUSES: [&str; 9] = [
    "Preocupación menor (LC)",
    "Casi amenazada (NT)",
    "Vulnerable (VU)",
    "En peligro (EN)",
    "En peligro crítico (CR)",
    "Extinta en estado silvestre (EW)",
    "Extinta (EX)",
    "Datos insuficientes (DD)",
    "No evaluado (NE)",
];

/// Result of parsing a status string like `"Vulnerable (VU)"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatus {
    /// Label without the bracketed code, trimmed. For strings without a code
    /// this is the whole input, trimmed.
    pub label: String,
    /// Lowercase code from the last `(...)` group, if it holds one word.
    pub code: Option<String>,
}

/// Parse a status string.
///
/// - `"Vulnerable (VU)"` → label="Vulnerable", code=Some("vu")
/// - `"En peligro (EN)"` → label="En peligro", code=Some("en")
/// - `"Vulnerable"` → label="Vulnerable", code=None
/// - `"Raro (?)"` → label="Raro (?)", code=None
pub fn parse_status(status: &str) -> ParsedStatus {
    let trimmed = status.trim();
    if let Some(open) = trimmed.rfind('(') {
        let rest = &trimmed[open + 1..];
        if let Some(close) = rest.find(')') {
            let code = rest[..close].trim();
            if !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric()) {
                return ParsedStatus {
                    label: trimmed[..open].trim().to_string(),
                    code: Some(code.to_ascii_lowercase()),
                };
            }
        }
    }
    ParsedStatus {
        label: trimmed.to_string(),
        code: None,
    }
}

/// Lowercase bracketed code of a status string, if any.
pub fn status_code(status: &str) -> Option<String> {
    parse_status(status).code
}

/// Whether a filter value names a bare code (`"vu"`, `"EN"`) rather than a
/// full status label.
pub fn is_bare_code(value: &str) -> bool {
    let v = value.trim();
    (1..=3).contains(&v.len()) && v.chars().all(|c| c.is_ascii_alphabetic())
}

/// Short badge label for a lowercase code. Unknown codes get a generic label.
pub fn badge_label(code: &str) -> &'static str {
    match code {
        "lc" => "Preocupación menor",
        "nt" => "Casi amenazado",
        "vu" => "Vulnerable",
        "en" => "En peligro",
        "cr" => "Peligro crítico",
        "ew" => "Extinto en estado silvestre",
        "ex" => "Extinto",
        "dd" => "Datos insuficientes",
        "ne" => "No evaluado",
        _ => "Estado",
    }
}
