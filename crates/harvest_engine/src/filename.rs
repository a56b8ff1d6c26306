/// Deterministic, filesystem-safe artifact stem: `{stock}_{sanitized title}`.
///
/// Illegal filename characters are stripped outright rather than replaced,
/// so the stem stays close to the natural key (stock name, title). Two
/// reports sharing that key within one run overwrite each other; duplicate
/// keys are not expected within a single day's listing.
pub fn artifact_stem(stock_name: &str, title: &str) -> String {
    let stem = format!("{}_{}", sanitize(stock_name), sanitize(title));
    let stem = stem.trim_matches('_').to_string();
    if stem.is_empty() {
        "report".to_string()
    } else {
        stem
    }
}

fn sanitize(input: &str) -> String {
    let cleaned: String = input.chars().filter(|c| !is_forbidden(*c)).collect();
    let cleaned = cleaned.trim_matches(&[' ', '.'][..]);
    // Keep stems short enough for any filesystem; titles can run long.
    // Truncation counts chars, not bytes: titles are mostly Hangul.
    if cleaned.chars().count() > 80 {
        cleaned.chars().take(80).collect()
    } else {
        cleaned.to_string()
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
