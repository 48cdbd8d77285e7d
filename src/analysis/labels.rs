//! Category label helpers

/// Canonical form stored in results: trimmed and lower-cased, separators kept.
pub fn canonical_category(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Comparison key for category labels.
///
/// Lower-cases, turns `/` and `_` into spaces and collapses whitespace, so
/// `"Sexual_Content"`, `"sexual content"` and `"SEXUAL/CONTENT"` share a key.
pub fn normalize_label(label: &str) -> String {
    let replaced: String = label
        .chars()
        .map(|c| if c == '/' || c == '_' { ' ' } else { c })
        .collect();
    replaced
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether two provider labels name the same category.
pub fn labels_match(a: &str, b: &str) -> bool {
    normalize_label(a) == normalize_label(b)
}

/// Human-readable label for a canonical category.
///
/// `"sexual_explicit"` becomes `"Sexual Explicit"`, `"hate/threatening"`
/// becomes `"Hate Threatening"`, `"self-harm"` becomes `"Self-Harm"`.
pub fn humanize_category(category: &str) -> String {
    let mut out = String::with_capacity(category.len());
    let mut at_word_start = true;
    for c in category.chars() {
        let c = if c == '/' || c == '_' { ' ' } else { c };
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
