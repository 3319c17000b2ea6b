//! Export-name normalization.

/// Lowercase `name` and collapse each run of spaces or underscores into `-`
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for ch in name.chars() {
        if ch == ' ' || ch == '_' {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            in_separator = false;
        }
    }
    out
}
