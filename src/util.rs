// Utility helpers for cleaning text fields and basic statistics.
//
// This module centralizes the "dirty" CSV text handling so the rest of the
// code can assume a field is either a usable trimmed value or `None`.
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Tokens that stand in for "no value" in exported directories. Compared
/// case-insensitively after trimming.
static PLACEHOLDERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "n/a",
        "na",
        "none",
        "null",
        "nan",
        "-",
        "no email",
        "no website",
    ]
    .into_iter()
    .collect()
});

/// Characters that separate service tags inside the `keywords` column.
pub const KEYWORD_DELIMITERS: &[char] = &[',', ';', '|'];

pub fn is_placeholder(s: &str) -> bool {
    PLACEHOLDERS.contains(s.to_lowercase().as_str())
}

/// Normalize a raw CSV cell into a present value.
///
/// - Accepts `Option<&str>` so callers can pass through absent columns.
/// - Trims surrounding whitespace, keeps inner whitespace and case.
/// - Returns `None` for empty, whitespace-only and placeholder values.
pub fn clean_field(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() || is_placeholder(s) {
        return None;
    }
    Some(s.to_string())
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key for uniqueness and duplicate checks: trimmed,
/// whitespace-collapsed and lowercased.
pub fn fold_key(s: &str) -> String {
    collapse_whitespace(s).to_lowercase()
}

/// Split a keyword field into normalized service tokens.
///
/// Tokens are split on [`KEYWORD_DELIMITERS`], folded with [`fold_key`] and
/// empty tokens are dropped. Duplicates are kept; callers decide whether they
/// count occurrences or distinct services.
pub fn tokenize_keywords(s: &str) -> Vec<String> {
    s.split(KEYWORD_DELIMITERS)
        .map(fold_key)
        .filter(|t| !t.is_empty())
        .collect()
}

/// `part / total * 100`, or 0 when `total` is zero.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

pub fn round_to(v: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (v * factor).round() / factor
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale-aware thousands separators (`1,234.5`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = parts.next() {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
