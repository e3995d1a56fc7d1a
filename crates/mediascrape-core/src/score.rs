//! Query text normalization and title similarity scoring.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Characters that never contribute to a title match.
#[allow(clippy::expect_used)]
static NON_SEARCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{L}\p{N}]+").expect("failed to compile non-search character regex")
});

/// Normalizes text for comparison.
///
/// Decomposes and strips diacritics, lowercases, and collapses every run of
/// non alphanumeric characters to a single space.
#[must_use]
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    NON_SEARCH_RE.replace_all(&folded, " ").trim().to_owned()
}

/// Similarity of `query` and `title` in `0.0..=1.0`.
///
/// Equal normalized strings score 1.0. Containment scores between 0.7 and
/// 1.0 depending on the length ratio. Anything else is the word overlap.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn similarity(query: &str, title: &str) -> f64 {
    let a = normalize(query);
    let b = normalize(title);

    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    if a.contains(&b) || b.contains(&a) {
        let (a_len, b_len) = (a.chars().count(), b.chars().count());
        let ratio = a_len.min(b_len) as f64 / a_len.max(b_len) as f64;
        return ratio.mul_add(0.3, 0.7);
    }

    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();
    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }
    words_a.intersection(&words_b).count() as f64 / union as f64
}
