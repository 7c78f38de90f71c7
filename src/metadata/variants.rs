//! Query-variant generation for provider searches.
//!
//! A parsed title is turned into an ordered list of [`SearchAttempt`]s. The
//! resolver tries them in order and stops at the first accepted match.

use std::collections::HashSet;
use std::sync::LazyLock;

use marquee_common::YearPolicy;
use regex::Regex;

static DOTS_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[._]+").expect("valid separator pattern"));
static PUNCT_KEEP_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s:]").expect("valid punctuation pattern"));
static PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static YEAR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("valid year pattern"));
static TRAILING_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[.\s]*\b(19\d{2}|20\d{2})\b\s*$").expect("valid trailing year pattern")
});
static PAREN_YEAR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d{4}\)\s*$").expect("valid paren year pattern"));
static BARE_YEAR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b\s*$").expect("valid year suffix pattern"));

/// One provider query: text plus an optional year filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAttempt {
    pub query: String,
    pub year: Option<u16>,
}

impl SearchAttempt {
    fn new(query: impl Into<String>, year: Option<u16>) -> Self {
        Self {
            query: query.into(),
            year,
        }
    }
}

fn collapse(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Remove colons and collapse whitespace. Used as the last-resort query.
fn colonless(s: &str) -> String {
    collapse(&s.replace(':', " "))
}

fn text_variants(base: &str) -> Vec<String> {
    vec![
        base.to_string(),
        DOTS_UNDERSCORES.replace_all(base, " ").into_owned(),
        PUNCT_KEEP_COLON.replace_all(base, " ").trim().to_string(),
    ]
}

/// `"A B"` becomes `"A: B"` and `"A B C"` becomes `"A B: C"`.
///
/// Longer titles get no colon variant.
fn colon_variant(base: &str) -> Option<String> {
    if base.contains(':') {
        return None;
    }
    let words: Vec<&str> = base.split_whitespace().collect();
    match words.as_slice() {
        [a, b] => Some(format!("{a}: {b}")),
        [a, b, c] => Some(format!("{a} {b}: {c}")),
        _ => None,
    }
}

/// Drop empty queries and repeats of `(lower-cased query, year)`, keeping order.
fn dedup(attempts: Vec<SearchAttempt>) -> Vec<SearchAttempt> {
    let mut seen = HashSet::new();
    attempts
        .into_iter()
        .filter(|a| !a.query.trim().is_empty())
        .filter(|a| seen.insert((a.query.to_lowercase(), a.year)))
        .collect()
}

/// Attempts for a movie, stand-up special, or documentary.
pub fn movie_attempts(title: &str, year: Option<u16>, policy: YearPolicy) -> Vec<SearchAttempt> {
    let mut attempts = Vec::new();

    match policy {
        YearPolicy::YearAware => {
            let variants = text_variants(title);
            if let Some(y) = year {
                let sweep = [
                    Some(y),
                    y.checked_sub(1),
                    y.checked_add(1),
                    y.checked_sub(2),
                    y.checked_add(2),
                ];
                for y in sweep.into_iter().flatten() {
                    attempts.extend(variants.iter().map(|v| SearchAttempt::new(v.as_str(), Some(y))));
                }
            }
            attempts.extend(variants.iter().map(|v| SearchAttempt::new(v.as_str(), None)));
            attempts.push(SearchAttempt::new(colonless(title), None));
        }
        YearPolicy::YearForcedOff => {
            let base = collapse(&YEAR_TOKEN.replace_all(title, ""));
            let mut variants = text_variants(&base);
            variants.extend(colon_variant(&base));
            attempts.extend(variants.into_iter().map(|v| SearchAttempt::new(v, None)));
            attempts.push(SearchAttempt::new(colonless(&base), None));
        }
    }

    dedup(attempts)
}

/// Drop a year at the end of a show title (`"Show 2019"`, `"Show.2019"`).
pub fn strip_trailing_year(title: &str) -> String {
    TRAILING_YEAR.replace(title, "").trim().to_string()
}

/// Normalize a show title for searching: separators to spaces, a trailing
/// `(YYYY)` or bare year removed, punctuation to spaces.
pub fn normalize_for_search(title: &str) -> String {
    let spaced = title.replace(['.', '_'], " ");
    let no_paren = PAREN_YEAR_SUFFIX.replace(&spaced, "");
    let no_year = BARE_YEAR_SUFFIX.replace(&no_paren, "");
    collapse(&PUNCT.replace_all(&no_year, " "))
}

/// Attempts for a TV show. Show searches are always yearless.
pub fn show_attempts(title: &str) -> Vec<SearchAttempt> {
    let stripped = strip_trailing_year(title);
    let attempts = [
        title.trim().to_string(),
        stripped.clone(),
        normalize_for_search(title),
        normalize_for_search(&stripped),
    ]
    .into_iter()
    .map(|q| SearchAttempt::new(q, None))
    .collect();

    dedup(attempts)
}
