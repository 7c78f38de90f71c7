//! Candidate scoring for provider search results.
//!
//! `score = jaccard(tokens) + year term + poster bonus + colon bonus`. The
//! best of the first ten candidates wins; ties keep the earlier candidate,
//! so provider order matters.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::provider::SearchResult;

/// Candidates beyond this position are ignored.
pub const MAX_CANDIDATES: usize = 10;

const POSTER_BONUS: f64 = 0.05;
const COLON_BONUS: f64 = 0.08;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid non-word pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static LEADING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(the|a|an)\s+").expect("valid article pattern"));

/// Lower-case, turn punctuation into spaces, collapse whitespace and drop one
/// leading article.
pub fn normalize_title(title: &str) -> String {
    let lower = title.to_lowercase();
    let spaced = NON_WORD.replace_all(&lower, " ");
    let collapsed = WHITESPACE.replace_all(&spaced, " ");
    LEADING_ARTICLE
        .replace(collapsed.trim(), "")
        .into_owned()
}

pub fn token_set(title: &str) -> BTreeSet<String> {
    normalize_title(title)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Token-set Jaccard similarity with the union floored at one.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let (a, b) = (token_set(a), token_set(b));
    let inter = a.intersection(&b).count();
    let union = a.union(&b).count().max(1);
    inter as f64 / union as f64
}

pub fn year_term(query_year: Option<u16>, candidate_year: Option<u16>) -> f64 {
    match (query_year, candidate_year) {
        (Some(q), Some(c)) => match q.abs_diff(c) {
            0 => 0.25,
            1 => 0.18,
            2 => 0.10,
            _ => -0.10,
        },
        _ => 0.0,
    }
}

fn colon_bonus(query: &str, candidate: &str) -> f64 {
    let q = normalize_title(query).replace(':', "");
    let c = normalize_title(candidate).replace(':', "");
    if c.contains(&q) || q.contains(&c) {
        COLON_BONUS
    } else {
        0.0
    }
}

/// Score one candidate against the query identity.
pub fn score(query_title: &str, query_year: Option<u16>, candidate: &SearchResult) -> f64 {
    let poster = if candidate.has_poster() { POSTER_BONUS } else { 0.0 };
    jaccard(query_title, &candidate.title)
        + year_term(query_year, candidate.year)
        + poster
        + colon_bonus(query_title, &candidate.title)
}

/// Pick the highest scoring of the first [`MAX_CANDIDATES`] candidates.
///
/// Only a strictly greater score replaces the current best. Returns `None`
/// only when `candidates` is empty.
pub fn pick_best<'a>(
    query_title: &str,
    query_year: Option<u16>,
    candidates: &'a [SearchResult],
) -> Option<&'a SearchResult> {
    let mut best: Option<(&SearchResult, f64)> = None;

    for candidate in candidates.iter().take(MAX_CANDIDATES) {
        let s = score(query_title, query_year, candidate);
        debug!(
            query = query_title,
            candidate = %candidate.title,
            year = ?candidate.year,
            score = format_args!("{s:.3}"),
            poster = candidate.has_poster(),
            "Scored candidate"
        );
        if best.map_or(true, |(_, top)| s > top) {
            best = Some((candidate, s));
        }
    }

    if let Some((picked, s)) = best {
        debug!(
            title = %picked.title,
            provider_id = picked.id,
            score = format_args!("{s:.3}"),
            "Picked candidate"
        );
    }
    best.map(|(picked, _)| picked)
}
