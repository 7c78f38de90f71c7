//! Separator and punctuation normalization shared by the parsers.

use std::sync::LazyLock;

use regex::Regex;

static MOVIE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()\[\]{}_+]+").expect("valid movie punctuation pattern"));

static BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()\[\]{}]+").expect("valid bracket pattern"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// ```
/// use marquee_parser::normalize::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  The   Movie \t"), "The Movie");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Normalize a movie-like folder or file name.
///
/// Dots become spaces, runs of brackets, underscores and plus signs become a
/// single space, and whitespace is collapsed.
pub fn clean_movie_name(name: &str) -> String {
    let dotless = name.replace('.', " ");
    collapse_whitespace(&MOVIE_PUNCT.replace_all(&dotless, " "))
}

/// Normalize an episode file name.
///
/// Underscores and dots become spaces, brackets are removed, and whitespace
/// is collapsed. Hyphens are kept so `x264-GROUP` stays one token.
pub fn clean_episode_name(name: &str) -> String {
    let spaced = name.replace(['_', '.'], " ");
    collapse_whitespace(&BRACKETS.replace_all(&spaced, " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_movie_name() {
        assert_eq!(clean_movie_name("The.Movie.(2019)"), "The Movie 2019");
        assert_eq!(clean_movie_name("Some_Movie_[2021]+extra"), "Some Movie 2021 extra");
        assert_eq!(clean_movie_name("Plain Title"), "Plain Title");
        assert_eq!(clean_movie_name(" ..Spaced.. "), "Spaced");
    }

    #[test]
    fn test_clean_episode_name_keeps_hyphens() {
        assert_eq!(
            clean_episode_name("Show_Name.S01E02.x264-GRP"),
            "Show Name S01E02 x264-GRP"
        );
        assert_eq!(clean_episode_name("[Group] Show (2010)"), "Group Show 2010");
    }
}
