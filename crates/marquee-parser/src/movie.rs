//! Title and year extraction for movie-like names.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::{clean_movie_name, collapse_whitespace};
use crate::types::MovieIdentity;

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("valid year pattern"));

/// Split a cleaned name at its release year.
///
/// The first year token wins and the text before it is the title. When
/// nothing precedes it, a later year token is the release year and the
/// leading number belongs to the title (`"1917 2019"` is the film *1917*
/// from 2019). A leading year with no later one takes the text after it as
/// the title, or the year text itself when nothing follows.
pub(crate) fn parse(name: &str) -> MovieIdentity {
    let cleaned = clean_movie_name(name);

    let mut years = YEAR.find_iter(&cleaned);
    let Some(first) = years.next() else {
        return MovieIdentity {
            title: cleaned,
            year: None,
        };
    };

    let leading_is_empty = cleaned[..first.start()].trim().is_empty();
    let (chosen, title) = match years.next() {
        Some(second) if leading_is_empty => (second, collapse_whitespace(&cleaned[..second.start()])),
        None if leading_is_empty => (first, collapse_whitespace(&cleaned[first.end()..])),
        _ => (first, collapse_whitespace(&cleaned[..first.start()])),
    };

    let year = chosen.as_str().parse::<u16>().ok();
    let title = if title.is_empty() {
        chosen.as_str().to_string()
    } else {
        title
    };

    MovieIdentity { title, year }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(name: &str) -> (String, Option<u16>) {
        let m = parse(name);
        (m.title, m.year)
    }

    #[test]
    fn test_folder_with_parenthesized_year() {
        assert_eq!(split("Heat (1995)"), ("Heat".into(), Some(1995)));
        assert_eq!(split("Heat [1995] 1080p"), ("Heat".into(), Some(1995)));
    }

    #[test]
    fn test_dotted_release_name() {
        assert_eq!(
            split("Blade.Runner.1982.Final.Cut.2160p"),
            ("Blade Runner".into(), Some(1982))
        );
    }

    #[test]
    fn test_no_year_keeps_whole_title() {
        assert_eq!(
            split("Comedian.Live.At.The.Hall"),
            ("Comedian Live At The Hall".into(), None)
        );
    }

    #[test]
    fn test_resolution_is_not_a_year() {
        assert_eq!(split("Some.Movie.1080p"), ("Some Movie 1080p".into(), None));
        assert_eq!(split("Some.Movie.2160p.x265"), ("Some Movie 2160p x265".into(), None));
    }

    #[test]
    fn test_year_out_of_range_is_title_text() {
        assert_eq!(split("Space.1899.Edition"), ("Space 1899 Edition".into(), None));
        assert_eq!(split("Odyssey.2150"), ("Odyssey 2150".into(), None));
    }

    #[test]
    fn test_numeric_title_followed_by_year() {
        assert_eq!(split("1917.2019.1080p.BluRay"), ("1917".into(), Some(2019)));
        assert_eq!(split("2012 (2009)"), ("2012".into(), Some(2009)));
    }

    #[test]
    fn test_lone_leading_year() {
        assert_eq!(split("1984"), ("1984".into(), Some(1984)));
    }

    #[test]
    fn test_leading_year_takes_following_text() {
        assert_eq!(
            split("2021 Comedy Special"),
            ("Comedy Special".into(), Some(2021))
        );
        assert_eq!(
            split("2019.Comedian.Live.At.The.Hall"),
            ("Comedian Live At The Hall".into(), Some(2019))
        );
    }

    #[test]
    fn test_first_year_wins() {
        assert_eq!(
            split("Blade Runner 2049 2017 REMUX"),
            ("Blade Runner".into(), Some(2049))
        );
    }
}
