//! marquee-parser: identity parser for loosely named media files.
//!
//! Turns folder and file names such as `"The.Movie.2019.1080p.BluRay.x264-GROUP"`
//! or `"Show.Name.S01E02.WEBRip"` into the identity used to query the metadata
//! provider.
//!
//! # Quick start
//!
//! ```
//! use marquee_parser::{parse_episode, parse_movie};
//!
//! let movie = parse_movie("The.Movie.2019.1080p.BluRay.x264-GROUP");
//! assert_eq!(movie.title, "The Movie");
//! assert_eq!(movie.year, Some(2019));
//!
//! let ep = parse_episode("Show.Name.S01E02.WEBRip").unwrap();
//! assert_eq!(ep.show, "Show Name");
//! assert_eq!((ep.season, ep.episode), (1, 2));
//! ```

mod episode;
mod movie;
pub mod normalize;
pub mod types;

pub use types::{EpisodeIdentity, MovieIdentity};

/// Parse a movie-like name into a title and optional release year.
///
/// Never fails: a name without a year token becomes the whole title.
pub fn parse_movie(name: &str) -> MovieIdentity {
    movie::parse(name)
}

/// Parse an episode file name (without extension).
///
/// Returns `None` when the name carries no `SxxEyy` marker; callers treat
/// that as "not an episode" and skip the file.
pub fn parse_episode(name: &str) -> Option<EpisodeIdentity> {
    episode::parse(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie_scene_release() {
        let m = parse_movie("The.Movie.2019.1080p.BluRay.x264-GROUP");
        assert_eq!(m.title, "The Movie");
        assert_eq!(m.year, Some(2019));
    }

    #[test]
    fn test_parse_episode_scene_release() {
        let e = parse_episode("Show.Name.S01E02.WEBRip").unwrap();
        assert_eq!(e.show, "Show Name");
        assert_eq!(e.season, 1);
        assert_eq!(e.episode, 2);
        assert_eq!(e.episode_title, "");
    }

    #[test]
    fn test_movie_name_is_not_an_episode() {
        assert!(parse_episode("The.Movie.2019.1080p.BluRay.x264-GROUP").is_none());
    }
}
