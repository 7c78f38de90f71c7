//! Fixture tests for marquee-parser.
//!
//! Each fixture file holds real-world names and the identity the parser is
//! expected to recover from them.

use marquee_parser::{parse_episode, parse_movie, EpisodeIdentity, MovieIdentity};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Case<T> {
    input: String,
    expected: T,
}

#[derive(Debug, Deserialize)]
struct ExpectedMovie {
    title: String,
    year: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct ExpectedEpisode {
    show: String,
    season: u32,
    episode: u32,
    episode_title: String,
}

fn load<T: serde::de::DeserializeOwned>(raw: &str) -> Vec<Case<T>> {
    serde_json::from_str(raw).expect("fixture file is valid JSON")
}

#[test]
fn movie_fixtures() {
    let cases: Vec<Case<ExpectedMovie>> = load(include_str!("fixtures/movies.json"));
    let mut failures = Vec::new();

    for case in &cases {
        let actual = parse_movie(&case.input);
        let expected = MovieIdentity {
            title: case.expected.title.clone(),
            year: case.expected.year,
        };
        if actual != expected {
            failures.push(format!("{:?}: got {:?}, want {:?}", case.input, actual, expected));
        }
    }

    assert!(failures.is_empty(), "movie fixtures failed:\n{}", failures.join("\n"));
}

#[test]
fn episode_fixtures() {
    let cases: Vec<Case<ExpectedEpisode>> = load(include_str!("fixtures/episodes.json"));
    let mut failures = Vec::new();

    for case in &cases {
        let expected = EpisodeIdentity {
            show: case.expected.show.clone(),
            season: case.expected.season,
            episode: case.expected.episode,
            episode_title: case.expected.episode_title.clone(),
        };
        match parse_episode(&case.input) {
            Some(actual) if actual == expected => {}
            other => failures.push(format!("{:?}: got {:?}, want {:?}", case.input, other, expected)),
        }
    }

    assert!(failures.is_empty(), "episode fixtures failed:\n{}", failures.join("\n"));
}

#[test]
fn zero_padding_does_not_matter() {
    for name in ["Show S01E02", "Show S1E2", "Show s01e2", "Show S1E02"] {
        let ep = parse_episode(name).unwrap();
        assert_eq!((ep.season, ep.episode), (1, 2), "{name}");
    }
}

#[test]
fn non_episode_names_are_skipped() {
    for name in ["Extras", "Show.Name.Season.1", "Movie.2019.1080p", "Sample"] {
        assert!(parse_episode(name).is_none(), "{name}");
    }
}
