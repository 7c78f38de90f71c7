//! Season/episode extraction for episode file names.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::clean_episode_name;
use crate::types::EpisodeIdentity;

static SEASON_EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bS\s*(\d{1,2})\s*[.\-_ ]*E\s*(\d{1,2})\b")
        .expect("valid season/episode pattern")
});

/// Tokens that end the free-text episode title.
const QUALITY_TOKENS: &[&str] = &[
    "2160P", "1080P", "720P", "480P", "4K", "UHD", "WEB", "WEBRIP", "WEB-DL", "WEBDL", "BLURAY",
    "BDRIP", "BRRIP", "HDTV", "DVDRIP", "X264", "X265", "H264", "H265", "HEVC", "AMZN", "HDR",
    "10BIT", "REPACK", "PROPER",
];

pub(crate) fn parse(name: &str) -> Option<EpisodeIdentity> {
    let cleaned = clean_episode_name(name);
    let caps = SEASON_EPISODE.captures(&cleaned)?;

    let marker = caps.get(0)?;
    let season = caps.get(1)?.as_str().parse().ok()?;
    let episode = caps.get(2)?.as_str().parse().ok()?;

    let show = trim_separators(&cleaned[..marker.start()]).to_string();
    let episode_title = trim_separators(&cleaned[marker.end()..])
        .split_whitespace()
        .take_while(|token| !is_quality_token(token))
        .collect::<Vec<_>>()
        .join(" ");

    Some(EpisodeIdentity {
        show,
        season,
        episode,
        episode_title,
    })
}

fn trim_separators(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '-')
}

/// A token such as `1080p`, `WEBRip` or `x264-GROUP` (matched before the hyphen).
fn is_quality_token(token: &str) -> bool {
    let upper = token.to_ascii_uppercase();
    if QUALITY_TOKENS.contains(&upper.as_str()) {
        return true;
    }
    upper
        .split('-')
        .next()
        .is_some_and(|head| !head.is_empty() && QUALITY_TOKENS.contains(&head))
}
