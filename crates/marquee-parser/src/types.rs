//! Output types for the identity parser.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Title and release year parsed from a movie, special, or documentary name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MovieIdentity {
    /// Whitespace-collapsed title text preceding the year token.
    pub title: String,

    /// Release year (1900--2099), if a year token was found.
    pub year: Option<u16>,
}

/// Show, season, and episode parsed from an episode file name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpisodeIdentity {
    /// Show name preceding the `SxxEyy` marker. May be empty.
    pub show: String,

    /// Season number.
    pub season: u32,

    /// Episode number within the season.
    pub episode: u32,

    /// Best-effort episode title taken from the text after the marker, up to
    /// the first quality token. Empty when the name carries none.
    pub episode_title: String,
}
