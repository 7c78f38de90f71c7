//! Core type definitions for library categories.
//!
//! A marquee library is split into four categories, each rooted at its own
//! directory. Movie-like categories share a scanner and cache layout but differ
//! in how the release year takes part in provider searches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Library category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Feature films.
    Movies,
    /// Stand-up comedy specials.
    Standup,
    /// Documentaries.
    Documentary,
    /// Episodic TV shows.
    Shows,
}

/// How the parsed release year is used when searching the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearPolicy {
    /// Sweep the parsed year and its neighbours before falling back to yearless searches.
    YearAware,
    /// Never send a year; strip year tokens from the query text.
    YearForcedOff,
}

impl Category {
    /// All movie-like categories in the order the pipeline processes them.
    pub const MOVIE_LIKE: [Category; 3] =
        [Category::Movies, Category::Standup, Category::Documentary];

    /// Prefix for entry ids assigned during a scan (`m1`, `s1`, `d1`, `tv1`).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Movies => "m",
            Self::Standup => "s",
            Self::Documentary => "d",
            Self::Shows => "tv",
        }
    }

    /// Stem used for output and cache file names.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::Standup => "standup",
            Self::Documentary => "docs",
            Self::Shows => "shows",
        }
    }

    /// Year policy for provider searches.
    ///
    /// Specials and documentaries are frequently released under the wrong
    /// year, so their searches are always yearless.
    pub fn year_policy(&self) -> YearPolicy {
        match self {
            Self::Movies | Self::Shows => YearPolicy::YearAware,
            Self::Standup | Self::Documentary => YearPolicy::YearForcedOff,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movies => write!(f, "movies"),
            Self::Standup => write!(f, "standup"),
            Self::Documentary => write!(f, "documentary"),
            Self::Shows => write!(f, "shows"),
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movies" | "movie" => Ok(Self::Movies),
            "standup" => Ok(Self::Standup),
            "documentary" | "docs" => Ok(Self::Documentary),
            "shows" | "tv" => Ok(Self::Shows),
            other => Err(Error::invalid_input(format!("unknown category: {other}"))),
        }
    }
}
