//! Marquee-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across marquee:
//!
//! - **Categories**: The four library categories and their per-category policies
//! - **Id Sequences**: Monotonic `m1`, `m2`, ... identifiers assigned during a scan
//! - **Path Utilities**: Video extension detection and hidden-entry checks
//! - **Formatting**: Byte-size and runtime rendering used in summaries
//! - **Error Handling**: Common error type
//!
//! # Examples
//!
//! ```
//! use marquee_common::{Category, IdSequence};
//! use marquee_common::format::format_size;
//! use marquee_common::paths::is_video_file;
//! use std::path::Path;
//!
//! let mut ids = IdSequence::for_category(Category::Movies);
//! assert_eq!(ids.next_id(), "m1");
//!
//! assert!(is_video_file(Path::new("movie.mkv")));
//! assert_eq!(format_size(1_500_000_000), "1.4gb");
//! ```

pub mod error;
pub mod format;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::Error;
pub use ids::IdSequence;
pub use types::*;
