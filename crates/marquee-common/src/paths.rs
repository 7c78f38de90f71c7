//! Path utilities for detecting video files and entries the scanner skips.

use std::path::Path;

/// List of supported video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "mov", "m4v", "avi", "wmv", "ts", "m2ts", "webm",
];

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use marquee_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("movie.mkv")));
/// assert!(is_video_file(Path::new("/path/to/video.M2TS")));
/// assert!(!is_video_file(Path::new("subtitle.srt")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Whether a directory entry name is hidden (dot-prefixed).
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// File name without its extension, or the whole name when it has none.
///
/// ```
/// use marquee_common::paths::file_stem_lossy;
/// use std::path::Path;
///
/// assert_eq!(file_stem_lossy(Path::new("/a/Show.S01E02.mkv")), "Show.S01E02");
/// ```
pub fn file_stem_lossy(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
