//! Human-readable formatting for sizes and runtimes.

const KIB: u64 = 1024;

/// Units from largest to smallest, 1024-based.
const UNITS: &[(&str, u64)] = &[
    ("tb", KIB * KIB * KIB * KIB),
    ("gb", KIB * KIB * KIB),
    ("mb", KIB * KIB),
    ("kb", KIB),
];

/// Render a byte count with a lowercase unit suffix.
///
/// Values below 10 keep one decimal; larger values are rounded to an integer.
/// Anything under one kibibyte renders as `"0b"`.
///
/// ```
/// use marquee_common::format::format_size;
///
/// assert_eq!(format_size(1_500_000_000), "1.4gb");
/// assert_eq!(format_size(10 * 1024 * 1024 * 1024), "10gb");
/// assert_eq!(format_size(512), "0b");
/// ```
pub fn format_size(bytes: u64) -> String {
    for (name, base) in UNITS {
        if bytes >= *base {
            let value = bytes as f64 / *base as f64;
            return if value >= 10.0 {
                format!("{}{name}", value.round_ties_even() as u64)
            } else {
                format!("{value:.1}{name}")
            };
        }
    }
    "0b".to_string()
}

/// Render a runtime in minutes as `"1h 52m"` or `"45m"`.
///
/// Returns `None` for a missing or zero runtime.
pub fn format_runtime(minutes: Option<u32>) -> Option<String> {
    let minutes = minutes.filter(|m| *m > 0)?;
    let (hours, rest) = (minutes / 60, minutes % 60);
    Some(if hours > 0 {
        format!("{hours}h {rest}m")
    } else {
        format!("{rest}m")
    })
}
