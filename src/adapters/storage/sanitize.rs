//! Artifact file naming
//!
//! Dashboard names become file names and object keys, so characters that are
//! illegal on common filesystems are replaced before anything is written.

use regex::Regex;
use std::sync::LazyLock;

/// Longest sanitized stem, in characters
pub const FILENAME_MAX_LENGTH: usize = 200;

/// Stem used when nothing survives sanitation
pub const FALLBACK_NAME: &str = "unnamed_dashboard";

/// Artifact file extension
pub const ARTIFACT_EXTENSION: &str = "qs";

static RESERVED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("reserved character pattern is valid"));

static CONTROL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x1f\x7f-\x9f]").expect("control character pattern is valid")
});

fn trim_edges(s: &str) -> &str {
    s.trim_matches(|c| c == ' ' || c == '.')
}

/// Makes a name safe for use as a file name stem
///
/// Reserved and control characters become `_`, leading and trailing spaces
/// and dots are removed, and the result is capped at
/// [`FILENAME_MAX_LENGTH`] characters. Idempotent; a cut that lands just
/// after a space or dot yields a shorter stem.
///
/// # Examples
///
/// ```
/// use qsvault::adapters::storage::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Q1: Sales/Ops"), "Q1_ Sales_Ops");
/// assert_eq!(sanitize_filename(" .. "), "unnamed_dashboard");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let replaced = RESERVED_CHARS.replace_all(name, "_");
    let replaced = CONTROL_CHARS.replace_all(&replaced, "_");

    let trimmed = trim_edges(&replaced);
    if trimmed.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    if trimmed.chars().count() <= FILENAME_MAX_LENGTH {
        return trimmed.to_string();
    }

    // Cutting can expose a trailing space or dot. Trimming it again keeps
    // sanitation idempotent, so the stem may end up shorter than
    // FILENAME_MAX_LENGTH instead of exactly that long.
    let truncated: String = trimmed.chars().take(FILENAME_MAX_LENGTH).collect();
    trim_edges(&truncated).to_string()
}

/// File name of the artifact exported for a dashboard
pub fn artifact_filename(name: &str) -> String {
    format!("{}.{}", sanitize_filename(name), ARTIFACT_EXTENSION)
}

/// Re-applies sanitation to the stem of an artifact file name
///
/// Names without the artifact extension are sanitized whole.
pub fn normalize_filename(filename: &str) -> String {
    let suffix = format!(".{ARTIFACT_EXTENSION}");
    match filename.strip_suffix(&suffix) {
        Some(stem) => format!("{}{}", sanitize_filename(stem), suffix),
        None => sanitize_filename(filename),
    }
}
