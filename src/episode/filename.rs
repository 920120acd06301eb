use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};

use crate::feed::Entry;

/// strftime pattern for the date segment of a filename
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Date segment used when an entry has no usable publication date
pub const UNDATED: &str = "undated";

/// Title used when an entry has none
pub const UNTITLED: &str = "untitled";

/// Check if a character survives the first filtering pass
fn is_slug_source_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ' ')
}

/// Convert arbitrary text into a lowercase, filesystem-safe token
///
/// Punctuation and symbols are dropped, accented letters are transliterated
/// to ASCII and spaces become underscores. No length limit is applied.
pub fn slugify(text: &str) -> String {
    let filtered: String = text.chars().filter(|&c| is_slug_source_char(c)).collect();

    // Transliteration can emit characters outside the slug alphabet
    // ("½" becomes "1/2"), so the ASCII result is filtered once more.
    deunicode::deunicode(&filtered)
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            '-' | '_' => Some(c),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            _ => None,
        })
        .collect()
}

/// Format a publication timestamp as a UTC `YYYYMMDD`, or `undated`
pub fn date_stamp(published: Option<&DateTime<FixedOffset>>) -> String {
    published
        .map(|dt| dt.with_timezone(&Utc).format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| UNDATED.to_string())
}

/// Entry title with the `untitled` fallback applied
pub fn entry_title(entry: &Entry) -> &str {
    entry.title.as_deref().unwrap_or(UNTITLED)
}

/// Generate the file name (without directory) for an entry
///
/// Format: "{podcast}-{YYYYMMDD}-{title}.mp3", each part slugified.
/// Two entries sharing a date and title map to the same name.
pub fn generate_filename(podcast_name: &str, entry: &Entry) -> String {
    format!(
        "{}-{}-{}.mp3",
        slugify(podcast_name),
        date_stamp(entry.published.as_ref()),
        slugify(entry_title(entry))
    )
}

/// Full destination path for an entry inside `dir`
pub fn target_path(dir: &Path, podcast_name: &str, entry: &Entry) -> PathBuf {
    dir.join(generate_filename(podcast_name, entry))
}
