// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use url::Url;

use crate::episode::{date_stamp, download_to_file, entry_title, target_path};
use crate::error::{FeedError, SyncError};
use crate::feed::{Entry, load_feed};
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// What to do when a single episode download fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run at the first failed download; later entries are never attempted
    #[default]
    Abort,
    /// Record the failure and move on to the next entry
    Continue,
}

/// Options for a feed run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Maximum number of feed entries to process, in feed order
    pub max_count: usize,
    pub on_error: FailurePolicy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            max_count: 100,
            on_error: FailurePolicy::Abort,
        }
    }
}

/// Counts of per-entry outcomes for a finished run
#[derive(Debug, Clone, Default)]
pub struct SyncSummary {
    pub downloaded: usize,
    /// Entries whose target file already existed with a non-zero size
    pub already_present: usize,
    /// Entries without any `.mp3` link
    pub no_link: usize,
    /// Details of failed entries (title, error message)
    pub failed: Vec<(String, String)>,
}

/// How a single entry was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Downloaded { path: PathBuf, bytes: u64 },
    AlreadyPresent { path: PathBuf },
    NoAudioLink,
}

/// Where an entry's audio goes and where it comes from.
/// Computed fresh per entry; the file on disk is the only completion record.
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    pub date: String,
    pub title: String,
    pub link: Option<String>,
    pub path: PathBuf,
}

impl DownloadTarget {
    pub fn resolve(podcast_name: &str, dir: &Path, entry: &Entry) -> Self {
        Self {
            date: date_stamp(entry.published.as_ref()),
            title: entry_title(entry).to_string(),
            link: find_audio_link(entry).map(String::from),
            path: target_path(dir, podcast_name, entry),
        }
    }
}

/// First link, in order, whose URL path ends in `.mp3`
///
/// Query strings and fragments are ignored; the match is case-sensitive.
pub fn find_audio_link(entry: &Entry) -> Option<&str> {
    entry
        .links
        .iter()
        .map(|link| link.href.as_str())
        .find(|href| Url::parse(href).is_ok_and(|url| url.path().ends_with(".mp3")))
}

/// Create `dir` (and parents) if it is missing
fn ensure_directory(dir: &Path, reporter: &SharedProgressReporter) -> Result<(), SyncError> {
    if dir.exists() {
        return Ok(());
    }

    std::fs::create_dir_all(dir).map_err(|e| SyncError::CreateDirectoryFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    reporter.report(ProgressEvent::DirectoryCreated {
        path: dir.to_path_buf(),
    });

    Ok(())
}

async fn is_nonempty_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file() && meta.len() > 0)
}

/// Download a single entry's audio unless it is already on disk
///
/// Entries without an `.mp3` link are skipped, not failed. A download
/// failure is reported and returned as [`SyncError::Download`]; whether
/// that ends the run is up to the caller.
pub async fn process_entry<C: HttpClient>(
    client: &C,
    podcast_name: &str,
    dir: &Path,
    entry: &Entry,
    reporter: &SharedProgressReporter,
) -> Result<EntryOutcome, SyncError> {
    let target = DownloadTarget::resolve(podcast_name, dir, entry);

    reporter.report(ProgressEvent::EntryResolved {
        date: target.date.clone(),
        title: target.title.clone(),
        link: target.link.clone(),
        path: target.path.clone(),
    });

    let Some(link) = target.link else {
        reporter.report(ProgressEvent::NoAudioLink {
            title: target.title,
        });
        return Ok(EntryOutcome::NoAudioLink);
    };

    ensure_directory(dir, reporter)?;

    if is_nonempty_file(&target.path).await {
        reporter.report(ProgressEvent::AlreadyPresent {
            title: target.title,
            path: target.path.clone(),
        });
        return Ok(EntryOutcome::AlreadyPresent { path: target.path });
    }

    match download_to_file(client, &link, &target.path, &target.title, reporter).await {
        Ok(bytes) => Ok(EntryOutcome::Downloaded {
            path: target.path,
            bytes,
        }),
        Err(e) => {
            reporter.report(ProgressEvent::DownloadFailed {
                title: target.title.clone(),
                error: e.to_string(),
            });
            Err(SyncError::Download {
                title: target.title,
                source: e,
            })
        }
    }
}

/// Download the audio of up to `max_count` entries of a feed into `dir`
///
/// Entries are processed one at a time in feed order. Directory errors
/// always end the run; download errors follow `options.on_error`.
pub async fn sync_feed<C: HttpClient>(
    client: &C,
    feed_source: &str,
    dir: &Path,
    options: &SyncOptions,
    reporter: SharedProgressReporter,
) -> Result<SyncSummary, SyncError> {
    reporter.report(ProgressEvent::FetchingFeed {
        source: feed_source.to_string(),
    });

    let feed = load_feed(client, feed_source).await?;
    let podcast_name = feed.title.ok_or(FeedError::MissingTitle)?;

    let entries: Vec<&Entry> = feed.entries.iter().take(options.max_count).collect();

    reporter.report(ProgressEvent::FeedParsed {
        podcast_title: podcast_name.clone(),
        total_entries: feed.entries.len(),
        to_process: entries.len(),
    });

    let mut summary = SyncSummary::default();

    for entry in entries {
        match process_entry(client, &podcast_name, dir, entry, &reporter).await {
            Ok(EntryOutcome::Downloaded { .. }) => summary.downloaded += 1,
            Ok(EntryOutcome::AlreadyPresent { .. }) => summary.already_present += 1,
            Ok(EntryOutcome::NoAudioLink) => summary.no_link += 1,
            Err(SyncError::Download { title, source })
                if options.on_error == FailurePolicy::Continue =>
            {
                summary.failed.push((title, source.to_string()));
            }
            Err(e) => return Err(e),
        }
    }

    reporter.report(ProgressEvent::SyncCompleted {
        downloaded_count: summary.downloaded,
        present_count: summary.already_present,
        no_link_count: summary.no_link,
        failed_count: summary.failed.len(),
    });

    Ok(summary)
}
