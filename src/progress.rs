use std::path::PathBuf;
use std::sync::Arc;

/// Events emitted while processing a feed, in the order they happen
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Feed is being loaded from a URL or file
    FetchingFeed { source: String },

    /// Feed has been parsed successfully
    FeedParsed {
        podcast_title: String,
        total_entries: usize,
        /// Entries that will be processed after applying the max count
        to_process: usize,
    },

    /// Target filename and download link have been resolved for an entry
    EntryResolved {
        date: String,
        title: String,
        link: Option<String>,
        path: PathBuf,
    },

    /// Entry has no `.mp3` link and is skipped
    NoAudioLink { title: String },

    /// Destination directory did not exist and was created
    DirectoryCreated { path: PathBuf },

    /// A non-empty file already exists at the target path
    AlreadyPresent { title: String, path: PathBuf },

    /// A download is starting
    DownloadStarting {
        title: String,
        /// Expected content length in bytes, if known
        content_length: Option<u64>,
    },

    /// Download progress update, emitted once per written chunk
    DownloadProgress {
        title: String,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// A download completed successfully
    DownloadCompleted {
        title: String,
        path: PathBuf,
        bytes_downloaded: u64,
    },

    /// A download failed
    DownloadFailed { title: String, error: String },

    /// Every selected entry has been handled
    SyncCompleted {
        downloaded_count: usize,
        present_count: usize,
        no_link_count: usize,
        failed_count: usize,
    },
}

/// Trait for reporting progress events.
///
/// This is the only channel through which per-entry outcomes reach the user;
/// implementations print lines, drive progress bars, or collect events.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {}
}

impl NoopReporter {
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Reporter that records every event for later inspection
    #[derive(Default)]
    pub struct RecordingReporter {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl RecordingReporter {
        pub fn events(&self) -> Vec<ProgressEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ProgressReporter for RecordingReporter {
        fn report(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingReporter;
    use super::*;

    #[test]
    fn noop_reporter_handles_all_events() {
        let reporter = NoopReporter;

        reporter.report(ProgressEvent::FetchingFeed {
            source: "https://example.com/feed.xml".to_string(),
        });
        reporter.report(ProgressEvent::NoAudioLink {
            title: "Episode 1".to_string(),
        });
        reporter.report(ProgressEvent::DownloadFailed {
            title: "Episode 2".to_string(),
            error: "Connection timeout".to_string(),
        });
        reporter.report(ProgressEvent::SyncCompleted {
            downloaded_count: 4,
            present_count: 5,
            no_link_count: 0,
            failed_count: 1,
        });
    }

    #[test]
    fn recording_reporter_keeps_order() {
        let reporter = RecordingReporter::default();

        reporter.report(ProgressEvent::DirectoryCreated {
            path: PathBuf::from("pods"),
        });
        reporter.report(ProgressEvent::NoAudioLink {
            title: "Episode 1".to_string(),
        });

        let events = reporter.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ProgressEvent::DirectoryCreated { .. }));
        assert!(matches!(events[1], ProgressEvent::NoAudioLink { .. }));
    }
}
