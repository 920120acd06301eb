pub mod episode;
pub mod error;
pub mod feed;
pub mod http;
pub mod progress;
pub mod size;
pub mod sync;

// Re-export main types for convenience
pub use episode::{download_to_file, generate_filename, slugify};
pub use error::{DownloadError, FeedError, SyncError};
pub use feed::{Entry, Feed, Link, is_url, load_feed, parse_feed};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use size::{format_size, format_size_with_suffix};
pub use sync::{
    DownloadTarget, EntryOutcome, FailurePolicy, SyncOptions, SyncSummary, find_audio_link,
    process_entry, sync_feed,
};
