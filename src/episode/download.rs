use std::path::Path;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::DownloadError;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Size of the write buffer between the response stream and the file
pub const WRITE_CHUNK_SIZE: usize = 1028 * 8;

/// Stream `url` into the file at `output_path`, returning the bytes written
///
/// The parent directory must already exist. An existing file is truncated.
/// On an HTTP error status nothing is created; a failure mid-stream leaves
/// whatever was written so far on disk.
pub async fn download_to_file<C: HttpClient>(
    client: &C,
    url: &str,
    output_path: &Path,
    title: &str,
    reporter: &SharedProgressReporter,
) -> Result<u64, DownloadError> {
    let response = client
        .get_stream(url)
        .await
        .map_err(|e| DownloadError::HttpFailed {
            url: url.to_string(),
            source: e,
        })?;

    if response.status >= 400 {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    reporter.report(ProgressEvent::DownloadStarting {
        title: title.to_string(),
        content_length: response.content_length,
    });

    let file = File::create(output_path)
        .await
        .map_err(|e| DownloadError::FileCreateFailed {
            path: output_path.to_path_buf(),
            source: e,
        })?;
    let mut writer = BufWriter::with_capacity(WRITE_CHUNK_SIZE, file);

    let write_failed = |e| DownloadError::FileWriteFailed {
        path: output_path.to_path_buf(),
        source: e,
    };

    let mut bytes_downloaded: u64 = 0;
    let mut stream = response.body;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::StreamFailed {
            url: url.to_string(),
            source: e,
        })?;

        writer.write_all(&chunk).await.map_err(write_failed)?;
        bytes_downloaded += chunk.len() as u64;

        reporter.report(ProgressEvent::DownloadProgress {
            title: title.to_string(),
            bytes_downloaded,
            total_bytes: response.content_length,
        });
    }

    writer.flush().await.map_err(write_failed)?;

    reporter.report(ProgressEvent::DownloadCompleted {
        title: title.to_string(),
        path: output_path.to_path_buf(),
        bytes_downloaded,
    });

    Ok(bytes_downloaded)
}
