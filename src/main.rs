use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};

use podrss::{
    FailurePolicy, NoopReporter, ProgressEvent, ProgressReporter, ReqwestClient,
    SharedProgressReporter, SyncOptions, format_size, sync_feed,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "[-] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Download podcast mp3 files from an RSS URL
#[derive(Parser, Debug)]
#[command(name = "podrss")]
#[command(about = "Download podcast mp3 files from an RSS URL")]
#[command(version)]
struct Args {
    /// RSS or Atom feed URL, or path to a local feed file
    url: String,

    /// Directory where to download podcast mp3 files
    #[arg(long, default_value = "pods")]
    dir: PathBuf,

    /// Maximum number of entries to download
    #[arg(long, default_value_t = 100)]
    maxcount: usize,

    /// Keep going with the next entry when a download fails
    #[arg(long)]
    continue_on_error: bool,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Prints one line per decision and shows a byte bar while downloading
struct TerminalReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalReporter {
    fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn start_bar(&self, title: &str, length: Option<u64>) {
        let style = ProgressStyle::default_bar()
            .template(&format!(
                "  {DOWNLOAD}[{{bar:30.cyan/blue}}] {{bytes}}/{{total_bytes}} {{wide_msg}}"
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");

        let bar = ProgressBar::new(length.unwrap_or(0));
        bar.set_style(style);
        bar.set_message(truncate_title(title, 40));

        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn update_bar(&self, position: u64, length: Option<u64>) {
        if let Ok(slot) = self.bar.lock()
            && let Some(bar) = slot.as_ref()
        {
            if let Some(total) = length {
                bar.set_length(total);
            }
            bar.set_position(position);
        }
    }

    fn clear_bar(&self) {
        if let Ok(mut slot) = self.bar.lock()
            && let Some(bar) = slot.take()
        {
            bar.finish_and_clear();
        }
    }
}

impl ProgressReporter for TerminalReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingFeed { source } => {
                println!("{SEARCH}Fetching feed: {}", source.cyan());
            }

            ProgressEvent::FeedParsed {
                podcast_title,
                total_entries,
                to_process,
            } => {
                println!(
                    "{HEADPHONES}Parsed feed {} • {} entries, processing {}",
                    podcast_title.bold().green(),
                    total_entries.to_string().cyan(),
                    to_process.to_string().yellow()
                );
            }

            ProgressEvent::EntryResolved {
                date,
                title,
                link,
                path,
            } => {
                println!(
                    "Entry {} \"{}\", link {} -> {}",
                    date.cyan(),
                    title.bold(),
                    link.as_deref().unwrap_or("none").dimmed(),
                    path.display()
                );
            }

            ProgressEvent::NoAudioLink { .. } => {
                println!("  {SKIP}{}", "No link for entry, skipping".yellow());
            }

            ProgressEvent::DirectoryCreated { path } => {
                println!("  {FOLDER}Created directory {}", path.display());
            }

            ProgressEvent::AlreadyPresent { .. } => {
                println!("  {SKIP}{}", "Podcast file exists, skipping".yellow());
            }

            ProgressEvent::DownloadStarting {
                title,
                content_length,
            } => self.start_bar(&title, content_length),

            ProgressEvent::DownloadProgress {
                bytes_downloaded,
                total_bytes,
                ..
            } => self.update_bar(bytes_downloaded, total_bytes),

            ProgressEvent::DownloadCompleted {
                path,
                bytes_downloaded,
                ..
            } => {
                self.clear_bar();
                println!(
                    "  {SUCCESS}Downloaded to {} ({})",
                    path.display(),
                    format_size(bytes_downloaded.into()).green()
                );
            }

            ProgressEvent::DownloadFailed { title, error } => {
                self.clear_bar();
                println!(
                    "  {FAILURE}{} - {}",
                    truncate_title(&title, 30).red(),
                    error.red()
                );
            }

            ProgressEvent::SyncCompleted {
                downloaded_count,
                present_count,
                no_link_count,
                failed_count,
            } => {
                println!(
                    "\n{} {} downloaded, {} already present, {} without link, {} failed",
                    "Done:".bold().green(),
                    downloaded_count.to_string().green().bold(),
                    present_count.to_string().yellow(),
                    no_link_count.to_string().yellow(),
                    if failed_count > 0 {
                        failed_count.to_string().red().bold()
                    } else {
                        failed_count.to_string().green()
                    }
                );
            }
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let head: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "podrss".bold().magenta(),
            "- Podcast Downloader".dimmed()
        );
    }

    let client = ReqwestClient::new();

    let options = SyncOptions {
        max_count: args.maxcount,
        on_error: if args.continue_on_error {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        },
    };

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(TerminalReporter::new())
    };

    let summary = sync_feed(&client, &args.url, &args.dir, &options, reporter)
        .await
        .with_context(|| format!("Failed to download podcast from {}", args.url))?;

    if !args.quiet && !summary.failed.is_empty() {
        println!("\n{}", "Failed episodes:".red().bold());
        for (title, error) in &summary.failed {
            println!("  {}{} - {}", CROSS, title.yellow(), error.dimmed());
        }
    }

    if summary.downloaded == 0 && !summary.failed.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
