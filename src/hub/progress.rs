// file: src/hub/progress.rs
// description: progress bars and counters for model artifact downloads
// reference: uses indicatif for progress bars and tracks transfer metrics

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct DownloadStats {
    pub files_saved: usize,
    pub bytes_saved: u64,
    pub duration_secs: u64,
}

impl DownloadStats {
    pub fn bytes_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.bytes_saved as f64 / self.duration_secs as f64
    }
}

pub struct DownloadProgress {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    files_saved: AtomicUsize,
    bytes_saved: AtomicU64,
    start_time: Instant,
}

impl DownloadProgress {
    pub fn new(total_files: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();

        let main_bar = create_progress_bar(&multi_progress, total_files as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self::from_bars(main_bar, detail_bar)
    }

    /// Counts without drawing anything.
    pub fn hidden(total_files: usize) -> Self {
        let main_bar = ProgressBar::with_draw_target(
            Some(total_files as u64),
            ProgressDrawTarget::hidden(),
        );
        let detail_bar = ProgressBar::hidden();

        Self::from_bars(main_bar, detail_bar)
    }

    fn from_bars(main_bar: ProgressBar, detail_bar: ProgressBar) -> Self {
        Self {
            main_bar,
            detail_bar,
            files_saved: AtomicUsize::new(0),
            bytes_saved: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn start_file(&self, filename: &str) {
        self.main_bar.set_message(filename.to_string());
    }

    pub fn file_saved(&self, bytes: u64) {
        self.files_saved.fetch_add(1, Ordering::SeqCst);
        self.bytes_saved.fetch_add(bytes, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Download complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> DownloadStats {
        DownloadStats {
            files_saved: self.files_saved.load(Ordering::SeqCst),
            bytes_saved: self.bytes_saved.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }

    fn update_detail_bar(&self) {
        let bytes = self.bytes_saved.load(Ordering::SeqCst);
        self.detail_bar
            .set_message(format!("Saved: {}", format_size(bytes)));
    }
}

impl Drop for DownloadProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let size = bytes as f64;
    if size < KB {
        format!("{} B", bytes)
    } else if size < KB * KB {
        format!("{:.1} KB", size / KB)
    } else if size < KB * KB * KB {
        format!("{:.1} MB", size / KB / KB)
    } else {
        format!("{:.1} GB", size / KB / KB / KB)
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let style = if colored {
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|s| s.progress_chars("█▓▒░"))
    } else {
        ProgressStyle::default_bar()
            .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}")
            .map(|s| s.progress_chars("=>-"))
    };
    bar.set_style(style.unwrap_or_else(|_| ProgressStyle::default_bar()));
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
