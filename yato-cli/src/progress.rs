// ABOUTME: Download spinner for image fetches, layered over any ImageFetcher
// ABOUTME: Counts body bytes as the cache streams them to disk and clears itself at EOF

use crate::constants::timeouts::PROGRESS_BAR_TICK_MS;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read};
use std::time::Duration;
use yato_images::{ImageBody, ImageFetcher};

/// Wraps a fetcher and shows a spinner on stderr while the body is read
pub struct ProgressFetcher<F> {
    inner: F,
    enabled: bool,
}

impl<F: ImageFetcher> ProgressFetcher<F> {
    pub fn new(inner: F, enabled: bool) -> Self {
        Self { inner, enabled }
    }
}

impl<F: ImageFetcher> ImageFetcher for ProgressFetcher<F> {
    fn fetch(&self, url: &str) -> yato_images::Result<ImageBody> {
        let body = self.inner.fetch(url)?;
        if !self.enabled {
            return Ok(body);
        }

        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.green} {msg} {bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(format!("Downloading {}", file_name(url)));
        bar.enable_steady_tick(Duration::from_millis(PROGRESS_BAR_TICK_MS));

        Ok(Box::new(ProgressReader { inner: body, bar }))
    }
}

struct ProgressReader {
    inner: ImageBody,
    bar: ProgressBar,
}

impl Read for ProgressReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 {
            self.bar.finish_and_clear();
        } else {
            self.bar.inc(n as u64);
        }
        Ok(n)
    }
}

impl Drop for ProgressReader {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

fn file_name(url: &str) -> &str {
    url.split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("image")
}
