// ABOUTME: Identity-keyed on-disk cache of decoded cover art
// ABOUTME: Serves hits from disk, fetches and persists on miss, and offers opt-in pruning

use crate::constants;
use crate::error::{ImageCacheError, Result};
use crate::fetcher::{HttpFetcher, ImageFetcher};
use crate::identity::MediaIdentity;
use image::{DynamicImage, ImageFormat};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

pub struct ImageCache {
    cache_dir: PathBuf,
    fetcher: Box<dyn ImageFetcher>,
}

impl ImageCache {
    pub fn new(cache_dir: impl Into<PathBuf>, fetcher: impl ImageFetcher + 'static) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            fetcher: Box::new(fetcher),
        }
    }

    /// Cache rooted at [`default_cache_root`] with a plain HTTP fetcher
    pub fn with_defaults() -> Result<Self> {
        let cache_dir = default_cache_root().ok_or_else(|| {
            ImageCacheError::io(
                PathBuf::new(),
                std::io::Error::new(ErrorKind::NotFound, "Cannot determine cache directory"),
            )
        })?;
        Ok(Self::new(cache_dir, HttpFetcher::new()?))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// `<cache-root>/<category>/<id>/<size_variant>.jpg`
    pub fn cache_path(&self, identity: &MediaIdentity) -> PathBuf {
        self.cache_dir.join(identity.relative_path())
    }

    /// Return the decoded image for `identity`, fetching `url` only when the
    /// cached file is absent or does not decode.
    pub fn get_image(&self, identity: &MediaIdentity, url: &str) -> Result<DynamicImage> {
        let cache_path = self.cache_path(identity);

        match load_from_cache(&cache_path) {
            Ok(img) => {
                log::debug!("Cache hit: {} -> {:?}", identity, cache_path);
                return Ok(img);
            }
            Err(e) => log::debug!("Cache miss: {} ({})", identity, e),
        }

        self.download_and_cache(url, &cache_path)
    }

    fn download_and_cache(&self, url: &str, cache_path: &Path) -> Result<DynamicImage> {
        // Fetch before touching the filesystem so a failed request leaves nothing behind
        let mut body = self.fetcher.fetch(url)?;

        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ImageCacheError::io(parent, e))?;
        }

        // Each writer streams into its own file and renames it into place, so a
        // concurrent miss for the same identity never truncates our bytes
        let partial_path = partial_path_for(cache_path);
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&partial_path)
            .map_err(|e| ImageCacheError::io(&partial_path, e))?;

        let written = match stream_to_file(&mut body, &mut file, url, &partial_path) {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&partial_path);
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&partial_path, cache_path) {
            let _ = fs::remove_file(&partial_path);
            return Err(ImageCacheError::io(cache_path, e));
        }
        log::debug!("Cached {} bytes: {} -> {:?}", written, url, cache_path);

        // Decode from our own handle, not by reopening the shared path
        file.seek(SeekFrom::Start(0))
            .map_err(|e| ImageCacheError::io(cache_path, e))?;
        decode_jpeg(BufReader::new(&file), cache_path)
    }

    /// Delete the artifact for one identity. Missing files are not an error.
    pub fn remove(&self, identity: &MediaIdentity) -> Result<bool> {
        let path = self.cache_path(identity);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("Removed cache file: {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ImageCacheError::io(path, e)),
        }
    }

    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)
                .map_err(|e| ImageCacheError::io(&self.cache_dir, e))?;
        }
        Ok(())
    }

    /// Total bytes held by cached files. In-flight downloads are not counted.
    pub fn size_bytes(&self) -> Result<u64> {
        let mut total_size = 0;
        walk_cache_dir(&self.cache_dir, &mut |path, metadata| {
            if !is_partial(path) {
                total_size += metadata.len();
            }
        })?;
        Ok(total_size)
    }

    /// Delete leftover in-flight downloads, then evict least-recently-used
    /// files until the cache is at most 80% of `max_bytes`. Returns the number
    /// of files removed. Never called implicitly: the cache is unbounded
    /// unless a caller asks.
    pub fn prune(&self, max_bytes: u64) -> Result<usize> {
        let now = SystemTime::now();
        let mut stale_partials: Vec<PathBuf> = Vec::new();
        let mut files: Vec<(PathBuf, u64, SystemTime)> = Vec::new();
        walk_cache_dir(&self.cache_dir, &mut |path, metadata| {
            if is_partial(path) {
                // A fresh partial may still be written by a live caller
                let stale = metadata
                    .modified()
                    .ok()
                    .and_then(|modified| now.duration_since(modified).ok())
                    .is_some_and(|age| age >= constants::cache::STALE_PARTIAL_AGE);
                if stale {
                    stale_partials.push(path.to_path_buf());
                }
            } else if let Ok(access_time) = metadata.accessed().or_else(|_| metadata.modified()) {
                files.push((path.to_path_buf(), metadata.len(), access_time));
            }
        })?;

        let mut removed = 0;
        for path in stale_partials {
            match fs::remove_file(&path) {
                Ok(()) => {
                    removed += 1;
                    log::debug!("Removed abandoned download: {:?}", path);
                }
                Err(e) => log::debug!("Failed to remove abandoned download {:?}: {}", path, e),
            }
        }

        let total_size: u64 = files.iter().map(|(_, size, _)| size).sum();
        if total_size <= max_bytes {
            return Ok(removed);
        }

        log::debug!(
            "Cache size {} bytes exceeds limit {} bytes, pruning",
            total_size,
            max_bytes
        );

        // Oldest first
        files.sort_by_key(|(_, _, access_time)| *access_time);

        let target_size = max_bytes * constants::cache::PRUNE_TARGET_PERCENT / 100;
        let mut current_size = total_size;

        for (path, size, _) in files {
            if current_size <= target_size {
                break;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    current_size = current_size.saturating_sub(size);
                    removed += 1;
                    log::debug!("Removed cache file: {:?}", path);
                }
                Err(e) => log::debug!("Failed to remove cache file {:?}: {}", path, e),
            }
        }

        Ok(removed)
    }
}

fn partial_path_for(cache_path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let mut name = cache_path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(
        ".{}-{}.{}",
        std::process::id(),
        n,
        constants::cache::PARTIAL_EXTENSION
    ));
    cache_path.with_file_name(name)
}

fn is_partial(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == constants::cache::PARTIAL_EXTENSION)
}

fn load_from_cache(path: &Path) -> Result<DynamicImage> {
    let file = File::open(path).map_err(|e| ImageCacheError::io(path, e))?;
    decode_jpeg(BufReader::new(file), path)
}

fn decode_jpeg<R: std::io::BufRead + Seek>(reader: R, path: &Path) -> Result<DynamicImage> {
    image::load(reader, ImageFormat::Jpeg).map_err(|e| ImageCacheError::decode(path, e))
}

/// Copy the body into the file, keeping read (network) and write (disk)
/// failures apart.
fn stream_to_file(body: &mut dyn Read, file: &mut File, url: &str, path: &Path) -> Result<u64> {
    let mut buffer = [0u8; 8192];
    let mut written = 0u64;

    loop {
        let n = match body.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(ImageCacheError::fetch(
                    url,
                    format!("Failed to read response body: {}", e),
                ));
            }
        };
        file.write_all(&buffer[..n])
            .map_err(|e| ImageCacheError::io(path, e))?;
        written += n as u64;
    }

    file.flush().map_err(|e| ImageCacheError::io(path, e))?;
    Ok(written)
}

fn walk_cache_dir<F>(dir: &Path, visitor: &mut F) -> Result<()>
where
    F: FnMut(&Path, &fs::Metadata),
{
    if !dir.exists() {
        return Ok(());
    }

    let entries = fs::read_dir(dir).map_err(|e| ImageCacheError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ImageCacheError::io(dir, e))?;
        let path = entry.path();

        if path.is_dir() {
            walk_cache_dir(&path, visitor)?;
        } else if path.is_file() {
            if let Ok(metadata) = entry.metadata() {
                visitor(&path, &metadata);
            }
        }
    }

    Ok(())
}

/// Cache root: `$YATO_IMAGE_CACHE`, else `<platform cache dir>/yato/cache`
pub fn default_cache_root() -> Option<PathBuf> {
    if let Ok(custom_dir) = std::env::var(constants::env::CACHE_DIR) {
        if !custom_dir.is_empty() {
            return Some(PathBuf::from(custom_dir));
        }
    }

    dirs::cache_dir().map(|dir| {
        dir.join(constants::cache::APP_DIR)
            .join(constants::cache::CACHE_SUBDIR)
    })
}

/// Parse sizes like `512`, `64KB`, `100MB`, `1GB` into bytes
pub fn parse_size(size_str: &str) -> Option<u64> {
    let size_str = size_str.trim().to_uppercase();

    let (number_part, unit) = if size_str.ends_with("MB") {
        (size_str.trim_end_matches("MB"), 1024 * 1024)
    } else if size_str.ends_with("KB") {
        (size_str.trim_end_matches("KB"), 1024)
    } else if size_str.ends_with("GB") {
        (size_str.trim_end_matches("GB"), 1024 * 1024 * 1024)
    } else if size_str.ends_with('B') {
        (size_str.trim_end_matches('B'), 1)
    } else {
        (size_str.as_str(), 1)
    };

    number_part
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(unit))
}
