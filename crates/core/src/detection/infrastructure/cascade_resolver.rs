use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{CASCADE_BASE_URL, DEFAULT_CASCADE_DIR, SYSTEM_CASCADE_DIRS};
use crate::shared::detection_mode::Classifier;

#[derive(Error, Debug)]
pub enum CascadeResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write cascade to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Resolve a cascade file, preferring local copies over a download.
///
/// Resolution order:
/// 1. `cascade_dir` (or `resources/haarcascades` when `None`)
/// 2. System OpenCV data directories
/// 3. User cache directory
/// 4. Download from the OpenCV repository into the cache
pub fn resolve(
    classifier: Classifier,
    cascade_dir: Option<&Path>,
) -> Result<PathBuf, CascadeResolveError> {
    let name = classifier.file_name();
    let cache_dir = cascade_cache_dir();

    let mut candidates = local_dirs(cascade_dir);
    if let Ok(ref dir) = cache_dir {
        candidates.push(dir.clone());
    }
    if let Some(found) = find_in(name, &candidates) {
        log::debug!("Using {classifier} cascade at {}", found.display());
        return Ok(found);
    }

    log::info!("No local {name}, downloading");
    let cache_dir = cache_dir?;
    fs::create_dir_all(&cache_dir).map_err(CascadeResolveError::CacheDir)?;
    let cached_path = cache_dir.join(name);
    download(&cascade_url(classifier), &cached_path)?;
    Ok(cached_path)
}

/// Directories searched before the cache, in priority order.
pub fn local_dirs(cascade_dir: Option<&Path>) -> Vec<PathBuf> {
    let primary = cascade_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CASCADE_DIR));
    std::iter::once(primary)
        .chain(SYSTEM_CASCADE_DIRS.iter().map(PathBuf::from))
        .collect()
}

/// First directory in `dirs` containing a file called `name`.
pub fn find_in(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter().map(|d| d.join(name)).find(|p| p.is_file())
}

pub fn cascade_url(classifier: Classifier) -> String {
    format!("{CASCADE_BASE_URL}/{}", classifier.file_name())
}

/// Platform-specific cascade cache directory.
///
/// - macOS: `~/Library/Application Support/Smile and Blink/haarcascades/`
/// - Linux: `$XDG_CACHE_HOME/Smile and Blink/haarcascades/`
/// - Windows: `%LOCALAPPDATA%/Smile and Blink/haarcascades/`
pub fn cascade_cache_dir() -> Result<PathBuf, CascadeResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("Smile and Blink").join("haarcascades"))
            .ok_or(CascadeResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("Smile and Blink").join("haarcascades"))
            .ok_or(CascadeResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path) -> Result<(), CascadeResolveError> {
    let bytes = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(|source| CascadeResolveError::Download {
            url: url.to_string(),
            source,
        })?;
    log::info!("Downloaded {} bytes from {url}", bytes.len());
    store(&bytes, dest)
}

/// Writes `bytes` to `dest` through a `.part` file and a rename, removing
/// the `.part` file on any error.
fn store(bytes: &[u8], dest: &Path) -> Result<(), CascadeResolveError> {
    let temp_path = dest.with_extension("part");

    let result = store_inner(bytes, dest, &temp_path);

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn store_inner(bytes: &[u8], dest: &Path, temp_path: &Path) -> Result<(), CascadeResolveError> {
    let write_error = |source| CascadeResolveError::Write {
        path: temp_path.to_path_buf(),
        source,
    };
    let mut file = fs::File::create(temp_path).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.flush().map_err(write_error)?;
    drop(file);

    fs::rename(temp_path, dest).map_err(|source| CascadeResolveError::Write {
        path: dest.to_path_buf(),
        source,
    })
}
