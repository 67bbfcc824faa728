//! Modification-time keyed snapshot cache.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use tracing::debug;

use regionwatch_types::TelemetryRecord;

use super::Loader;
use crate::error::Error;

/// A [`Loader`] wrapper that reuses the parsed snapshot while the underlying
/// file is unchanged.
///
/// The cache is keyed on (resolved path, modification time): a different
/// candidate winning the probe, or a newer mtime, invalidates the entry and
/// rebuilds it from scratch; entries are never updated in place. The cached
/// sequence is immutable and handed out as a shared `Arc`, so concurrent
/// requests read it without coordination. Load failures are never cached.
#[derive(Debug)]
pub struct CachedLoader {
    loader: Loader,
    entry: RwLock<Option<CacheEntry>>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    path: PathBuf,
    modified: SystemTime,
    records: Arc<[TelemetryRecord]>,
}

impl CachedLoader {
    /// Wrap a loader with an initially-empty cache.
    pub fn new(loader: Loader) -> Self {
        Self {
            loader,
            entry: RwLock::new(None),
        }
    }

    /// The wrapped loader.
    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    /// Load the snapshot, reusing the cached parse when the file is
    /// unchanged. Same contract as [`Loader::load`].
    pub fn load(&self) -> Result<Arc<[TelemetryRecord]>, Error> {
        let path = self.loader.resolve()?;
        let modified = modified_time(&path);

        // Fast path: same file, same mtime.
        if let Some(modified) = modified {
            let entry = self.entry.read();
            if let Some(entry) = entry.as_ref() {
                if entry.path == path && entry.modified == modified {
                    return Ok(entry.records.clone());
                }
            }
        }

        // Slow path: full parse, then replace the entry. The mtime was taken
        // before the read, so a mid-parse rewrite shows up as a newer key on
        // the next request.
        let records: Arc<[TelemetryRecord]> = self.loader.load()?.into();
        debug!(path = %path.display(), count = records.len(), "snapshot cache rebuilt");

        if let Some(modified) = modified {
            *self.entry.write() = Some(CacheEntry {
                path,
                modified,
                records: records.clone(),
            });
        }

        Ok(records)
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).ok()?.modified().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_json(dir: &Path, name: &str, body: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        write!(file, "{}", body).unwrap();
    }

    #[test]
    fn unchanged_file_returns_shared_parse() {
        let dir = TempDir::new().unwrap();
        write_json(
            dir.path(),
            "telemetry.json",
            r#"[{"region": "us-east", "latency_ms": 100, "uptime": 0.99}]"#,
        );

        let cached = CachedLoader::new(Loader::new(dir.path()));
        let first = cached.load().unwrap();
        let second = cached.load().unwrap();

        assert_eq!(first.len(), 1);
        // Same Arc, not a re-parse.
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn different_winning_candidate_invalidates() {
        let dir = TempDir::new().unwrap();
        write_json(
            dir.path(),
            "q-vercel-latency.json",
            r#"[{"region": "us-east", "latency_ms": 100, "uptime": 0.99}]"#,
        );
        write_json(
            dir.path(),
            "telemetry.json",
            r#"[{"region": "eu-west", "latency_ms": 50, "uptime": 0.98},
                {"region": "eu-west", "latency_ms": 60, "uptime": 0.97}]"#,
        );

        let cached = CachedLoader::new(Loader::new(dir.path()));
        let first = cached.load().unwrap();
        assert_eq!(first[0].region, "us-east");

        // Removing the primary changes which candidate resolves.
        fs::remove_file(dir.path().join("q-vercel-latency.json")).unwrap();
        let second = cached.load().unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].region, "eu-west");
    }

    #[test]
    fn newer_mtime_invalidates() {
        let dir = TempDir::new().unwrap();
        write_json(
            dir.path(),
            "telemetry.json",
            r#"[{"region": "us-east", "latency_ms": 100, "uptime": 0.99}]"#,
        );

        let cached = CachedLoader::new(Loader::new(dir.path()));
        assert_eq!(cached.load().unwrap().len(), 1);

        // Coarse filesystem mtime resolution needs a real gap.
        std::thread::sleep(std::time::Duration::from_millis(1100));
        write_json(
            dir.path(),
            "telemetry.json",
            r#"[{"region": "us-east", "latency_ms": 100, "uptime": 0.99},
                {"region": "us-east", "latency_ms": 200, "uptime": 0.98}]"#,
        );

        assert_eq!(cached.load().unwrap().len(), 2);
    }

    #[test]
    fn missing_data_source_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let cached = CachedLoader::new(Loader::new(dir.path()));

        assert!(matches!(
            cached.load(),
            Err(Error::DataSourceNotFound(_))
        ));

        // Creating the file afterwards makes the next load succeed.
        write_json(
            dir.path(),
            "telemetry.json",
            r#"[{"region": "us-east", "latency_ms": 100, "uptime": 0.99}]"#,
        );
        assert_eq!(cached.load().unwrap().len(), 1);
    }
}
