//! Artifact collection.
//!
//! Each workflow run owns one sink: an append-only execution ledger
//! (JSONL, one object per step) plus screen captures. Sinks are
//! row-exclusive in batch runs, so appends never interleave across rows.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde_json::json;

use crate::error::Result;

/// Ledger file name inside an artifact directory.
const LEDGER_FILE: &str = "execution-ledger.jsonl";

/// Destination for execution evidence.
pub trait ArtifactSink: Send {
    /// Append one `{timestamp, action, status}` object to the ledger.
    fn append_ledger(&self, action: &str, status: &str) -> Result<()>;

    /// Write a screen capture; the stored name carries an epoch-seconds
    /// suffix to avoid collisions. Returns the path written.
    fn write_capture(&self, name: &str, content: &str) -> Result<PathBuf>;

    /// The directory artifacts land in.
    fn dir(&self) -> &Path;
}

/// Filesystem-backed sink rooted at one artifact directory.
#[derive(Debug)]
pub struct FsArtifacts {
    dir: PathBuf,
    ledger_path: PathBuf,
}

impl FsArtifacts {
    /// Create the artifact directory (and parents) and a sink over it.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let ledger_path = dir.join(LEDGER_FILE);
        Ok(Self { dir, ledger_path })
    }
}

impl ArtifactSink for FsArtifacts {
    fn append_ledger(&self, action: &str, status: &str) -> Result<()> {
        let line = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "action": action,
            "status": status,
        });
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.ledger_path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn write_capture(&self, name: &str, content: &str) -> Result<PathBuf> {
        let filename = format!("{}_{}.txt", name, Utc::now().timestamp());
        let path = self.dir.join(filename);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    fn dir(&self) -> &Path {
        &self.dir
    }
}

/// In-memory sink recording ledger entries and captures, for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    dir: PathBuf,
    entries: Mutex<Vec<(String, String)>>,
    captures: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(action, status)` ledger entries.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.lock().unwrap().clone()
    }

    /// Recorded `(name, content)` captures.
    pub fn captures(&self) -> Vec<(String, String)> {
        self.captures.lock().unwrap().clone()
    }
}

impl ArtifactSink for MemorySink {
    fn append_ledger(&self, action: &str, status: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .push((action.to_string(), status.to_string()));
        Ok(())
    }

    fn write_capture(&self, name: &str, content: &str) -> Result<PathBuf> {
        self.captures
            .lock()
            .unwrap()
            .push((name.to_string(), content.to_string()));
        Ok(self.dir.join(name))
    }

    fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_lines_are_json_objects() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = FsArtifacts::create(tmp.path().join("run1")).unwrap();

        sink.append_ledger("LOGIN", "Connected to i5.example.com")
            .unwrap();
        sink.append_ledger("ASSERT", "Assertion passed").unwrap();

        let raw = std::fs::read_to_string(sink.dir().join(LEDGER_FILE)).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["action"], "LOGIN");
        assert_eq!(first["status"], "Connected to i5.example.com");
        assert!(first["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn capture_filenames_carry_epoch_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = FsArtifacts::create(tmp.path().join("run2")).unwrap();

        let path = sink.write_capture("screenshot", "MAIN MENU\n").unwrap();
        let filename = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(filename.starts_with("screenshot_"));
        assert!(filename.ends_with(".txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "MAIN MENU\n");
    }

    #[test]
    fn create_builds_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        let sink = FsArtifacts::create(&nested).unwrap();
        assert!(sink.dir().is_dir());
    }

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.append_ledger("LOGIN", "ok").unwrap();
        sink.append_ledger("WAIT", "Waited 100ms").unwrap();
        let entries = sink.entries();
        assert_eq!(entries[0].0, "LOGIN");
        assert_eq!(entries[1].1, "Waited 100ms");
    }
}
