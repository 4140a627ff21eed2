//! Append-only chat log
//!
//! Two lines per turn in the fixed `[YYYY-MM-DD HH:MM:SS] Speaker:
//! text` format. The file handle is scoped to a single append: open,
//! write, flush, close, every turn. Nothing ever reads the log back.

use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Timestamp format shared by the log lines and nothing else
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp the way the log records it
pub fn format_stamp(timestamp: DateTime<Local>) -> String {
    timestamp.format(STAMP_FORMAT).to_string()
}

/// Writer for the persistent chat log
pub struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[allow(dead_code)] // Used by tests to read the log back
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one turn's two lines. Called only once both capability
    /// calls have succeeded, so the log never carries a partial turn.
    pub fn append_turn(&self, lines: &[String; 2]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        for line in lines {
            writeln!(file, "{line}")?;
        }
        file.flush()
    }
}
