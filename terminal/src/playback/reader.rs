use anyhow::{bail, Context, Result};
use common::GameLog;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub struct LogReader;

impl LogReader {
    /// Loads and parses one match log. Errors here never disturb whatever
    /// document is already loaded; callers surface them as a notice.
    pub fn load_log(path: &Path) -> Result<GameLog> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read log file: {:?}", path))?;
        let log = GameLog::parse(&raw)
            .with_context(|| format!("Failed to parse log file: {:?}", path))?;
        if log.total_rounds() == 0 {
            bail!("Log file contains no rounds: {:?}", path);
        }
        Ok(log)
    }

    pub fn list_logs(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut logs = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension() == Some(OsStr::new("json")) {
                logs.push(path);
            }
        }

        // Newest first
        logs.sort_by(|a, b| {
            let a_time = a
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            let b_time = b
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            b_time.cmp(&a_time)
        });

        Ok(logs)
    }
}
