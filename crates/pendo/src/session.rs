//! Session record
//!
//! Every run leaves two files in the logs directory:
//! - `pendo_session_<stamp>.log`: timestamped text lines
//! - `pendo_session_<stamp>.json`: start/end time, one record per attempt
//!   and a summary, written when the run ends
//!
//! Raw passwords are never persisted; attempt records keep the length only.

use chrono::{DateTime, Local};
use pendo_engine::{AttemptEvent, AttemptObserver, RunSummary};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// File name prefix shared by the text log and the JSON record
pub const SESSION_PREFIX: &str = "pendo_session_";

/// Session record errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported export format: {0} (expected json or csv)")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// One attempt as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub timestamp: DateTime<Local>,
    pub username: String,
    pub password_length: usize,
    pub success: bool,
    pub target: String,
}

/// End-of-session statistics as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub duration_seconds: f64,
    pub attempts_per_second: f64,
}

impl From<&RunSummary> for SessionSummary {
    fn from(summary: &RunSummary) -> Self {
        Self {
            total_attempts: summary.total,
            successes: summary.successes,
            failures: summary.failures,
            duration_seconds: summary.elapsed_secs,
            attempts_per_second: summary.attempts_per_second(),
        }
    }
}

/// The structured session record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub start_time: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Local>>,
    pub attempts: Vec<AttemptRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SessionSummary>,
}

/// Totals recounted from the recorded attempts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionTally {
    pub total_attempts: usize,
    pub successes: usize,
    pub failures: usize,
    pub start_time: DateTime<Local>,
}

/// Export format for `--export`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(SessionError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Writes the text log as the run goes and the JSON record at the end.
///
/// Implements [`AttemptObserver`] so the engine feeds it directly. Write
/// failures inside observer callbacks are logged and do not stop the run.
pub struct SessionRecorder {
    dir: PathBuf,
    log_path: PathBuf,
    json_path: PathBuf,
    log_file: File,
    record: SessionRecord,
}

impl SessionRecorder {
    /// Start a session in `dir`, creating it if needed.
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let now = Local::now();
        let stamp = now.format("%Y%m%d_%H%M%S");
        let log_path = dir.join(format!("{}{}.log", SESSION_PREFIX, stamp));
        let json_path = dir.join(format!("{}{}.json", SESSION_PREFIX, stamp));
        let log_file = OpenOptions::new().create(true).append(true).open(&log_path)?;

        let mut recorder = Self {
            dir: dir.to_path_buf(),
            log_path,
            json_path,
            log_file,
            record: SessionRecord {
                start_time: now,
                end_time: None,
                attempts: Vec::new(),
                summary: None,
            },
        };
        recorder.write_log("INFO", "PenDo session started")?;
        debug!(path = %recorder.log_path.display(), "Session log opened");
        Ok(recorder)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn is_finished(&self) -> bool {
        self.record.end_time.is_some()
    }

    fn write_log(&mut self, level: &str, message: &str) -> Result<()> {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(self.log_file, "[{}] {}: {}", stamp, level, message)?;
        Ok(())
    }

    pub fn log_info(&mut self, message: &str) -> Result<()> {
        self.write_log("INFO", message)
    }

    pub fn log_error(&mut self, message: &str) -> Result<()> {
        self.write_log("ERROR", message)
    }

    /// Record one attempt (text line + structured record).
    pub fn log_attempt(&mut self, record: AttemptRecord) -> Result<()> {
        let status = if record.success { "SUCCESS" } else { "FAILED" };
        let line = format!(
            "Target: {}, User: {}, Status: {}",
            record.target, record.username, status
        );
        self.record.attempts.push(record);
        self.write_log("ATTEMPT", &line)
    }

    /// Close the session: stamp the end time, store the summary and write
    /// the JSON record. Returns the JSON path.
    pub fn finish(&mut self, summary: &RunSummary) -> Result<PathBuf> {
        self.record.end_time = Some(Local::now());
        self.record.summary = Some(SessionSummary::from(summary));

        self.write_log(
            "INFO",
            &format!(
                "Session ended - Attempts: {}, Successes: {}",
                summary.total, summary.successes
            ),
        )?;
        self.log_file.flush()?;

        let json = serde_json::to_string_pretty(&self.record)?;
        fs::write(&self.json_path, json)?;
        debug!(path = %self.json_path.display(), "Session record saved");
        Ok(self.json_path.clone())
    }

    /// Note a fatal error and close the session if the run never did.
    ///
    /// Both steps are attempted; the first failure is returned.
    pub fn record_failure(&mut self, message: &str) -> Result<()> {
        let logged = self.log_error(message);
        let finished = if self.is_finished() {
            Ok(())
        } else {
            let empty = RunSummary {
                total: 0,
                successes: 0,
                failures: 0,
                elapsed_secs: 0.0,
            };
            self.finish(&empty).map(|_| ())
        };
        logged.and(finished)
    }

    /// Recount totals from the recorded attempts.
    pub fn session_summary(&self) -> SessionTally {
        let successes = self.record.attempts.iter().filter(|a| a.success).count();
        SessionTally {
            total_attempts: self.record.attempts.len(),
            successes,
            failures: self.record.attempts.len() - successes,
            start_time: self.record.start_time,
        }
    }

    /// Export the session next to the logs (or to `filename` inside the
    /// logs directory). CSV holds the attempt records only; an empty session
    /// yields an empty CSV file.
    pub fn export(&self, format: ExportFormat, filename: Option<&str>) -> Result<PathBuf> {
        let name = match filename {
            Some(name) => name.to_string(),
            None => format!(
                "pendo_export_{}.{}",
                Local::now().format("%Y%m%d_%H%M%S"),
                format.extension()
            ),
        };
        let path = self.dir.join(name);

        match format {
            ExportFormat::Json => {
                fs::write(&path, serde_json::to_string_pretty(&self.record)?)?;
            }
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_path(&path)?;
                for attempt in &self.record.attempts {
                    writer.serialize(attempt)?;
                }
                writer.flush()?;
            }
        }
        Ok(path)
    }
}

impl AttemptObserver for SessionRecorder {
    fn on_attempt(&mut self, event: &AttemptEvent<'_>) {
        let record = AttemptRecord {
            timestamp: event.at.with_timezone(&Local),
            username: event.username.to_string(),
            password_length: event.password.chars().count(),
            success: event.success,
            target: event.target_mode.to_string(),
        };
        if let Err(e) = self.log_attempt(record) {
            warn!("Failed to write session log: {}", e);
        }
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        if let Err(e) = self.finish(summary) {
            warn!("Failed to save session record: {}", e);
        }
    }
}
