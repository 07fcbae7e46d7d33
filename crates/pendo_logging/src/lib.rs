//! Tracing setup and on-disk layout for PenDo.
//!
//! Everything PenDo writes lives under one home directory:
//!
//! ```text
//! $PENDO_HOME (default ~/.pendo)
//! └── logs/
//!     ├── pendo.log, pendo.log.1 ..   tracing output, rotated by size
//!     └── pendo_session_*.{log,json}  per-run session records
//! ```
//!
//! The file layer always records at `RUST_LOG` (or [`DEFAULT_LOG_FILTER`]).
//! The console only gets warnings unless the run is verbose, so attempt lines
//! on stdout stay readable.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable overriding the PenDo home directory
pub const HOME_ENV: &str = "PENDO_HOME";

/// File-layer filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "pendo=info,pendo_engine=info";

/// Console filter for non-verbose runs
const QUIET_CONSOLE_FILTER: &str = "warn";

/// Where PenDo keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendoDirs {
    home: PathBuf,
}

impl PendoDirs {
    /// Resolve the home directory: `$PENDO_HOME`, then `~/.pendo`, then `./.pendo`.
    pub fn from_env() -> Self {
        let home = match std::env::var_os(HOME_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".pendo"),
        };
        Self { home }
    }

    /// Use an explicit home directory.
    pub fn at(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Tracing logs and session records share this directory.
    pub fn logs(&self) -> PathBuf {
        self.home.join("logs")
    }

    /// Create the logs directory if needed and return it.
    pub fn ensure_logs(&self) -> Result<PathBuf> {
        let logs = self.logs();
        fs::create_dir_all(&logs)
            .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
        Ok(logs)
    }
}

/// Size limits for the tracing log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    /// Files kept in total, the live one included
    pub max_files: usize,
    /// Size at which the live file is rolled over
    pub max_bytes: u64,
}

impl Default for Rotation {
    fn default() -> Self {
        // Runs are short; a few MiB covers many sessions of attempt logs
        Self {
            max_files: 3,
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// How to set up tracing for one process.
#[derive(Debug, Clone)]
pub struct LogConfig<'a> {
    /// Stem of the tracing log file (`<app_name>.log`)
    pub app_name: &'a str,
    pub dirs: PendoDirs,
    /// Mirror the file filter on stderr instead of warnings only
    pub verbose: bool,
    pub rotation: Rotation,
}

impl<'a> LogConfig<'a> {
    pub fn new(app_name: &'a str, dirs: PendoDirs) -> Self {
        Self {
            app_name,
            dirs,
            verbose: false,
            rotation: Rotation::default(),
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    fn log_file(&self) -> PathBuf {
        self.dirs.logs().join(format!("{}.log", sanitize_name(self.app_name)))
    }
}

/// Install the global subscriber and return the tracing log file path.
pub fn init_logging(config: &LogConfig<'_>) -> Result<PathBuf> {
    config.dirs.ensure_logs()?;
    let path = config.log_file();
    let file = RotatingFile::open(path.clone(), config.rotation)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let file_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let console_filter = if config.verbose {
        file_filter.clone()
    } else {
        EnvFilter::new(QUIET_CONSOLE_FILTER)
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(path = %path.display(), "Tracing to file");
    Ok(path)
}

/// Append-only file that rolls over to `<file>.1 ..` when it would outgrow
/// `max_bytes`. The oldest backup is dropped once `max_files` is reached.
struct RotatingFile {
    path: PathBuf,
    rotation: Rotation,
    file: File,
    written: u64,
}

impl RotatingFile {
    fn open(path: PathBuf, rotation: Rotation) -> io::Result<Self> {
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            rotation,
            file,
            written,
        })
    }

    fn backup(&self, n: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{}", n));
        PathBuf::from(name)
    }

    fn roll(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let backups = self.rotation.max_files.saturating_sub(1);
        if backups == 0 {
            fs::remove_file(&self.path)?;
        } else {
            remove_if_present(&self.backup(backups))?;
            for n in (1..backups).rev() {
                let from = self.backup(n);
                if from.exists() {
                    fs::rename(&from, self.backup(n + 1))?;
                }
            }
            fs::rename(&self.path, self.backup(1))?;
        }

        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // An oversized record still goes into a fresh file rather than rolling forever
        if self.written > 0 && self.written + buf.len() as u64 > self.rotation.max_bytes {
            self.roll()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Replace anything but `[A-Za-z0-9_-]` so the name is safe as a file stem.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}
