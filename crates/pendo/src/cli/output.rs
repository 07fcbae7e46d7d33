//! Console presentation for a run
//!
//! Provides consistent formatting for:
//! - Banner, disclaimer and session info
//! - One line per attempt, with an optional progress bar on stderr
//! - The stats table and the final verdict

use super::render::{Renderer, Tone};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pendo_engine::{AttemptEvent, AttemptObserver, RunResult, RunSummary};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::warn;

const BANNER: &str = r"
    ____            ____
   / __ \___  ____ / __ \____
  / /_/ / _ \/ __ \/ / / / __ \
 / ____/  __/ / / / /_/ / /_/ /
/_/    \___/_/ /_/_____/\____/

  Educational Penetration Testing Tool
         For Authorized Use Only
";

const DISCLAIMER: &str = "
  DISCLAIMER
  This tool is for EDUCATIONAL and AUTHORIZED TESTING purposes only.
  Only use it on systems you own or have explicit written permission
  to test. Unauthorized access to computer systems is illegal.
  No real connection is ever made: attempts are simulated locally.
";

/// What the session header shows
#[derive(Debug, Clone)]
pub struct SessionInfo<'a> {
    pub target: &'a str,
    pub username: &'a str,
    pub wordlist: &'a str,
    pub delay_secs: f64,
    pub candidates: usize,
}

/// Writes run output to `out`, styled by the injected renderer.
pub struct Console<W: Write> {
    out: W,
    renderer: Box<dyn Renderer>,
    progress: Option<ProgressBar>,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, renderer: Box<dyn Renderer>) -> Self {
        Self {
            out,
            renderer,
            progress: None,
        }
    }

    /// Show a progress bar on stderr for `total` attempts.
    ///
    /// The bar is hidden automatically when stderr is not a terminal.
    pub fn start_progress(&mut self, total: u64) {
        let style = ProgressStyle::with_template("{prefix}: |{bar:50}| {percent}% ({pos}/{len})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█░");
        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr())
            .with_style(style)
            .with_prefix("Testing");
        self.progress = Some(bar);
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, tone: Tone, text: &str) -> io::Result<()> {
        let line = self.renderer.paint(tone, text);
        match &self.progress {
            Some(bar) => {
                let out = &mut self.out;
                bar.suspend(|| writeln!(out, "{}", line))
            }
            None => writeln!(self.out, "{}", line),
        }
    }

    pub fn banner(&mut self) -> io::Result<()> {
        self.emit(Tone::Accent, BANNER)
    }

    pub fn disclaimer(&mut self) -> io::Result<()> {
        self.emit(Tone::Warning, DISCLAIMER)
    }

    /// Ask for the ethical-use agreement; true for `yes`/`y`.
    pub fn confirm_ethical_use<R: BufRead>(&mut self, mut input: R) -> io::Result<bool> {
        write!(
            self.out,
            "\nDo you agree to use this tool ethically? (yes/no): "
        )?;
        self.out.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        let agreed = matches!(answer.trim().to_lowercase().as_str(), "yes" | "y");
        if !agreed {
            self.emit(Tone::Failure, "Ethical use agreement required. Exiting...")?;
        }
        Ok(agreed)
    }

    pub fn validation_errors(&mut self, errors: &[String]) -> io::Result<()> {
        self.emit(Tone::Failure, "Input validation errors:")?;
        for error in errors {
            self.emit(Tone::Failure, &format!("   • {}", error))?;
        }
        Ok(())
    }

    pub fn session_info(&mut self, info: &SessionInfo<'_>) -> io::Result<()> {
        self.emit(Tone::Info, "\nSession Information:")?;
        self.emit(Tone::Normal, &format!("   Target:   {}", info.target))?;
        self.emit(Tone::Normal, &format!("   Username: {}", info.username))?;
        self.emit(
            Tone::Normal,
            &format!("   Wordlist: {} ({} passwords)", info.wordlist, info.candidates),
        )?;
        self.emit(Tone::Normal, &format!("   Delay:    {}s", info.delay_secs))?;
        self.emit(Tone::Success, "\nStarting brute force simulation...\n")
    }

    pub fn attempt_line(&mut self, event: &AttemptEvent<'_>) -> io::Result<()> {
        let (symbol, status, tone) = if event.success {
            ("+", "SUCCESS", Tone::Success)
        } else {
            ("-", "FAILED", Tone::Failure)
        };
        self.emit(
            tone,
            &format!(
                "   [{:04}] {} {}:{} - {}",
                event.seq, symbol, event.username, event.password, status
            ),
        )
    }

    pub fn stats(&mut self, summary: &RunSummary) -> io::Result<()> {
        self.emit(Tone::Info, &stats_table(summary))
    }

    pub fn verdict(&mut self, result: &RunResult) -> io::Result<()> {
        match &result.password {
            Some(password) if result.success => {
                self.emit(Tone::Success, &format!("\nSUCCESS! Password found: {}", password))?;
                self.emit(Tone::Normal, &format!("   Attempts: {}", result.attempts))?;
            }
            _ => {
                self.emit(Tone::Failure, "\nFAILED! No password found.")?;
                self.emit(Tone::Normal, &format!("   Total attempts: {}", result.attempts))?;
            }
        }
        self.emit(
            Tone::Normal,
            &format!("   Time taken: {:.2}s", result.elapsed_secs),
        )?;
        self.emit(Tone::Info, "\nSimulation completed.")
    }

    pub fn exported(&mut self, path: &Path) -> io::Result<()> {
        self.emit(Tone::Info, &format!("Session exported to: {}", path.display()))
    }

    pub fn interrupted(&mut self) -> io::Result<()> {
        self.emit(Tone::Warning, "\nSimulation interrupted by user.")
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        self.emit(Tone::Failure, &format!("\nUnexpected error: {}", message))
    }
}

impl<W: Write> AttemptObserver for Console<W> {
    fn on_attempt(&mut self, event: &AttemptEvent<'_>) {
        if let Err(e) = self.attempt_line(event) {
            warn!("Failed to write attempt line: {}", e);
        }
        if let Some(bar) = &self.progress {
            bar.inc(1);
        }
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        if let Some(bar) = self.progress.take() {
            bar.finish_and_clear();
        }
        if let Err(e) = self.stats(summary) {
            warn!("Failed to write stats: {}", e);
        }
    }
}

/// Render the session stats as a table
pub fn stats_table(summary: &RunSummary) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_header(vec!["SESSION STATS", ""])
        .add_row(vec!["Total Attempts".to_string(), summary.total.to_string()])
        .add_row(vec!["Successes".to_string(), summary.successes.to_string()])
        .add_row(vec!["Failures".to_string(), summary.failures.to_string()])
        .add_row(vec![
            "Time Elapsed".to_string(),
            format!("{:.2}s", summary.elapsed_secs),
        ])
        .add_row(vec![
            "Avg per second".to_string(),
            format!("{:.2}", summary.attempts_per_second()),
        ]);
    table.to_string()
}
