//! PenDo - Educational brute-force simulation
//!
//! Loads a wordlist, pairs every password with one username and checks it
//! against an answer hidden in the same list. Nothing ever leaves the
//! machine: target modes other than `simulation` always fail.
//!
//! - **Session record**: text log + JSON record under `$PENDO_HOME/logs`
//! - **Graceful interrupt**: SIGINT/SIGTERM stop the run after the current
//!   attempt; statistics are still printed and saved

use anyhow::{Context, Result};
use clap::Parser;
use pendo::cli::{select_renderer, validate_inputs, Console, SessionInfo};
use pendo::session::{ExportFormat, SessionRecorder};
use pendo_engine::variations::expand_candidates;
use pendo_engine::{
    load_wordlist, AttemptEngine, CancellationToken, EngineConfig, EngineError, ObserverSet,
    DEFAULT_DELAY_SECS, SIMULATION_MODE,
};
use pendo_logging::{init_logging, LogConfig, PendoDirs};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{self, ExitCode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "pendo",
    version,
    about = "PenDo - Educational Penetration Testing Tool",
    after_help = "Example: pendo --username admin --wordlist passwords.txt --target simulation"
)]
struct Cli {
    /// Target username for the brute force simulation
    #[arg(short = 'u', long, env = "PENDO_USERNAME")]
    username: String,

    /// Path to password wordlist file
    #[arg(short = 'w', long, env = "PENDO_WORDLIST")]
    wordlist: PathBuf,

    /// Target service (only `simulation` can ever succeed)
    #[arg(short = 't', long, env = "PENDO_TARGET", default_value = SIMULATION_MODE)]
    target: String,

    /// Delay between attempts in seconds
    #[arg(
        short = 'd',
        long,
        env = "PENDO_DELAY",
        default_value_t = DEFAULT_DELAY_SECS,
        allow_negative_numbers = true
    )]
    delay: f64,

    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Accept the ethical-use agreement without prompting
    #[arg(short = 'y', long)]
    yes: bool,

    /// Expand every password with common variations (l33t, suffixes, case)
    #[arg(long)]
    expand: bool,

    /// Export the session attempts after the run (json or csv)
    #[arg(long, value_name = "FORMAT")]
    export: Option<ExportFormat>,

    /// Print the run result as JSON on stdout; human output goes to stderr
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut console = console_for(cli.json, cli.no_color);

    match run(&cli, &mut console) {
        Ok(code) => code,
        Err(err) => {
            error!("Fatal: {:#}", err);
            if let Err(e) = console.error(&format!("{:#}", err)) {
                eprintln!("Unexpected error: {:#} ({})", err, e);
            }
            ExitCode::from(1)
        }
    }
}

/// Human output goes to stdout, or to plain stderr when stdout carries JSON.
fn console_for(json: bool, no_color: bool) -> Console<Box<dyn Write>> {
    if json {
        Console::new(Box::new(io::stderr()), select_renderer(true))
    } else {
        Console::new(Box::new(io::stdout()), select_renderer(no_color))
    }
}

fn run(cli: &Cli, console: &mut Console<Box<dyn Write>>) -> Result<ExitCode> {
    let interrupts = InterruptGate::install(cli.json, cli.no_color)?;

    console.banner()?;
    console.disclaimer()?;
    if !cli.yes && !console.confirm_ethical_use(io::stdin().lock())? {
        return Ok(ExitCode::from(1));
    }

    let errors = validate_inputs(&cli.username, &cli.wordlist, cli.delay);
    if !errors.is_empty() {
        console.validation_errors(&errors)?;
        return Ok(ExitCode::from(1));
    }

    let dirs = PendoDirs::from_env();
    init_logging(&LogConfig::new("pendo", dirs.clone()).verbose(cli.verbose))?;

    let mut candidates = load_wordlist(&cli.wordlist)?;
    info!(count = candidates.len(), "Loaded passwords from wordlist");
    if cli.expand {
        candidates = expand_candidates(&candidates);
        info!(count = candidates.len(), "Expanded wordlist with variations");
    }

    let mut recorder =
        SessionRecorder::create(&dirs.logs()).context("Failed to start session log")?;
    interrupts.open_session();
    info!(path = %recorder.log_path().display(), "Logging session");

    let outcome = run_session(cli, candidates, console, &mut recorder, interrupts.token());

    if let Err(err) = &outcome {
        // Keep the record complete even when the run never started
        if let Err(e) = recorder.record_failure(&format!("{:#}", err)) {
            warn!("Failed to record error in session: {}", e);
        }
    }

    if let Some(format) = cli.export {
        let path = recorder
            .export(format, None)
            .with_context(|| format!("Failed to export session as {}", format.extension()))?;
        console.exported(&path)?;
    }
    info!(path = %recorder.json_path().display(), "Session data saved");

    outcome
}

fn run_session(
    cli: &Cli,
    candidates: Vec<String>,
    console: &mut Console<Box<dyn Write>>,
    recorder: &mut SessionRecorder,
    cancel: &CancellationToken,
) -> Result<ExitCode> {
    let config = EngineConfig::new(cli.username.trim())
        .with_target_mode(cli.target.as_str())
        .with_delay_secs(cli.delay);
    let mut engine = AttemptEngine::new(config, candidates)?;

    console.session_info(&SessionInfo {
        target: &cli.target,
        username: &cli.username,
        wordlist: &cli.wordlist.display().to_string(),
        delay_secs: cli.delay,
        candidates: engine.candidates().len(),
    })?;

    // JSON mode keeps stderr for human output only
    if !cli.json {
        console.start_progress(engine.candidates().len() as u64);
    }

    let outcome = {
        let mut observers = ObserverSet::new()
            .with(&mut *console)
            .with(&mut *recorder);
        engine.run(&mut observers, cancel)
    };

    match outcome {
        Ok(result) => {
            console.verdict(&result)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(EngineError::Interrupted { summary }) => {
            console.interrupted()?;
            recorder.log_info("Session interrupted by user")?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "interrupted": true,
                        "summary": summary,
                    }))?
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Err(err.into()),
    }
}

/// Handles SIGINT/SIGTERM (Ctrl+C on Windows) for the whole process.
///
/// Until a session is open there is nothing to save, so an interrupt prints
/// the notice and exits 0 straight away. Afterwards it only cancels the run,
/// which stops after the current attempt and finalizes the record.
struct InterruptGate {
    cancel: CancellationToken,
    session_open: Arc<AtomicBool>,
}

impl InterruptGate {
    fn install(json: bool, no_color: bool) -> Result<Self> {
        let gate = Self {
            cancel: CancellationToken::new(),
            session_open: Arc::new(AtomicBool::new(false)),
        };
        let cancel = gate.cancel.clone();
        let session_open = Arc::clone(&gate.session_open);
        let on_interrupt = move || {
            if session_open.load(Ordering::SeqCst) {
                info!("Interrupt received, stopping after the current attempt");
                cancel.cancel();
                return;
            }
            info!("Interrupt received before the session started");
            if let Err(e) = console_for(json, no_color).interrupted() {
                warn!("Failed to write interrupt notice: {}", e);
            }
            process::exit(0);
        };

        #[cfg(unix)]
        {
            use signal_hook::consts::{SIGINT, SIGTERM};
            use signal_hook::iterator::Signals;

            let mut signals = Signals::new([SIGINT, SIGTERM])?;
            std::thread::spawn(move || {
                for sig in signals.forever() {
                    debug!("Received signal {}", sig);
                    on_interrupt();
                }
            });
        }

        #[cfg(windows)]
        {
            ctrlc::set_handler(on_interrupt)?;
        }

        Ok(gate)
    }

    fn open_session(&self) {
        self.session_open.store(true, Ordering::SeqCst);
    }

    fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}
