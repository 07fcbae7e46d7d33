//! Terminal styling
//!
//! Styling goes through an injected [`Renderer`]; nothing here touches
//! process-wide terminal state. [`Plain`] is the fallback for `--no-color`,
//! `NO_COLOR` and non-terminal output.

use crossterm::style::{Color, Stylize};
use std::io::IsTerminal;

/// Semantic colour of a piece of output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Section headers, session info
    Info,
    /// Ordinary detail lines
    Normal,
    Success,
    Failure,
    Warning,
    /// Banner
    Accent,
}

impl Tone {
    fn color(&self) -> Color {
        match self {
            Tone::Info => Color::Cyan,
            Tone::Normal => Color::White,
            Tone::Success => Color::Green,
            Tone::Failure => Color::Red,
            Tone::Warning => Color::Yellow,
            Tone::Accent => Color::DarkGreen,
        }
    }
}

/// Turns text plus a tone into printable text.
pub trait Renderer: Send + Sync {
    fn paint(&self, tone: Tone, text: &str) -> String;

    /// Whether output carries escape sequences
    fn is_colored(&self) -> bool;
}

/// ANSI colours via crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct Colored;

impl Renderer for Colored {
    fn paint(&self, tone: Tone, text: &str) -> String {
        text.with(tone.color()).to_string()
    }

    fn is_colored(&self) -> bool {
        true
    }
}

/// Text unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Plain;

impl Renderer for Plain {
    fn paint(&self, _tone: Tone, text: &str) -> String {
        text.to_string()
    }

    fn is_colored(&self) -> bool {
        false
    }
}

/// Pick a renderer: plain when asked, when `NO_COLOR` is set, or when stdout
/// is not a terminal.
pub fn select_renderer(no_color: bool) -> Box<dyn Renderer> {
    let env_no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    if no_color || env_no_color || !std::io::stdout().is_terminal() {
        Box::new(Plain)
    } else {
        Box::new(Colored)
    }
}
