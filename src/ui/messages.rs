//! Human-facing CLI output. Server-side events go through `tracing` instead.

use std::fmt::Display;

#[derive(Clone, Copy)]
enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

impl Tone {
    fn style(self) -> (&'static str, &'static str) {
        match self {
            Tone::Info => ("\x1b[34m", "ℹ️"),
            Tone::Success => ("\x1b[32m", "✅"),
            Tone::Warning => ("\x1b[33m", "⚠️"),
            Tone::Error => ("\x1b[31m", "❌"),
        }
    }
}

fn line(tone: Tone, msg: impl Display) -> String {
    let (color, icon) = tone.style();
    format!("{color}\x1b[1m{icon}\x1b[0m {msg}")
}

pub fn info(msg: impl Display) {
    println!("{}", line(Tone::Info, msg));
}

pub fn success(msg: impl Display) {
    println!("{}", line(Tone::Success, msg));
}

pub fn warning(msg: impl Display) {
    println!("{}", line(Tone::Warning, msg));
}

/// Errors go to stderr so scripted `list` output stays clean.
pub fn error(msg: impl Display) {
    eprintln!("{}", line(Tone::Error, msg));
}
