//! Console implementations of the UI collaborator traits

use std::io::{self, Write};
use std::sync::Mutex;

use crate::api::types::TokenRecord;

use super::format::{DefaultStatusFormatter, StatusFormatter};
use super::{ConfirmGate, Notifier, ProgressSink, Renderer, Tone};

/// Interactive confirmation via stdin, defaulting to "no"
pub struct ConsoleGate;

impl ConfirmGate for ConsoleGate {
    fn confirm(&self, prompt: &str) -> bool {
        eprintln!("{}", prompt);
        eprint!("[y/N] ");
        let _ = io::stderr().flush();

        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Gate that accepts everything, backing the `--yes` flag
pub struct AutoConfirm;

impl ConfirmGate for AutoConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(
            "Auto-confirmed: {}",
            prompt.lines().next().unwrap_or(prompt)
        );
        true
    }
}

/// Single rewritten status line on stderr
#[derive(Default)]
pub struct ConsoleProgress {
    label: Mutex<String>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for ConsoleProgress {
    fn busy(&self, label: &str) {
        *self.label.lock().expect("progress label lock") = label.to_string();
    }

    fn tick(&self, done: usize, total: usize) {
        let label = self.label.lock().expect("progress label lock");
        eprint!("\r{} {}/{}  ", label, done, total);
        let _ = io::stderr().flush();
    }

    fn idle(&self) {
        self.label.lock().expect("progress label lock").clear();
        // Clear the status line
        eprint!("\r\x1b[2K");
        let _ = io::stderr().flush();
    }
}

/// Toast-equivalent notifications on the terminal
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, tone: Tone, message: &str) {
        match tone {
            Tone::Info => println!("{}", message),
            Tone::Success => println!("[ok] {}", message),
            Tone::Error => eprintln!("[error] {}", message),
        }
    }
}

/// Token table renderer with an injected cell-formatting strategy
pub struct ConsoleRenderer {
    formatter: Box<dyn StatusFormatter>,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::with_formatter(Box::new(DefaultStatusFormatter))
    }

    pub fn with_formatter(formatter: Box<dyn StatusFormatter>) -> Self {
        Self { formatter }
    }
}

impl Renderer for ConsoleRenderer {
    fn render(&self, tokens: &[TokenRecord]) {
        println!(
            "{:<30} {:<9} {:<8} {:>7}  {:<12} {:<10} {:<26} {:<16} {}",
            "EMAIL", "STATUS", "HEALTH", "REMAIN", "CLIENT", "PLAN", "EXPIRY", "STATS", "REMARK"
        );
        for t in tokens {
            let image = if t.image_enabled {
                t.image_count.unwrap_or(0).to_string()
            } else {
                "-".to_string()
            };
            let video = if t.video_enabled && t.sora2_supported {
                t.video_count.unwrap_or(0).to_string()
            } else {
                "-".to_string()
            };
            let stats = format!("i:{} v:{} e:{}", image, video, t.error_count.unwrap_or(0));
            println!(
                "{:<30} {:<9} {:<8} {:>7}  {:<12} {:<10} {:<26} {:<16} {}",
                t.email,
                self.formatter.activation(t),
                self.formatter.health(t),
                self.formatter.remaining(t),
                t.client_id.as_deref().unwrap_or("-"),
                t.plan_type.as_deref().unwrap_or("-"),
                self.formatter.expiry(t),
                stats,
                t.remark.as_deref().unwrap_or("-"),
            );
        }
        println!("{} tokens", tokens.len());
    }
}
