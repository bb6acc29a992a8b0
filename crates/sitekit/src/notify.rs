//! Mutation lifecycle messages on stderr.

use std::io::{self, Write};

use async_trait::async_trait;
use owo_colors::OwoColorize;
use tracing::debug;

use sitekit_core::Notifier;

/// Prints progress and success lines to stderr.
///
/// Failures are only logged here: the command's error report shows them.
pub struct CliNotifier {
    quiet: bool,
    color: bool,
}

impl CliNotifier {
    pub fn new(quiet: bool, color: bool) -> Self {
        Self { quiet, color }
    }

    fn emit(&self, line: &str) {
        if self.quiet {
            return;
        }
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

#[async_trait]
impl Notifier for CliNotifier {
    async fn on_started(&self, message: &str) {
        if self.color {
            self.emit(&message.dimmed().to_string());
        } else {
            self.emit(message);
        }
    }

    async fn on_succeeded(&self, message: &str) {
        if self.color {
            self.emit(&format!("{} {message}", "✓".green().bold()));
        } else {
            self.emit(&format!("✓ {message}"));
        }
    }

    async fn on_failed(&self, message: &str) {
        debug!(message, "mutation failed");
    }
}
