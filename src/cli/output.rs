//! Styled terminal output
//!
//! Results go to stdout; messages, warnings and progress go to stderr so
//! result listings stay pipeable.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("✔").green(), message);
        }
    }

    /// Errors are shown even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Only shown with `-v`
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            eprintln!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn category(&self, category: &str) {
        if !self.quiet {
            println!("\n{}", style(category).bold().cyan());
        }
    }

    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        if !self.quiet {
            let styled_value = if highlight {
                style(value).green().bold()
            } else {
                style(value).white()
            };
            println!("  {:<16} {}", style(key).dim(), styled_value);
        }
    }

    /// Summary line on stderr, e.g. `Files found (12)`
    pub fn count(&self, message: &str, count: usize) {
        if !self.quiet {
            eprintln!(
                "{} {} {}",
                style("►").cyan().bold(),
                style(message).bold(),
                style(format!("({})", count)).dim()
            );
        }
    }

    pub fn summary_stats(&self, label: &str, value: usize) {
        if !self.quiet {
            eprintln!("  {:<22} {}", style(label).dim(), style(value.to_string()).bold());
        }
    }

    /// File header of a content match listing
    pub fn file_header(&self, path: &str) {
        println!("{}", style(path).magenta().bold());
    }

    /// One matching line
    pub fn match_line(&self, line_number: u64, column: usize, text: &str) {
        println!(
            "{}:{}:{}",
            style(line_number.to_string()).green(),
            style(column.to_string()).dim(),
            text
        );
    }

    /// Spinner for indefinite progress; hidden in quiet mode
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        let template = "{spinner:.green} {msg} [{elapsed}]";
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template(template) {
            pb.set_style(spinner_style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
