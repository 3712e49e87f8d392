//! CLI Output Formatting Module
//! Provides consistent, colorized output for update runs

use crate::engine::updater::{RunMode, RunSummary, UpdateOutcome};
use colored::Colorize;

pub struct CliFormatter;

impl CliFormatter {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green().bold(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue().bold(), message);
    }

    /// Print a section header
    pub fn header(title: &str) {
        println!("\n{}", title.bright_cyan().bold());
        println!("{}", "─".repeat(title.chars().count()).bright_black());
    }

    /// Print a list item
    pub fn item(text: &str) {
        println!("  {} {}", "•".bright_black(), text);
    }

    /// Print the result of an update run
    pub fn summary(summary: &RunSummary) {
        if summary.is_up_to_date() {
            Self::success(&headline(summary));
            return;
        }

        match summary.mode {
            RunMode::ListOnly => {
                Self::header("Updates are available");
                for path in summary.available() {
                    Self::item(&path.display().to_string());
                }
                println!();
                Self::info("Run `shoebill-updater update` to download them.");
            }
            RunMode::Download => {
                Self::header("Downloads");
                for item in &summary.items {
                    if let UpdateOutcome::Downloaded { path } = &item.outcome {
                        Self::item(&format!("{} {}", path.display(), "replaced".green()));
                    }
                }
                println!();
                if summary.failed == 0 {
                    Self::success(&headline(summary));
                } else {
                    Self::warning(&headline(summary));
                }
                if summary.succeeded > 0 {
                    Self::info("Make sure your configuration files reference the new file versions.");
                }
            }
        }

        for (filename, reason) in summary.failures() {
            Self::error(&format!("{}: {}", filename, reason));
        }
    }
}

/// One-line description of a run's outcome
pub fn headline(summary: &RunSummary) -> String {
    if summary.is_up_to_date() {
        return "All files are up-to-date!".to_string();
    }
    match summary.mode {
        RunMode::ListOnly => format!(
            "{} of {} offered updates can be applied",
            summary.available().count(),
            summary.total
        ),
        RunMode::Download if summary.failed == 0 => {
            format!("All {} downloads finished", summary.succeeded)
        }
        RunMode::Download => format!(
            "{} of {} downloads failed ({} succeeded)",
            summary.failed, summary.total, summary.succeeded
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::updater::apply::ItemReport;
    use std::path::PathBuf;

    fn summary(mode: RunMode, outcomes: Vec<UpdateOutcome>) -> RunSummary {
        let succeeded = outcomes
            .iter()
            .filter(|o| matches!(o, UpdateOutcome::Downloaded { .. }))
            .count();
        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, UpdateOutcome::Failed { .. }))
            .count();
        RunSummary {
            mode,
            total: outcomes.len(),
            succeeded,
            failed,
            marker_created: succeeded > 0,
            items: outcomes
                .into_iter()
                .map(|outcome| ItemReport {
                    filename: "Shoebill".to_string(),
                    kind: "Plugin".to_string(),
                    outcome,
                })
                .collect(),
        }
    }

    #[test]
    fn test_headline_up_to_date() {
        for mode in [RunMode::ListOnly, RunMode::Download] {
            assert_eq!(headline(&summary(mode, vec![])), "All files are up-to-date!");
        }
    }

    #[test]
    fn test_headline_partial_failure() {
        let s = summary(
            RunMode::Download,
            vec![
                UpdateOutcome::Downloaded { path: PathBuf::from("a") },
                UpdateOutcome::Failed { reason: "network".to_string() },
                UpdateOutcome::Downloaded { path: PathBuf::from("c") },
            ],
        );
        assert_eq!(headline(&s), "1 of 3 downloads failed (2 succeeded)");
    }

    #[test]
    fn test_headline_list_only() {
        let s = summary(
            RunMode::ListOnly,
            vec![
                UpdateOutcome::Skipped { path: PathBuf::from("a") },
                UpdateOutcome::Failed { reason: "Invalid file type X".to_string() },
            ],
        );
        assert_eq!(headline(&s), "1 of 2 offered updates can be applied");
    }
}
