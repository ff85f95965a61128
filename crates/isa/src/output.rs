//! Colored terminal output for the ISA commands.

use console::{Style, Term};
use isa_batch::{LocalRecord, SubmitReport};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    pub(crate) fn simulation_notice(&self) {
        self.warning("Simulation mode: edits are not sent to the platform");
    }

    /// Print the outcome of a submitted batch.
    ///
    /// Green when every intent was confirmed, yellow for a partial batch or
    /// a missing local record.
    pub(crate) fn submit_report(&self, report: &SubmitReport) {
        let summary = report_summary(report);
        if report.confirmed == report.total {
            self.success(&summary);
        } else {
            self.warning(&summary);
        }
        self.info(&format!("Revision: {}", report.revision));

        if report.local_record == LocalRecord::Missing {
            self.warning("Warning: the edits were applied but could not be recorded locally.");
        }
    }

    /// Print a contributor's rejected depict items for one file.
    pub(crate) fn rejected_depicts(&self, user: &str, file: &str, depicts: &[String]) {
        if depicts.is_empty() {
            self.info(&format!("No rejected suggestions for {file} by {user}"));
            return;
        }

        self.highlight(&format!(
            "Rejected suggestions for {file} ({}):",
            depicts.len()
        ));
        for item in depicts {
            self.info(&format!("  - {item}"));
        }
    }
}

fn report_summary(report: &SubmitReport) -> String {
    if report.confirmed == report.total {
        format!("\nAll {} edit(s) confirmed.", report.confirmed)
    } else {
        format!(
            "\n{} of {} edit(s) confirmed; the batch stopped after {} attempt(s).",
            report.confirmed, report.total, report.attempted
        )
    }
}
