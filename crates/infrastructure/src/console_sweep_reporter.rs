//! Console progress output for approval sweeps.

use std::io::{Stdout, Write};
use std::sync::Mutex;

use tracing::{debug, info};
use wikiapprove_application::{ApprovalSweepSummary, PageApproved, PageSkipped, SweepReporter};
use wikiapprove_core::{AppError, AppResult};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes one human-readable line per approval and a closing summary.
///
/// Lines are also mirrored as structured `tracing` events.
pub struct ConsoleSweepReporter<W: Write + Send = Stdout> {
    writer: Mutex<W>,
}

impl ConsoleSweepReporter<Stdout> {
    /// Creates a reporter writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleSweepReporter<W> {
    /// Creates a reporter writing to the given sink.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the sink, consuming the reporter.
    pub fn into_inner(self) -> AppResult<W> {
        self.writer
            .into_inner()
            .map_err(|_| AppError::Internal("console reporter lock poisoned".to_owned()))
    }

    fn write_line(&self, line: &str) -> AppResult<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| AppError::Internal("console reporter lock poisoned".to_owned()))?;

        writeln!(writer, "{line}")
            .and_then(|()| writer.flush())
            .map_err(|error| {
                AppError::Internal(format!("failed to write sweep progress: {error}"))
            })
    }
}

impl<W: Write + Send> SweepReporter for ConsoleSweepReporter<W> {
    fn page_approved(&self, event: &PageApproved) -> AppResult<()> {
        info!(
            page_id = %event.page_id,
            revision_id = %event.revision_id,
            previous_revision_id = ?event.previous_revision_id.map(|revision| revision.as_i64()),
            title = %event.title,
            "approved latest revision"
        );

        self.write_line(
            format!(
                "{} Approved the last revision of page \"{}\".",
                event.approved_at.format(TIMESTAMP_FORMAT),
                event.title
            )
            .as_str(),
        )
    }

    fn page_skipped(&self, event: &PageSkipped) -> AppResult<()> {
        debug!(
            page_id = %event.page_id,
            reason = event.reason.as_str(),
            "page skipped"
        );

        Ok(())
    }

    fn sweep_finished(&self, summary: &ApprovalSweepSummary) -> AppResult<()> {
        info!(
            pages_visited = summary.pages_visited,
            approved = summary.approved,
            filtered_out = summary.filtered_out,
            not_approvable = summary.not_approvable,
            already_approved = summary.already_approved,
            already_current = summary.already_current,
            "approval sweep finished"
        );

        self.write_line(
            format!(
                "\nFinished setting all current revisions to approved. \
                 Approved {} of {} pages ({} skipped).",
                summary.approved,
                summary.pages_visited,
                summary.skipped()
            )
            .as_str(),
        )
    }
}
