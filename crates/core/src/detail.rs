//! State of the bug details view.
//!
//! Holds the selected bug, its fetched assignees, the status draft a
//! developer is editing, and the text extracted from its screenshot.
//! Extraction is guarded by a busy flag so only one runs per record, and
//! results are tagged so a result for a previously selected bug is
//! discarded instead of overwriting the current one.

use crate::bug::{BugRecord, BugStatus};
use crate::busy::BusyFlag;
use crate::error::CoreError;
use crate::types::DbId;
use crate::user::UserSummary;

/// The one notice shown when screenshot text extraction fails.
pub const EXTRACTION_FAILED_MESSAGE: &str =
    "Error reading image. Ensure the image is clear and try again.";

/// Issued by [`BugDetail::begin_extraction`]; carries what the extractor
/// needs and identifies the run when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionTicket {
    pub bug_id: DbId,
    pub screenshot_url: String,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Text (possibly empty) is now shown.
    Extracted(String),
    /// Extraction failed; show `notice` once.
    Failed { notice: &'static str },
    /// The selected bug changed while extracting; nothing was applied.
    Stale,
}

#[derive(Debug)]
pub struct BugDetail {
    bug: BugRecord,
    status_draft: BugStatus,
    assignees: Vec<UserSummary>,
    extracted_text: String,
    extraction: BusyFlag,
    status_update: BusyFlag,
    generation: u64,
}

impl BugDetail {
    pub fn new(bug: BugRecord) -> Self {
        Self {
            status_draft: bug.status,
            bug,
            assignees: Vec::new(),
            extracted_text: String::new(),
            extraction: BusyFlag::default(),
            status_update: BusyFlag::default(),
            generation: 0,
        }
    }

    pub fn bug(&self) -> &BugRecord {
        &self.bug
    }

    /// Show another bug. Selecting a different record clears the
    /// extracted text and orphans any extraction still running for the
    /// old one.
    pub fn select(&mut self, bug: BugRecord) {
        let changed = bug.id != self.bug.id;
        self.status_draft = bug.status;
        self.bug = bug;
        if changed {
            self.generation += 1;
            self.extracted_text.clear();
            self.assignees.clear();
            self.extraction.release();
            self.status_update.release();
        }
    }

    pub fn assignees(&self) -> &[UserSummary] {
        &self.assignees
    }

    pub fn set_assignees(&mut self, assignees: Vec<UserSummary>) {
        self.assignees = assignees;
    }

    // -- screenshot text ---------------------------------------------------

    pub fn extracted_text(&self) -> &str {
        &self.extracted_text
    }

    pub fn is_extracting(&self) -> bool {
        self.extraction.is_busy()
    }

    /// Start an extraction for the selected bug. Clears any earlier text
    /// for this bug. Fails if the bug has no screenshot or an extraction
    /// is already running.
    pub fn begin_extraction(&mut self) -> Result<ExtractionTicket, CoreError> {
        let screenshot_url = self.bug.screenshot_url.clone().ok_or_else(|| {
            CoreError::Validation(format!("Bug {} has no screenshot attached", self.bug.id))
        })?;
        if !self.extraction.try_acquire() {
            return Err(CoreError::Conflict(format!(
                "Text extraction already running for bug {}",
                self.bug.id
            )));
        }
        self.extracted_text.clear();
        Ok(ExtractionTicket {
            bug_id: self.bug.id,
            screenshot_url,
            generation: self.generation,
        })
    }

    /// Apply the result of an extraction run. `result` carries the
    /// cleaned text or the reason it failed (logged, never shown).
    pub fn finish_extraction<E: std::fmt::Display>(
        &mut self,
        ticket: &ExtractionTicket,
        result: Result<String, E>,
    ) -> ExtractionOutcome {
        if ticket.generation != self.generation || ticket.bug_id != self.bug.id {
            tracing::debug!(bug_id = ticket.bug_id, "Dropping extraction result for deselected bug");
            return ExtractionOutcome::Stale;
        }
        self.extraction.release();
        match result {
            Ok(text) => {
                self.extracted_text = text.clone();
                ExtractionOutcome::Extracted(text)
            }
            Err(e) => {
                tracing::warn!(bug_id = ticket.bug_id, error = %e, "Screenshot text extraction failed");
                ExtractionOutcome::Failed {
                    notice: EXTRACTION_FAILED_MESSAGE,
                }
            }
        }
    }

    // -- status --------------------------------------------------------------

    pub fn status_draft(&self) -> BugStatus {
        self.status_draft
    }

    pub fn set_status_draft(&mut self, status: BugStatus) {
        self.status_draft = status;
    }

    /// Claim the status-update action; returns the status to submit.
    pub fn begin_status_update(&mut self) -> Result<BugStatus, CoreError> {
        if !self.status_update.try_acquire() {
            return Err(CoreError::Conflict("Status update already in progress".into()));
        }
        Ok(self.status_draft)
    }

    pub fn finish_status_update(&mut self, succeeded: bool) {
        self.status_update.release();
        if succeeded {
            self.bug.status = self.status_draft;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
