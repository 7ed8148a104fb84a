//! Run summary reported at the end of a build.

use std::fmt;

use serde::Serialize;
use vocadeck_core::EmittedPackage;

use crate::builder::SlotFailure;

/// A record that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

/// Outcome of one deck run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_records: usize,
    pub built_records: usize,
    pub cards: usize,
    /// Names of the inferred templates, in ordinal order.
    pub templates: Vec<String>,
    pub skipped: Vec<SkippedRecord>,
    pub failed_slots: Vec<SlotFailure>,
    /// Header warnings (ignored columns under the tolerant policy).
    pub warnings: Vec<String>,
    pub package: Option<EmittedPackage>,
}

impl RunSummary {
    /// No skipped records and no failed slots.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed_slots.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Templates:      {}", self.templates.join(", "))?;
        writeln!(f, "Records:        {}", self.total_records)?;
        writeln!(f, "Built:          {}", self.built_records)?;
        writeln!(f, "Cards:          {}", self.cards)?;
        writeln!(f, "Skipped:        {}", self.skipped.len())?;
        writeln!(f, "Failed slots:   {}", self.failed_slots.len())?;
        if let Some(package) = &self.package {
            writeln!(
                f,
                "Package:        {} ({} notes, {} media files)",
                package.path.display(),
                package.notes,
                package.media_files
            )?;
        }

        for warning in &self.warnings {
            writeln!(f, "  warning: {warning}")?;
        }
        for skipped in &self.skipped {
            writeln!(f, "  skipped record #{}: {}", skipped.index, skipped.reason)?;
        }
        for failure in &self.failed_slots {
            writeln!(
                f,
                "  record #{} {:?} {} [{}]: {}",
                failure.record_index, failure.term, failure.field, failure.provider, failure.reason
            )?;
        }
        Ok(())
    }
}
