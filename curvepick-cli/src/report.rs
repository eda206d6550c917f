use std::{fmt, fs, path::Path};

use anyhow::Context;
use serde::Serialize;

use curvepick_match::{Classification, Matches, classifier::Summary};

/// Machine-readable record of one run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub selections: &'a Matches,
    pub classifications: &'a [Classification],
    pub summary: &'a Summary,
}

impl Report<'_> {
    /// Writes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be serialized or written.
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Human-readable results summary.
pub struct Overview<'a> {
    pub matches: &'a Matches,
    pub summary: &'a Summary,
}

impl fmt::Display for Overview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Selected ideal functions:")?;
        for selection in self.matches {
            writeln!(
                f,
                "  {:<10} -> {:<10} total = {:.6}  max = {:.6}",
                selection.training.name,
                selection.candidate.name,
                selection.total_deviation,
                selection.max_deviation,
            )?;
        }

        let summary = self.summary;
        writeln!(f, "Test points: {}", summary.total)?;
        writeln!(f, "  assigned:   {}", summary.assigned)?;
        for (candidate, count) in &summary.per_candidate {
            writeln!(f, "    {candidate:<10} {count}")?;
        }
        writeln!(f, "  unassigned: {}", summary.unassigned)?;
        write!(f, "  rejected:   {}", summary.rejected)
    }
}

/// Renders the human-readable results summary.
#[must_use]
pub fn render(matches: &Matches, summary: &Summary) -> String {
    Overview { matches, summary }.to_string()
}
