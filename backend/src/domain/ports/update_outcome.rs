//! Result of an update that found its target.

use serde::Serialize;

/// Whether an update changed the stored record.
///
/// A missing record is reported as an error, never as an outcome, so callers
/// can tell "nothing to change" apart from "nothing there".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOutcome {
    /// The stored record now differs from before.
    Modified,
    /// The submitted values matched what was stored; nothing was written.
    Unchanged,
}

impl UpdateOutcome {
    /// `true` for [`UpdateOutcome::Modified`].
    pub const fn is_modified(self) -> bool {
        matches!(self, Self::Modified)
    }
}
