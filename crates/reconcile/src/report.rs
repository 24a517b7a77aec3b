//! Outcomes, summaries and progress reporting for reconciliation runs

use serde::{Deserialize, Serialize};

/// What happened to one planned action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The entity was created on the remote service.
    Created,
    /// The entity was updated on the remote service.
    Updated,
    /// The entity was removed from the remote service.
    Deleted,
    /// The entity already matched the desired state.
    Unchanged,
    /// The action was not executed.
    Skipped {
        /// Why the action was skipped.
        reason: String,
    },
    /// The action was attempted and failed.
    Failed {
        /// Rendered error chain for the failure.
        error: String,
    },
}

impl ActionOutcome {
    /// Whether the action left the run in a good state.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Whether the action changed anything remotely.
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::Updated | Self::Deleted)
    }
}

/// Tallied outcomes for a whole reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Entities created.
    pub created: usize,
    /// Entities updated.
    pub updated: usize,
    /// Entities deleted.
    pub deleted: usize,
    /// Entities already in their desired state.
    pub unchanged: usize,
    /// Actions skipped.
    pub skipped: usize,
    /// Actions that failed.
    pub failed: usize,
}

impl RunSummary {
    /// Record one outcome.
    pub fn add(&mut self, outcome: &ActionOutcome) {
        match outcome {
            ActionOutcome::Created => self.created += 1,
            ActionOutcome::Updated => self.updated += 1,
            ActionOutcome::Deleted => self.deleted += 1,
            ActionOutcome::Unchanged => self.unchanged += 1,
            ActionOutcome::Skipped { .. } => self.skipped += 1,
            ActionOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: &RunSummary) {
        self.created += other.created;
        self.updated += other.updated;
        self.deleted += other.deleted;
        self.unchanged += other.unchanged;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    /// Total number of recorded outcomes.
    pub fn total(&self) -> usize {
        self.created + self.updated + self.deleted + self.unchanged + self.skipped + self.failed
    }

    /// Number of remote changes that actually happened.
    pub fn changes(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    /// Whether the run completed without failures.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Progress callbacks for a reconciliation run.
///
/// Reporting is strictly observational. Implementations must not influence
/// control flow; the engine behaves identically under [`NoReporter`].
pub trait Reporter {
    /// An action is about to execute. `name` identifies the entity,
    /// `description` is a display-ready one-liner.
    fn action_started(&mut self, name: &str, description: &str);

    /// An action finished with `outcome`.
    fn action_finished(&mut self, name: &str, outcome: &ActionOutcome);
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReporter;

impl Reporter for NoReporter {
    fn action_started(&mut self, _name: &str, _description: &str) {}

    fn action_finished(&mut self, _name: &str, _outcome: &ActionOutcome) {}
}
