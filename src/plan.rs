//! Desired-vs-observed planning.
//!
//! Planning is pure: it compares the declared groups with the observed
//! state and emits the actions apply would take, in the order apply would
//! take them. Nothing here touches the network.

use std::collections::HashSet;

use directory::GroupState;

use crate::config::GroupSpec;
use crate::state::StateFile;

/// One pending lifecycle action.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedAction {
    /// Group is declared but not observed.
    Create { desired: GroupState },
    /// Group is observed but its declared description differs.
    Update { prior: GroupState, plan: GroupState },
    /// Group is observed but no longer declared.
    Delete { prior: GroupState },
}

impl PlannedAction {
    /// Name of the group the action targets.
    pub fn name(&self) -> &str {
        match self {
            Self::Create { desired } => &desired.name,
            Self::Update { prior, .. } | Self::Delete { prior } => &prior.name,
        }
    }

    /// Short verb for display.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    /// One-line description for reporting.
    pub fn describe(&self) -> String {
        format!("{} group {:?}", self.verb(), self.name())
    }
}

/// Pending actions plus the count of groups already in shape.
#[derive(Debug, Default)]
pub struct Plan {
    pub actions: Vec<PlannedAction>,
    pub unchanged: usize,
}

impl Plan {
    pub fn has_changes(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Counts of (creates, updates, deletes) in the plan.
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for action in &self.actions {
            match action {
                PlannedAction::Create { .. } => counts.0 += 1,
                PlannedAction::Update { .. } => counts.1 += 1,
                PlannedAction::Delete { .. } => counts.2 += 1,
            }
        }
        counts
    }
}

/// Compute the pending actions for `specs` against `state`.
///
/// Groups are matched purely by name, so a renamed declaration plans as a
/// create plus a delete. Order is deterministic: creates, then updates,
/// then deletes, each sorted by name.
pub fn compute(specs: &[GroupSpec], state: &StateFile) -> Plan {
    let mut creates = Vec::new();
    let mut updates = Vec::new();
    let mut unchanged = 0;

    for spec in specs {
        match state.find(&spec.name) {
            None => creates.push(PlannedAction::Create {
                desired: GroupState::new(&spec.name, &spec.description),
            }),
            Some(prior) if prior.description != spec.description => {
                updates.push(PlannedAction::Update {
                    prior: prior.clone(),
                    plan: GroupState::new(&spec.name, &spec.description),
                });
            }
            Some(_) => unchanged += 1,
        }
    }

    let declared: HashSet<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    let mut deletes: Vec<PlannedAction> = state
        .groups
        .iter()
        .filter(|g| !declared.contains(g.name.as_str()))
        .map(|g| PlannedAction::Delete { prior: g.clone() })
        .collect();

    creates.sort_by(|a, b| a.name().cmp(b.name()));
    updates.sort_by(|a, b| a.name().cmp(b.name()));
    deletes.sort_by(|a, b| a.name().cmp(b.name()));

    let mut actions = creates;
    actions.extend(updates);
    actions.extend(deletes);
    Plan { actions, unchanged }
}
