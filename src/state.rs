use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use directory::GroupState;

// ============================================================================
// State Structures
// ============================================================================

/// Observed remote state persisted between invocations.
///
/// This is bookkeeping, not truth: plan and apply refresh it from the
/// service before relying on it unless told otherwise.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct StateFile {
    /// Groups believed to exist remotely, sorted by name.
    #[serde(default)]
    pub groups: Vec<GroupState>,
}

impl StateFile {
    /// Load state from disk, or return default if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("State file does not exist, starting empty");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        let state: StateFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        log::debug!("Loaded {} groups from {}", state.groups.len(), path.display());
        Ok(state)
    }

    /// Save state to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create state directory: {}", dir.display())
                })?;
            }
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize state")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        log::debug!("Saved state to {}", path.display());
        Ok(())
    }

    // ========================================================================
    // Group Helpers
    // ========================================================================

    /// Find a group by name
    pub fn find(&self, name: &str) -> Option<&GroupState> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Insert or replace a group, keeping the list sorted by name
    pub fn upsert(&mut self, group: GroupState) {
        self.groups.retain(|g| g.name != group.name);
        self.groups.push(group);
        self.groups.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Remove a group by name
    pub fn remove(&mut self, name: &str) -> bool {
        let len_before = self.groups.len();
        self.groups.retain(|g| g.name != name);
        self.groups.len() < len_before
    }
}

// ============================================================================
// Tests
// ============================================================================
