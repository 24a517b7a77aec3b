use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use directory::ClientConfig;

/// Environment variable consulted when the manifest omits `api_token`.
pub const TOKEN_ENV: &str = "GROUPCTL_API_TOKEN";

// ============================================================================
// Manifest
// ============================================================================

/// Desired configuration: connection settings plus the declared groups.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// Base URL of the directory service, without a trailing slash.
    pub base_url: String,
    /// Bearer token; falls back to `GROUPCTL_API_TOKEN` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Groups that should exist remotely.
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

/// One declared group.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GroupSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Manifest {
    /// Load and validate a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read manifest {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("Invalid manifest {}", path.display()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Resolve the API token from the manifest or the environment
    pub fn token(&self) -> Result<String> {
        resolve_token(self.api_token.clone(), std::env::var(TOKEN_ENV).ok())
    }

    /// Build the client configuration for this manifest
    pub fn client_config(&self) -> Result<ClientConfig> {
        Ok(ClientConfig::new(self.base_url.clone(), &self.token()?))
    }

    /// Check the fields every command needs before a client is built
    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("Manifest base_url must not be empty");
        }
        let mut seen = std::collections::HashSet::new();
        for spec in &self.groups {
            if spec.name.trim().is_empty() {
                bail!("Every declared group needs a non-empty name");
            }
            if !seen.insert(spec.name.as_str()) {
                bail!("Group {:?} is declared more than once", spec.name);
            }
        }
        Ok(())
    }
}

/// Manifest value wins over the environment; both absent is an error.
fn resolve_token(configured: Option<String>, from_env: Option<String>) -> Result<String> {
    match configured.or(from_env) {
        Some(token) if !token.trim().is_empty() => Ok(token),
        _ => bail!("No API token: set api_token in the manifest or {TOKEN_ENV}"),
    }
}
