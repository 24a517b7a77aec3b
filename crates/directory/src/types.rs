//! Group records and lifecycle state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A group record as the directory service reports it.
///
/// Wire shape: `{"name": ..., "id": ..., "description": ...}`. The service
/// may omit `description`; fields this client does not know are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Group name, unique on the server.
    pub name: String,
    /// Server-assigned opaque identifier.
    pub id: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

impl fmt::Display for GroupRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Desired or observed state for one managed group.
///
/// Lifecycle operations mutate this in place; persistence belongs to the
/// caller. The server-assigned id is deliberately not tracked here: update
/// and delete address the remote group by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupState {
    /// Group name; doubles as the key in update/delete request paths.
    pub name: String,
    /// Free-form description; empty when the manifest omits it.
    #[serde(default)]
    pub description: String,
    /// Client-side RFC 3339 timestamp of the last create or update.
    /// Bookkeeping only; never sent to the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl GroupState {
    /// State for a group that is declared but not yet observed.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            last_updated: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_decodes_the_wire_shape() {
        let record: GroupRecord =
            serde_json::from_str(r#"{"name":"engineering","id":"42","description":"Engineers"}"#)
                .unwrap();
        assert_eq!(record.name, "engineering");
        assert_eq!(record.id, "42");
        assert_eq!(record.description, "Engineers");
    }

    #[test]
    fn test_record_tolerates_missing_description() {
        let record: GroupRecord = serde_json::from_str(r#"{"name":"ops","id":"7"}"#).unwrap();
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_record_ignores_unknown_fields() {
        let record: GroupRecord =
            serde_json::from_str(r#"{"name":"ops","id":"7","visibility":"NON_SHARABLE"}"#).unwrap();
        assert_eq!(record.name, "ops");
    }

    #[test]
    fn test_record_requires_name_and_id() {
        assert!(serde_json::from_str::<GroupRecord>(r#"{"id":"7"}"#).is_err());
        assert!(serde_json::from_str::<GroupRecord>(r#"{"name":"ops"}"#).is_err());
    }

    #[test]
    fn test_record_display() {
        let record = GroupRecord {
            name: "ops".to_string(),
            id: "7".to_string(),
            description: String::new(),
        };
        assert_eq!(record.to_string(), "ops (7)");
    }

    #[test]
    fn test_new_state_has_no_timestamp() {
        let state = GroupState::new("ops", "Operations");
        assert_eq!(state.name, "ops");
        assert_eq!(state.description, "Operations");
        assert_eq!(state.last_updated, None);
    }

    #[test]
    fn test_state_omits_absent_timestamp_when_serialized() {
        let state = GroupState::new("ops", "");
        let json = serde_json::to_string(&state).unwrap();
        assert!(!json.contains("last_updated"));

        let stamped = GroupState {
            last_updated: Some("2025-06-01T12:00:00+00:00".to_string()),
            ..state
        };
        let json = serde_json::to_string(&stamped).unwrap();
        assert!(json.contains("last_updated"));
    }

    #[test]
    fn test_state_roundtrip_defaults_description() {
        let state: GroupState = serde_json::from_str(r#"{"name":"ops"}"#).unwrap();
        assert_eq!(state.description, "");
        assert_eq!(state.last_updated, None);
    }
}
