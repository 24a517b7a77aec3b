//! Group lifecycle controller and read-only accessor.
//!
//! [`GroupResource`] drives the create/read/update/delete protocol for
//! managed groups; [`GroupReader`] resolves a single group for callers
//! that only want to look at it.

use anyhow::Context as AnyhowContext;
use chrono::Utc;
use reconcile::{CallContext, Provisioner};
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::lookup;
use crate::transport::{HttpTransport, STATUS_NO_CONTENT, STATUS_OK, Transport};
use crate::types::{GroupRecord, GroupState};

/// Creation endpoint path.
const CREATE_PATH: &str = "/groups/create";

/// Group type sent on creation; only local groups are managed.
const GROUP_TYPE: &str = "LOCAL_GROUP";

/// Visibility sent on creation.
const GROUP_VISIBILITY: &str = "NON_SHARABLE";

/// Update verb; the endpoint models updates as additive edits.
const UPDATE_OPERATION: &str = "ADD";

fn update_path(name: &str) -> String {
    format!("/groups/{name}/update")
}

fn delete_path(name: &str) -> String {
    format!("/groups/{name}/delete")
}

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    name: &'a str,
    display_name: &'a str,
    description: &'a str,
    #[serde(rename = "type")]
    group_type: &'a str,
    visibility: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    operation: &'a str,
    name: &'a str,
    description: &'a str,
}

/// Current time in the format `last_updated` bookkeeping uses.
fn timestamp_now() -> String {
    Utc::now().to_rfc3339()
}

/// Lifecycle controller for remote groups.
///
/// One controller serves any number of groups; it holds connection state
/// only. Operations mutate the [`GroupState`] they are handed and leave
/// persistence to the caller.
///
/// # Example
///
/// ```no_run
/// use directory::{ClientConfig, GroupResource, GroupState};
/// use reconcile::CallContext;
///
/// let config = ClientConfig::new("https://directory.example.com/api/rest/2.0", "token");
/// let groups = GroupResource::new(config);
///
/// let ctx = CallContext::background();
/// let mut state = GroupState::new("engineering", "Engineering staff");
/// groups.create(&ctx, &mut state).unwrap();
/// println!("created at {:?}", state.last_updated);
/// ```
pub struct GroupResource {
    transport: Box<dyn Transport>,
}

impl GroupResource {
    /// Controller talking HTTP with the given configuration.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            transport: Box::new(HttpTransport::new(config)),
        }
    }

    /// Controller over a custom transport.
    #[must_use]
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create the group described by `desired` and fold the server's view
    /// of the new group back into it.
    ///
    /// The display name always mirrors the group name.
    pub fn create(&self, ctx: &CallContext, desired: &mut GroupState) -> Result<()> {
        let request = CreateRequest {
            name: &desired.name,
            display_name: &desired.name,
            description: &desired.description,
            group_type: GROUP_TYPE,
            visibility: GROUP_VISIBILITY,
        };
        let body = serde_json::to_vec(&request).map_err(Error::serialize)?;

        // unlike search, creation answers with the record itself
        let raw = self.transport.post(ctx, CREATE_PATH, &body, STATUS_OK)?;
        let record: GroupRecord = serde_json::from_slice(&raw).map_err(Error::decode)?;

        log::info!("created group {record}");

        desired.name = record.name;
        desired.description = record.description;
        desired.last_updated = Some(timestamp_now());
        Ok(())
    }

    /// Refresh `state` with what the service reports for its current name.
    ///
    /// Only observed fields are touched; `last_updated` tracks writes, not
    /// reads. On failure `state` is left exactly as it was.
    pub fn read(&self, ctx: &CallContext, state: &mut GroupState) -> Result<()> {
        let record = lookup::lookup_group(self.transport.as_ref(), ctx, &state.name)?;
        state.name = record.name;
        state.description = record.description;
        Ok(())
    }

    /// Push `plan` to the remote group identified by `prior`, then read the
    /// authoritative record back into `plan`.
    ///
    /// The request path is keyed by the prior name: the endpoint cannot
    /// rename a group, and the verification read (also by the prior name)
    /// restores the server-side name into `plan`. A failure after the write
    /// went through surfaces as [`Error::ReadBack`].
    pub fn update(&self, ctx: &CallContext, prior: &GroupState, plan: &mut GroupState) -> Result<()> {
        let request = UpdateRequest {
            operation: UPDATE_OPERATION,
            name: &plan.name,
            description: &plan.description,
        };
        let body = serde_json::to_vec(&request).map_err(Error::serialize)?;

        self.transport
            .post(ctx, &update_path(&prior.name), &body, STATUS_NO_CONTENT)?;

        // the update endpoint answers 204, so the new record has to be
        // fetched separately
        let record = lookup::lookup_group(self.transport.as_ref(), ctx, &prior.name)
            .map_err(Error::read_back)?;

        log::info!("updated group {record}");

        plan.name = record.name;
        plan.description = record.description;
        plan.last_updated = Some(timestamp_now());
        Ok(())
    }

    /// Delete the remote group named by `state`.
    ///
    /// The request carries no body and any response body is ignored; there
    /// is no verification read after a delete.
    pub fn delete(&self, ctx: &CallContext, state: &GroupState) -> Result<()> {
        self.transport
            .post(ctx, &delete_path(&state.name), &[], STATUS_NO_CONTENT)?;
        log::info!("deleted group {:?}", state.name);
        Ok(())
    }
}

impl Provisioner for GroupResource {
    type State = GroupState;

    fn create(&self, ctx: &CallContext, desired: &mut GroupState) -> anyhow::Result<()> {
        GroupResource::create(self, ctx, desired).context("could not create group")
    }

    fn read(&self, ctx: &CallContext, state: &mut GroupState) -> anyhow::Result<()> {
        GroupResource::read(self, ctx, state).context("could not look up group")
    }

    fn update(&self, ctx: &CallContext, prior: &GroupState, plan: &mut GroupState) -> anyhow::Result<()> {
        GroupResource::update(self, ctx, prior, plan).context("could not update group")
    }

    fn delete(&self, ctx: &CallContext, state: &GroupState) -> anyhow::Result<()> {
        GroupResource::delete(self, ctx, state).context("could not delete group")
    }
}

/// Read-only accessor for group records.
///
/// Resolves an identifier (group name or server id) to the current record,
/// surfacing the server-assigned id that lifecycle state never tracks. For
/// callers that reference a group without owning its lifecycle.
pub struct GroupReader {
    transport: Box<dyn Transport>,
}

impl GroupReader {
    /// Reader talking HTTP with the given configuration.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            transport: Box::new(HttpTransport::new(config)),
        }
    }

    /// Reader over a custom transport.
    #[must_use]
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Resolve `identifier` to its unique group record.
    pub fn lookup(&self, ctx: &CallContext, identifier: &str) -> Result<GroupRecord> {
        lookup::lookup_group(self.transport.as_ref(), ctx, identifier)
    }
}

#[cfg(test)]
mod tests {
    use reconcile::Interrupt;

    use super::*;
    use crate::lookup::SEARCH_PATH;
    use crate::transport::MockTransport;

    fn resource(mock: &MockTransport) -> GroupResource {
        GroupResource::with_transport(Box::new(mock.clone()))
    }

    // ========================================================================
    // Create
    // ========================================================================

    #[test]
    fn test_create_sends_the_full_creation_shape() {
        let mut mock = MockTransport::new();
        mock.enqueue(
            CREATE_PATH,
            STATUS_OK,
            br#"{"name":"engineering","id":"17","description":"Engineering"}"#,
        );

        let ctx = CallContext::background();
        let mut desired = GroupState::new("engineering", "Engineering");
        resource(&mock).create(&ctx, &mut desired).unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, CREATE_PATH);
        assert_eq!(requests[0].expected_status, STATUS_OK);
        assert_eq!(
            String::from_utf8(requests[0].body.clone()).unwrap(),
            r#"{"name":"engineering","display_name":"engineering","description":"Engineering","type":"LOCAL_GROUP","visibility":"NON_SHARABLE"}"#
        );
    }

    #[test]
    fn test_create_folds_the_response_record_into_state() {
        let mut mock = MockTransport::new();
        mock.enqueue(
            CREATE_PATH,
            STATUS_OK,
            br#"{"name":"ENGINEERING","id":"17","description":"Engineering (managed)"}"#,
        );

        let ctx = CallContext::background();
        let mut desired = GroupState::new("engineering", "Engineering");
        resource(&mock).create(&ctx, &mut desired).unwrap();

        // the server's view wins, including any normalization it applied
        assert_eq!(desired.name, "ENGINEERING");
        assert_eq!(desired.description, "Engineering (managed)");
        assert!(desired.last_updated.is_some());
    }

    #[test]
    fn test_create_rejects_success_with_the_wrong_status_line() {
        let mut mock = MockTransport::new();
        mock.enqueue(CREATE_PATH, "201 Created", br#"{"name":"x","id":"1"}"#);

        let ctx = CallContext::background();
        let mut desired = GroupState::new("x", "");
        let err = resource(&mock).create(&ctx, &mut desired).unwrap_err();

        assert!(matches!(err, Error::StatusMismatch { .. }));
        assert_eq!(desired, GroupState::new("x", ""));
    }

    #[test]
    fn test_create_with_malformed_response_leaves_state_alone() {
        let mut mock = MockTransport::new();
        mock.enqueue(CREATE_PATH, STATUS_OK, b"not json");

        let ctx = CallContext::background();
        let mut desired = GroupState::new("x", "d");
        let err = resource(&mock).create(&ctx, &mut desired).unwrap_err();

        assert!(matches!(err, Error::Decode { .. }));
        assert_eq!(desired, GroupState::new("x", "d"));
    }

    // ========================================================================
    // Read
    // ========================================================================

    #[test]
    fn test_read_overwrites_observed_fields_only() {
        let mut mock = MockTransport::new();
        mock.enqueue(
            SEARCH_PATH,
            STATUS_OK,
            br#"[{"name":"ops","id":"7","description":"Operations (current)"}]"#,
        );

        let ctx = CallContext::background();
        let mut state = GroupState {
            name: "ops".to_string(),
            description: "stale".to_string(),
            last_updated: Some("2025-01-01T00:00:00+00:00".to_string()),
        };
        resource(&mock).read(&ctx, &mut state).unwrap();

        assert_eq!(state.description, "Operations (current)");
        assert_eq!(
            state.last_updated.as_deref(),
            Some("2025-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_read_of_a_vanished_group_fails_and_preserves_state() {
        let mut mock = MockTransport::new();
        mock.enqueue(SEARCH_PATH, STATUS_OK, b"[]");

        let ctx = CallContext::background();
        let mut state = GroupState::new("ops", "Operations");
        let before = state.clone();

        let err = resource(&mock).read(&ctx, &mut state).unwrap_err();
        assert!(matches!(err, Error::Cardinality { count: 0 }));
        assert_eq!(state, before);
    }

    // ========================================================================
    // Update
    // ========================================================================

    #[test]
    fn test_update_is_one_write_then_one_read() {
        let mut mock = MockTransport::new();
        mock.enqueue("/groups/ops/update", STATUS_NO_CONTENT, b"");
        mock.enqueue(
            SEARCH_PATH,
            STATUS_OK,
            br#"[{"name":"ops","id":"7","description":"Ops v2"}]"#,
        );

        let ctx = CallContext::background();
        let prior = GroupState::new("ops", "Ops v1");
        let mut plan = GroupState::new("ops", "Ops v2");
        resource(&mock).update(&ctx, &prior, &mut plan).unwrap();

        let requests = mock.requests();
        assert_eq!(mock.request_paths(), vec!["/groups/ops/update", SEARCH_PATH]);
        assert_eq!(
            String::from_utf8(requests[0].body.clone()).unwrap(),
            r#"{"operation":"ADD","name":"ops","description":"Ops v2"}"#
        );
        assert_eq!(requests[0].expected_status, STATUS_NO_CONTENT);

        assert_eq!(plan.description, "Ops v2");
        assert!(plan.last_updated.is_some());
    }

    #[test]
    fn test_failed_write_skips_the_verification_read() {
        let mut mock = MockTransport::new();
        mock.enqueue("/groups/ops/update", "500 Internal Server Error", b"");

        let ctx = CallContext::background();
        let prior = GroupState::new("ops", "Ops v1");
        let mut plan = GroupState::new("ops", "Ops v2");
        let err = resource(&mock).update(&ctx, &prior, &mut plan).unwrap_err();

        // a write failure is not wrapped as a read-back failure
        assert!(matches!(err, Error::StatusMismatch { .. }));
        assert_eq!(mock.request_paths(), vec!["/groups/ops/update"]);
        assert_eq!(plan.last_updated, None);
    }

    #[test]
    fn test_failed_verification_read_is_reported_as_read_back() {
        let mut mock = MockTransport::new();
        mock.enqueue("/groups/ops/update", STATUS_NO_CONTENT, b"");
        mock.enqueue(SEARCH_PATH, STATUS_OK, b"[]");

        let ctx = CallContext::background();
        let prior = GroupState::new("ops", "Ops v1");
        let mut plan = GroupState::new("ops", "Ops v2");
        let err = resource(&mock).update(&ctx, &prior, &mut plan).unwrap_err();

        match err {
            Error::ReadBack { source } => {
                assert!(matches!(*source, Error::Cardinality { count: 0 }));
            }
            other => panic!("expected ReadBack, got {other:?}"),
        }
        assert_eq!(mock.request_paths(), vec!["/groups/ops/update", SEARCH_PATH]);
    }

    #[test]
    fn test_update_addresses_the_prior_name_so_renames_do_not_stick() {
        let mut mock = MockTransport::new();
        mock.enqueue("/groups/old/update", STATUS_NO_CONTENT, b"");
        mock.enqueue(
            SEARCH_PATH,
            STATUS_OK,
            br#"[{"name":"old","id":"3","description":"renamed in plan only"}]"#,
        );

        let ctx = CallContext::background();
        let prior = GroupState::new("old", "d");
        let mut plan = GroupState::new("new", "renamed in plan only");
        resource(&mock).update(&ctx, &prior, &mut plan).unwrap();

        let requests = mock.requests();
        // write goes to the old name's endpoint, carrying the new name
        assert_eq!(requests[0].path, "/groups/old/update");
        assert!(
            String::from_utf8(requests[0].body.clone())
                .unwrap()
                .contains(r#""name":"new""#)
        );
        // the verification read also uses the old name
        assert!(
            String::from_utf8(requests[1].body.clone())
                .unwrap()
                .contains(r#""group_identifier":"old""#)
        );
        // and the server's name wins over the attempted rename
        assert_eq!(plan.name, "old");
    }

    // ========================================================================
    // Delete
    // ========================================================================

    #[test]
    fn test_delete_sends_an_empty_body_and_ignores_the_response() {
        let mut mock = MockTransport::new();
        mock.enqueue("/groups/ops/delete", STATUS_NO_CONTENT, b"whatever the server says");

        let ctx = CallContext::background();
        let state = GroupState::new("ops", "Operations");
        resource(&mock).delete(&ctx, &state).unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/groups/ops/delete");
        assert_eq!(requests[0].body, b"");
        assert_eq!(requests[0].expected_status, STATUS_NO_CONTENT);
    }

    #[test]
    fn test_delete_requires_the_exact_status_line() {
        let mut mock = MockTransport::new();
        mock.enqueue("/groups/ops/delete", "200 OK", b"");

        let ctx = CallContext::background();
        let state = GroupState::new("ops", "");
        let err = resource(&mock).delete(&ctx, &state).unwrap_err();
        assert!(matches!(err, Error::StatusMismatch { .. }));
    }

    // ========================================================================
    // Context and trait plumbing
    // ========================================================================

    #[test]
    fn test_cancelled_context_stops_before_any_request() {
        let mock = MockTransport::new();
        let ctx = CallContext::background();
        ctx.cancel_handle().cancel();

        let mut desired = GroupState::new("x", "");
        let err = resource(&mock).create(&ctx, &mut desired).unwrap_err();
        assert!(matches!(err, Error::Interrupted(Interrupt::Cancelled)));
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_provisioner_impl_adds_operation_context() {
        let mut mock = MockTransport::new();
        mock.enqueue(CREATE_PATH, "503 Service Unavailable", b"");

        let ctx = CallContext::background();
        let provisioner: &dyn Provisioner<State = GroupState> = &resource(&mock);
        let mut desired = GroupState::new("x", "");

        let err = provisioner.create(&ctx, &mut desired).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("could not create group"));
        assert!(chain.contains("503 Service Unavailable"));
    }

    #[test]
    fn test_full_lifecycle_through_the_provisioner_trait() {
        let mut mock = MockTransport::new();
        mock.enqueue(CREATE_PATH, STATUS_OK, br#"{"name":"eng","id":"1","description":"v1"}"#);
        mock.enqueue(SEARCH_PATH, STATUS_OK, br#"[{"name":"eng","id":"1","description":"v1"}]"#);
        mock.enqueue("/groups/eng/update", STATUS_NO_CONTENT, b"");
        mock.enqueue(SEARCH_PATH, STATUS_OK, br#"[{"name":"eng","id":"1","description":"v2"}]"#);
        mock.enqueue("/groups/eng/delete", STATUS_NO_CONTENT, b"");

        let ctx = CallContext::background();
        let controller = resource(&mock);
        let provisioner: &dyn Provisioner<State = GroupState> = &controller;

        let mut state = GroupState::new("eng", "v1");
        provisioner.create(&ctx, &mut state).unwrap();
        provisioner.read(&ctx, &mut state).unwrap();

        let prior = state.clone();
        let mut plan = GroupState::new("eng", "v2");
        provisioner.update(&ctx, &prior, &mut plan).unwrap();
        assert_eq!(plan.description, "v2");

        provisioner.delete(&ctx, &plan).unwrap();
        assert_eq!(
            mock.request_paths(),
            vec![
                CREATE_PATH,
                SEARCH_PATH,
                "/groups/eng/update",
                SEARCH_PATH,
                "/groups/eng/delete"
            ]
        );
    }

    // ========================================================================
    // Reader
    // ========================================================================

    #[test]
    fn test_reader_surfaces_the_server_id() {
        let mut mock = MockTransport::new();
        mock.enqueue(
            SEARCH_PATH,
            STATUS_OK,
            br#"[{"name":"ops","id":"7","description":"Operations"}]"#,
        );

        let ctx = CallContext::background();
        let reader = GroupReader::with_transport(Box::new(mock.clone()));
        let record = reader.lookup(&ctx, "7").unwrap();

        assert_eq!(record.id, "7");
        assert_eq!(record.name, "ops");
        assert!(
            String::from_utf8(mock.requests()[0].body.clone())
                .unwrap()
                .contains(r#""group_identifier":"7""#)
        );
    }

    #[test]
    fn test_reader_propagates_ambiguity() {
        let mut mock = MockTransport::new();
        mock.enqueue(
            SEARCH_PATH,
            STATUS_OK,
            br#"[{"name":"a","id":"1"},{"name":"b","id":"2"}]"#,
        );

        let ctx = CallContext::background();
        let reader = GroupReader::with_transport(Box::new(mock));
        let err = reader.lookup(&ctx, "amb").unwrap_err();
        assert!(matches!(err, Error::Cardinality { count: 2 }));
    }
}
