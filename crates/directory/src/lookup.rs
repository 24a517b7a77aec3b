//! Search lookup with the exactly-one cardinality contract.
//!
//! The service has no get-by-id endpoint; the only discovery mechanism is
//! `/groups/search`, which answers with a JSON list. Everything that needs
//! to resolve an identifier goes through [`lookup_group`], which insists
//! the list contains exactly one record.

use reconcile::CallContext;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::transport::{STATUS_OK, Transport};
use crate::types::GroupRecord;

/// Search endpoint path.
pub(crate) const SEARCH_PATH: &str = "/groups/search";

/// Fixed search page size. There is no pagination loop: an identifier
/// matching more records than one page holds is indistinguishable from one
/// matching a full page, and both fail the cardinality check anyway.
const SEARCH_PAGE_SIZE: u32 = 10;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    group_identifier: &'a str,
    record_offset: u32,
    record_size: u32,
}

/// Resolve `identifier` (a group name or server id) to its unique record.
///
/// # Errors
///
/// Returns [`Error::Cardinality`] when the search matches zero or more
/// than one group, and [`Error::Decode`] when the winning entry does not
/// have the expected record shape.
pub fn lookup_group(
    transport: &dyn Transport,
    ctx: &CallContext,
    identifier: &str,
) -> Result<GroupRecord> {
    let entry = lookup_exactly_one(transport, ctx, identifier)?;
    serde_json::from_value(entry).map_err(Error::decode)
}

/// Run the search and enforce the exactly-one constraint on the raw list.
///
/// The list is decoded shallowly first so the cardinality check happens
/// before any record-shape validation.
fn lookup_exactly_one(
    transport: &dyn Transport,
    ctx: &CallContext,
    identifier: &str,
) -> Result<serde_json::Value> {
    let request = SearchRequest {
        group_identifier: identifier,
        record_offset: 0,
        record_size: SEARCH_PAGE_SIZE,
    };
    let body = serde_json::to_vec(&request).map_err(Error::serialize)?;

    let raw = transport.post(ctx, SEARCH_PATH, &body, STATUS_OK)?;
    let mut entries: Vec<serde_json::Value> =
        serde_json::from_slice(&raw).map_err(Error::decode)?;

    log::debug!("search for {identifier:?} matched {} entries", entries.len());

    match entries.len() {
        1 => Ok(entries.swap_remove(0)),
        count => Err(Error::Cardinality { count }),
    }
}
