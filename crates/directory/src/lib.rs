//! # directory
//!
//! Blocking Rust client for the remote group directory API.
//!
//! This crate provides functionality for:
//! - Creating, refreshing, updating and deleting directory groups
//! - Resolving a name or server id to exactly one group record
//! - Enforcing the service's exact status-line contract on every request
//! - Cooperative cancellation and per-call deadlines
//!
//! ## Example
//!
//! ```no_run
//! use directory::{ClientConfig, GroupReader, GroupResource, GroupState};
//! use reconcile::CallContext;
//!
//! let config = ClientConfig::new("https://directory.example.com/api/rest/2.0", "token");
//! let ctx = CallContext::background();
//!
//! // Manage a group's lifecycle
//! let groups = GroupResource::new(config.clone());
//! let mut state = GroupState::new("engineering", "Engineering staff");
//! groups.create(&ctx, &mut state).expect("creation failed");
//!
//! // Look one up without managing it
//! let reader = GroupReader::new(config);
//! let record = reader.lookup(&ctx, "engineering").expect("lookup failed");
//! println!("server id: {}", record.id);
//! ```
//!
//! ## Protocol
//!
//! The service speaks POST-only JSON; the path carries the intent:
//!
//! | Path                    | Expected status  | Body                  |
//! |-------------------------|------------------|-----------------------|
//! | `/groups/search`        | `200 OK`         | paged identifier query|
//! | `/groups/create`        | `200 OK`         | full creation shape   |
//! | `/groups/{name}/update` | `204 No Content` | additive edit         |
//! | `/groups/{name}/delete` | `204 No Content` | empty                 |
//!
//! Status lines are compared verbatim: a `201 Created` where `200 OK` is
//! required is a contract violation, not a success.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod groups;
pub mod lookup;
pub mod transport;
pub mod types;

pub use config::ClientConfig;
pub use error::{Error, ErrorCategory, Result};
pub use groups::{GroupReader, GroupResource};
pub use lookup::lookup_group;
pub use transport::{HttpTransport, MockTransport, Transport};
pub use types::{GroupRecord, GroupState};
