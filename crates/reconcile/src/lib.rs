//! # Reconcile
//!
//! Primitives for declarative lifecycle management of remote entities.
//!
//! This crate defines the seam between an orchestrator that plans changes
//! and the provisioners that execute them against a remote service. The
//! orchestrator owns desired state and persistence; a provisioner owns the
//! protocol for one entity type and nothing else.
//!
//! ## Core Concepts
//!
//! - **Provisioner**: Create/read/update/delete operations for one kind of
//!   remotely managed entity, mutating caller-owned state in place
//! - **CallContext**: Cancellation flag and optional deadline threaded
//!   through every remote call
//! - **ActionOutcome / RunSummary**: What happened to each planned action
//!   and the tally for a whole run
//! - **Reporter**: Observational progress callbacks; never control flow
//!
//! See [`Provisioner`] for a worked example against an in-memory backend.

pub mod context;
pub mod provisioner;
pub mod report;

// Re-export main types at crate root
pub use context::{CallContext, CancelHandle, Interrupt};
pub use provisioner::Provisioner;
pub use report::{ActionOutcome, NoReporter, Reporter, RunSummary};
