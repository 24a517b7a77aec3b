//! The provisioner seam between planning and remote side effects

use anyhow::Result;

use crate::context::CallContext;

/// Lifecycle operations for one kind of remotely managed entity.
///
/// A provisioner owns the protocol for a single entity type. It holds no
/// per-entity state: every operation receives the state it works on, mutates
/// it in place with what the remote service reported, and leaves persistence
/// to the caller. Operations on distinct entities are independent; callers
/// sequence them.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use std::sync::Mutex;
///
/// use anyhow::{Result, bail};
/// use reconcile::{CallContext, Provisioner};
///
/// /// Provisioner backed by an in-process map, keyed by name.
/// #[derive(Default)]
/// struct MemoryGroups {
///     store: Mutex<HashMap<String, String>>,
/// }
///
/// #[derive(Clone)]
/// struct Membership {
///     name: String,
///     role: String,
/// }
///
/// impl Provisioner for MemoryGroups {
///     type State = Membership;
///
///     fn create(&self, _ctx: &CallContext, desired: &mut Membership) -> Result<()> {
///         self.store
///             .lock()
///             .unwrap()
///             .insert(desired.name.clone(), desired.role.clone());
///         Ok(())
///     }
///
///     fn read(&self, _ctx: &CallContext, state: &mut Membership) -> Result<()> {
///         match self.store.lock().unwrap().get(&state.name) {
///             Some(role) => {
///                 state.role = role.clone();
///                 Ok(())
///             }
///             None => bail!("no such membership: {}", state.name),
///         }
///     }
///
///     fn update(&self, _ctx: &CallContext, prior: &Membership, plan: &mut Membership) -> Result<()> {
///         self.store
///             .lock()
///             .unwrap()
///             .insert(prior.name.clone(), plan.role.clone());
///         Ok(())
///     }
///
///     fn delete(&self, _ctx: &CallContext, state: &Membership) -> Result<()> {
///         self.store.lock().unwrap().remove(&state.name);
///         Ok(())
///     }
/// }
///
/// let groups = MemoryGroups::default();
/// let ctx = CallContext::background();
/// let mut membership = Membership {
///     name: "oncall".to_string(),
///     role: "admin".to_string(),
/// };
/// groups.create(&ctx, &mut membership).unwrap();
/// groups.read(&ctx, &mut membership).unwrap();
/// assert_eq!(membership.role, "admin");
/// ```
pub trait Provisioner {
    /// State the provisioner manages: desired on the way in, observed on
    /// the way out.
    type State;

    /// Create the entity described by `desired` on the remote service and
    /// fold the service's view of it back into `desired`.
    fn create(&self, ctx: &CallContext, desired: &mut Self::State) -> Result<()>;

    /// Refresh `state` with what the remote service currently reports.
    ///
    /// On failure `state` must be left as it was; a refresh never applies
    /// a partial view.
    fn read(&self, ctx: &CallContext, state: &mut Self::State) -> Result<()>;

    /// Reconcile the remote entity identified by `prior` towards `plan`,
    /// then fold the service's resulting view back into `plan`.
    ///
    /// `prior` carries the last known observed state and is what the remote
    /// entity is addressed by; `plan` carries the desired values.
    fn update(&self, ctx: &CallContext, prior: &Self::State, plan: &mut Self::State) -> Result<()>;

    /// Remove the remote entity identified by `state`.
    fn delete(&self, ctx: &CallContext, state: &Self::State) -> Result<()>;
}
