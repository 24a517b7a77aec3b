//! Plan and apply: reconcile declared groups with the remote service.
//!
//! Both commands run the same pipeline up to the computed pending actions.
//! `plan` stops after printing them; `apply` executes them in order and
//! persists state after each successful action, so an interrupted run can
//! be resumed by running apply again.

use std::path::Path;
use std::time::Duration;

use anyhow::{Result, bail};
use directory::{GroupResource, GroupState};
use reconcile::{ActionOutcome, CallContext, Provisioner, Reporter, RunSummary};

use crate::Context;
use crate::cli::{ApplyArgs, PlanArgs};
use crate::config::Manifest;
use crate::plan::{self, Plan, PlannedAction};
use crate::state::StateFile;
use crate::ui;

/// Context for one remote call, honoring an optional timeout in seconds.
pub(crate) fn call_context(timeout_secs: Option<u64>) -> CallContext {
    match timeout_secs {
        Some(secs) => CallContext::with_timeout(Duration::from_secs(secs)),
        None => CallContext::background(),
    }
}

// ============================================================================
// Plan
// ============================================================================

pub fn plan(ctx: &Context, args: &PlanArgs) -> Result<()> {
    ui::header("Plan");
    let manifest = Manifest::load(&args.config)?;
    let mut state = StateFile::load(&args.state)?;

    if ctx.verbose > 0 {
        ui::kv("manifest", &args.config.display().to_string());
        ui::kv("state", &args.state.display().to_string());
    }

    let refresh_failures = if args.no_refresh {
        Vec::new()
    } else {
        let resource = GroupResource::new(manifest.client_config()?);
        refresh(&resource, &mut state, args.timeout)
    };
    for (name, error) in &refresh_failures {
        ui::warn(&format!("could not refresh {name:?}: {error}"));
    }

    let plan = plan::compute(&manifest.groups, &state);
    print_plan(&plan, ctx);

    if !refresh_failures.is_empty() {
        bail!("{} groups could not be refreshed", refresh_failures.len());
    }
    Ok(())
}

// ============================================================================
// Apply
// ============================================================================

pub fn apply(ctx: &Context, args: &ApplyArgs) -> Result<()> {
    ui::header("Apply");
    let manifest = Manifest::load(&args.config)?;
    let mut state = StateFile::load(&args.state)?;
    let resource = GroupResource::new(manifest.client_config()?);

    let mut summary = RunSummary::default();

    if !args.no_refresh {
        for (name, error) in refresh(&resource, &mut state, args.timeout) {
            ui::error(&format!("could not refresh {name:?}: {error}"));
            summary.add(&ActionOutcome::Failed { error: format!("refresh {name}: {error}") });
        }
    }

    let plan = plan::compute(&manifest.groups, &state);
    summary.unchanged += plan.unchanged;
    print_plan(&plan, ctx);

    if args.dry_run {
        for action in &plan.actions {
            log::debug!("dry run, skipping {}", action.describe());
            summary.add(&ActionOutcome::Skipped { reason: "dry run".to_string() });
        }
        if plan.has_changes() {
            ui::info("Dry run, nothing was applied");
        }
    } else if plan.has_changes() {
        println!();
        let mut reporter = ConsoleReporter { quiet: ctx.quiet };
        let run = apply_actions(
            &resource,
            plan.actions,
            &mut state,
            &args.state,
            args.timeout,
            &mut reporter,
        )?;
        summary.merge(&run);
    }

    summarize(&summary)
}

/// Execute planned actions in order, saving state after every success.
///
/// One failed action does not stop the run; later actions still execute
/// and the failure is carried in the returned summary. State is only
/// written for actions that succeeded, so a partial run leaves the file
/// describing exactly what the service confirmed.
fn apply_actions(
    provisioner: &dyn Provisioner<State = GroupState>,
    actions: Vec<PlannedAction>,
    state: &mut StateFile,
    state_path: &Path,
    timeout_secs: Option<u64>,
    reporter: &mut dyn Reporter,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for action in actions {
        let name = action.name().to_string();
        reporter.action_started(&name, &action.describe());

        let call = call_context(timeout_secs);
        let outcome = match action {
            PlannedAction::Create { mut desired } => {
                match provisioner.create(&call, &mut desired) {
                    Ok(()) => {
                        state.upsert(desired);
                        state.save(state_path)?;
                        ActionOutcome::Created
                    }
                    Err(err) => failed(&err),
                }
            }
            PlannedAction::Update { prior, mut plan } => {
                match provisioner.update(&call, &prior, &mut plan) {
                    Ok(()) => {
                        // The verification read may have normalized the name.
                        state.remove(&prior.name);
                        state.upsert(plan);
                        state.save(state_path)?;
                        ActionOutcome::Updated
                    }
                    Err(err) => failed(&err),
                }
            }
            PlannedAction::Delete { prior } => match provisioner.delete(&call, &prior) {
                Ok(()) => {
                    state.remove(&prior.name);
                    state.save(state_path)?;
                    ActionOutcome::Deleted
                }
                Err(err) => failed(&err),
            },
        };

        reporter.action_finished(&name, &outcome);
        summary.add(&outcome);
    }

    Ok(summary)
}

/// Refresh every observed group in place, collecting per-group failures.
///
/// A failed read leaves that group's entry untouched, so planning proceeds
/// on the stale record and apply surfaces the discrepancy.
fn refresh(
    provisioner: &dyn Provisioner<State = GroupState>,
    state: &mut StateFile,
    timeout_secs: Option<u64>,
) -> Vec<(String, String)> {
    let mut failures = Vec::new();
    for group in &mut state.groups {
        log::debug!("refreshing {:?}", group.name);
        let call = call_context(timeout_secs);
        if let Err(err) = provisioner.read(&call, group) {
            failures.push((group.name.clone(), format!("{err:#}")));
        }
    }
    failures
}

// ============================================================================
// Output
// ============================================================================

/// Reporter printing one line per action as it executes.
struct ConsoleReporter {
    quiet: bool,
}

impl Reporter for ConsoleReporter {
    fn action_started(&mut self, _name: &str, description: &str) {
        if !self.quiet {
            ui::dim(&format!("{description} ..."));
        }
    }

    fn action_finished(&mut self, name: &str, outcome: &ActionOutcome) {
        match outcome {
            ActionOutcome::Failed { error } => ui::error(&format!("{name}: {error}")),
            ActionOutcome::Skipped { reason } => {
                if !self.quiet {
                    ui::warn(&format!("{name}: skipped ({reason})"));
                }
            }
            other => {
                if !self.quiet && other.is_change() {
                    ui::success(&format!("{name}: {}", verb_past(other)));
                }
            }
        }
    }
}

/// Past-tense verb for a finished action.
fn verb_past(outcome: &ActionOutcome) -> &'static str {
    match outcome {
        ActionOutcome::Created => "created",
        ActionOutcome::Updated => "updated",
        ActionOutcome::Deleted => "deleted",
        _ => "done",
    }
}

fn print_plan(plan: &Plan, ctx: &Context) {
    if !plan.has_changes() {
        ui::success("No changes, remote groups match the manifest");
        if plan.unchanged > 0 && !ctx.quiet {
            ui::dim(&format!("{} groups already in shape", plan.unchanged));
        }
        return;
    }

    for action in &plan.actions {
        ui::action(action.verb(), action.name(), &action_detail(action));
    }
    println!();

    let (creates, updates, deletes) = plan.counts();
    println!("Plan: {creates} to create, {updates} to update, {deletes} to delete");
    if plan.unchanged > 0 && !ctx.quiet {
        ui::dim(&format!("{} groups unchanged", plan.unchanged));
    }
}

/// Extra detail appended to a plan line.
fn action_detail(action: &PlannedAction) -> String {
    match action {
        PlannedAction::Update { prior, plan } => {
            format!("description {:?} -> {:?}", prior.description, plan.description)
        }
        PlannedAction::Create { desired } if !desired.description.is_empty() => {
            format!("{:?}", desired.description)
        }
        _ => String::new(),
    }
}

/// Failed outcome carrying the full error chain.
fn failed(err: &anyhow::Error) -> ActionOutcome {
    ActionOutcome::Failed { error: format!("{err:#}") }
}

/// Print the run tally and fail the process when any action failed.
fn summarize(summary: &RunSummary) -> Result<()> {
    println!();
    let mut parts = vec![
        format!("{} created", summary.created),
        format!("{} updated", summary.updated),
        format!("{} deleted", summary.deleted),
        format!("{} unchanged", summary.unchanged),
    ];
    if summary.skipped > 0 {
        parts.push(format!("{} skipped", summary.skipped));
    }
    if summary.failed > 0 {
        parts.push(format!("{} failed", summary.failed));
    }
    let tally = parts.join(", ");

    if summary.is_success() {
        ui::success(&tally);
        Ok(())
    } else {
        ui::error(&tally);
        bail!("{} actions failed", summary.failed)
    }
}
