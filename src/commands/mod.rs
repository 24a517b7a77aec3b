// Declarative reconciliation (plan/apply)
pub mod reconcile;

// Read-only lookups
pub mod get;
