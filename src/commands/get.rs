//! Look up a single group on the service without managing it.

use anyhow::{Context, Result};
use directory::GroupReader;

use crate::cli::GetArgs;
use crate::commands::reconcile::call_context;
use crate::config::Manifest;
use crate::ui;

pub fn run(args: &GetArgs) -> Result<()> {
    let manifest = Manifest::load(&args.config)?;
    let reader = GroupReader::new(manifest.client_config()?);

    let call = call_context(args.timeout);
    let record = reader
        .lookup(&call, &args.identifier)
        .with_context(|| format!("Could not resolve group {:?}", args.identifier))?;

    ui::header(&record.name);
    ui::kv("id", &record.id);
    if !record.description.is_empty() {
        ui::kv("description", &record.description);
    }
    Ok(())
}
