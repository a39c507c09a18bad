use tracing::{info, warn};

use crate::changeset::{build_change_set, records_of, render_records};
use crate::confirm::Confirm;
use crate::error::{ErrorKind, Result, ZoneError};
use crate::reconcile::matches;
use crate::resolver::{NameserverLookup, resolve_authoritative};
use crate::route53::types::{Change, ChangeAction};
use crate::validation::validate_domain;
use crate::zone::{ZoneManager, find_ns_record};

#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub domain: String,
    pub dry_run: bool,
    /// Delete even when the live nameservers still point at this zone.
    pub force: bool,
}

#[derive(Debug)]
pub enum DeleteOutcome {
    /// Live DNS still answers from this zone; nothing was touched.
    StillServing,
    DryRun { planned: Vec<Change> },
    /// The operator declined the confirmation.
    Aborted,
    Deleted { zone_id: String, records: usize },
}

/// Delete every non-apex record set in the zone, then the zone itself.
pub async fn delete_zone(
    zones: &ZoneManager,
    resolver: &dyn NameserverLookup,
    confirm: &dyn Confirm,
    req: &DeleteRequest,
) -> Result<DeleteOutcome> {
    let domain = validate_domain(&req.domain)?;
    let domain = domain.as_str();

    let zone = zones.get_hosted_zone(domain).await?;
    let records = zones.get_resource_records(&zone.id).await?;

    let mut force = req.force;
    let live_ns = match resolve_authoritative(resolver, domain).await {
        Ok(ns) => ns,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!("No NS records found for {domain}, forcing");
            force = true;
            Vec::new()
        }
        Err(err) => return Err(err),
    };

    let zone_ns = find_ns_record(&zone.name, &records).ok_or_else(|| ZoneError::ZoneNsMissing {
        zone_id: zone.id.clone(),
    })?;

    if !force && matches(&live_ns, zone_ns) {
        info!("Nameservers for {domain} match, not deleting zone");
        return Ok(DeleteOutcome::StillServing);
    }

    let changes = build_change_set(domain, &records, ChangeAction::Delete);
    info!("Found {} records for domain {domain} to delete", changes.len());
    for line in render_records(&records_of(&changes)) {
        info!("  {line}");
    }

    if req.dry_run {
        info!("Dry run...exiting");
        return Ok(DeleteOutcome::DryRun { planned: changes });
    }

    if !confirm.confirm("Delete all records?").await? {
        info!("Aborting");
        return Ok(DeleteOutcome::Aborted);
    }

    let max_wait = zones.wait_config().change_timeout;

    info!("Deleting records...");
    if let Some(change) = zones.delete_records(&zone, &records).await? {
        zones.wait_for_change(&change.id, max_wait).await?;
    }
    info!("Deleted all records for domain {domain}");

    info!("Removing zoneId {}...", zone.id);
    let change = zones.delete_hosted_zone(&zone.id).await?;
    zones.wait_for_change(&change.id, max_wait).await?;
    info!("Deleted zoneId {}", zone.id);

    Ok(DeleteOutcome::Deleted {
        zone_id: zone.id,
        records: changes.len(),
    })
}
