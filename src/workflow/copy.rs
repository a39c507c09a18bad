use std::time::Duration;

use tracing::info;

use crate::changeset::{build_change_set, records_of, render_records};
use crate::error::Result;
use crate::reconcile::{NsUpdate, update_registrar_ns};
use crate::registrar::RegistrarApi;
use crate::route53::types::{Change, ChangeAction};
use crate::validation::validate_domain;
use crate::zone::ZoneManager;

#[derive(Debug, Clone)]
pub struct CopyRequest {
    pub domain: String,
    pub dry_run: bool,
    /// Point the destination registrar at the destination zone afterwards.
    pub update_registrar_ns: bool,
}

#[derive(Debug)]
pub enum CopyOutcome {
    DryRun {
        planned: Vec<Change>,
        /// Includes NS and SOA; 0 when the destination has no such zone yet.
        destination_record_count: i64,
    },
    Copied {
        zone_id: String,
        copied: usize,
        change_id: Option<String>,
        waited: Option<Duration>,
        registrar: Option<NsUpdate>,
    },
}

/// Copy every record set except apex NS/SOA from `source` into the same
/// domain in `destination`, creating the destination zone when missing.
pub async fn copy_zone(
    source: &ZoneManager,
    destination: &ZoneManager,
    registrar: &dyn RegistrarApi,
    req: &CopyRequest,
) -> Result<CopyOutcome> {
    let domain = validate_domain(&req.domain)?;
    let domain = domain.as_str();

    let src_zone = source.get_hosted_zone(domain).await?;
    let records = source.get_resource_records(&src_zone.id).await?;
    let changes = build_change_set(domain, &records, ChangeAction::Upsert);
    info!("Number of records to copy: {}", changes.len());

    if req.dry_run {
        info!(
            "Not copying records to {} since --dry is given",
            destination.label()
        );
        for line in render_records(&records_of(&changes)) {
            info!("  {line}");
        }
        let destination_record_count = match destination.get_hosted_zone(domain).await {
            Ok(zone) => zone.record_count.unwrap_or_default(),
            Err(err) if err.is_not_found() => {
                info!("Destination profile does not contain {domain} yet");
                0
            }
            Err(err) => return Err(err),
        };
        info!(
            "Destination profile contains {destination_record_count} records, including NS and SOA"
        );
        return Ok(CopyOutcome::DryRun {
            planned: changes,
            destination_record_count,
        });
    }

    let dst_zone = destination.get_or_create_zone(domain).await?;

    let mut change_id = None;
    let mut waited = None;
    if changes.is_empty() {
        info!("No records besides NS and SOA in '{domain}', nothing to copy");
    } else {
        let change = destination
            .update_records(source.label(), &dst_zone.id, &changes)
            .await?;
        info!(
            "{} records in '{domain}' were copied from {} to {}",
            changes.len(),
            source.label(),
            destination.label()
        );

        if !change.is_in_sync() {
            let max_wait = destination.wait_config().change_timeout;
            let elapsed = destination.wait_for_change(&change.id, max_wait).await?;
            info!(
                "{} records in '{domain}' are in sync after {elapsed:?}",
                changes.len()
            );
            waited = Some(elapsed);
        }
        change_id = Some(change.id);
    }

    let registrar_update = if req.update_registrar_ns {
        info!("Updating NS records");
        let update = update_registrar_ns(destination, registrar, &dst_zone, domain).await?;
        match &update {
            NsUpdate::Updated { .. } => info!("Registrar NS records for '{domain}' updated"),
            NsUpdate::AlreadyInSync => {
                info!("Registrar NS records for '{domain}' are already up to date")
            }
        }
        Some(update)
    } else {
        None
    };

    Ok(CopyOutcome::Copied {
        zone_id: dst_zone.id,
        copied: changes.len(),
        change_id,
        waited,
        registrar: registrar_update,
    })
}
