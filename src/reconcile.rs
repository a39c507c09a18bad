//! Registrar nameserver reconciliation.
use tracing::info;

use crate::error::Result;
use crate::registrar::RegistrarApi;
use crate::route53::types::{HostedZone, ResourceRecordSet};
use crate::validation::denormalize;
use crate::zone::ZoneManager;

/// Result of an opt-in registrar update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NsUpdate {
    Updated { operation_id: String },
    AlreadyInSync,
}

/// True when every NS value of the zone is present in `nameservers`.
/// One-directional: extra registrar entries are tolerated.
pub fn matches(nameservers: &[String], zone_ns: &ResourceRecordSet) -> bool {
    zone_ns.values.iter().all(|value| {
        let wanted = denormalize(value);
        nameservers
            .iter()
            .any(|ns| denormalize(ns).eq_ignore_ascii_case(wanted))
    })
}

/// The zone's NS values in the form the registrar expects.
pub fn nameservers_from_records(zone_ns: &ResourceRecordSet) -> Vec<String> {
    zone_ns
        .values
        .iter()
        .map(|v| denormalize(v).to_string())
        .collect()
}

/// Point the registrar at the zone's nameservers unless it already does.
pub async fn update_registrar_ns(
    zones: &ZoneManager,
    registrar: &dyn RegistrarApi,
    zone: &HostedZone,
    domain: &str,
) -> Result<NsUpdate> {
    let zone_ns = zones.get_ns_records(zone).await?;
    let current = registrar.get_nameservers(domain).await?;

    if matches(&current, &zone_ns) {
        return Ok(NsUpdate::AlreadyInSync);
    }

    let wanted = nameservers_from_records(&zone_ns);
    let operation_id = registrar.update_nameservers(domain, &wanted).await?;
    info!(
        domain,
        operation_id = %operation_id,
        "updated registrar NS records: {}",
        wanted.join(", ")
    );
    Ok(NsUpdate::Updated { operation_id })
}
