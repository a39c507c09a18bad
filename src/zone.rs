//! Hosted-zone lifecycle for one account: lookup, on-demand creation,
//! record paging, change submission and the propagation waiter.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info};

use crate::changeset::build_change_set;
use crate::config::WaitConfig;
use crate::error::{LookupMiss, Result, ZoneError};
use crate::route53::Route53Api;
use crate::route53::types::{
    Change, ChangeAction, ChangeInfo, HostedZone, RecordPageToken, ResourceRecordSet,
};
use crate::validation::{denormalize, normalize};

const ZONE_COMMENT: &str = "Created by route53copy";

static CREATE_SEQ: AtomicU64 = AtomicU64::new(0);

/// `CreateHostedZone` token. Must differ on every call or Route53 treats the
/// request as a retry of an earlier create.
fn caller_reference(domain: &str) -> String {
    let seq = CREATE_SEQ.fetch_add(1, Ordering::Relaxed);
    format!(
        "{}-{}-{seq}",
        denormalize(domain),
        Utc::now().timestamp_millis()
    )
}

#[derive(Clone)]
pub struct ZoneManager {
    api: Arc<dyn Route53Api>,
    label: String, // profile name, used in logs and change comments
    wait: WaitConfig,
}

impl ZoneManager {
    pub fn new(api: Arc<dyn Route53Api>, label: impl Into<String>, wait: WaitConfig) -> Self {
        Self {
            api,
            label: label.into(),
            wait,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn wait_config(&self) -> WaitConfig {
        self.wait
    }

    /// Exact-name lookup. `ListHostedZonesByName` returns the closest zone at
    /// or after the name, so the first result is only accepted when its name
    /// matches exactly.
    pub async fn get_hosted_zone(&self, domain: &str) -> Result<HostedZone> {
        let apex = normalize(domain);
        let zones = self.api.list_hosted_zones_by_name(&apex, 1).await?;

        let Some(zone) = zones.into_iter().next() else {
            return Err(ZoneError::zone_not_found(domain, LookupMiss::Empty));
        };
        if zone.name != apex {
            return Err(ZoneError::zone_not_found(
                domain,
                LookupMiss::NameMismatch { found: zone.name },
            ));
        }
        Ok(zone)
    }

    pub async fn get_or_create_zone(&self, domain: &str) -> Result<HostedZone> {
        match self.get_hosted_zone(domain).await {
            Ok(zone) => Ok(zone),
            Err(err) if err.is_not_found() => {
                info!(profile = %self.label, domain, "profile does not contain zone, creating it");
                self.create_zone(domain).await
            }
            Err(err) => Err(err),
        }
    }

    /// Create a public zone. When the creation is still pending, wait for it
    /// and re-read the zone so its record count and NS set are populated.
    pub async fn create_zone(&self, domain: &str) -> Result<HostedZone> {
        let name = normalize(domain);
        let reference = caller_reference(domain);

        let (zone, change) = self
            .api
            .create_hosted_zone(&name, &reference, ZONE_COMMENT)
            .await?;
        info!(profile = %self.label, zone_id = %zone.id, "created hosted zone {name}");

        if change.is_in_sync() {
            return Ok(zone);
        }

        let waited = self
            .wait_for_change(&change.id, self.wait.zone_create_timeout)
            .await?;
        info!("waited {waited:?} for zone '{domain}' to be in sync");

        Ok(self.api.get_hosted_zone(&zone.id).await?)
    }

    /// Poll `GetChange` until the change is in sync. Returns how long it took,
    /// or `ChangeTimeout` once `max_wait` has elapsed.
    pub async fn wait_for_change(&self, change_id: &str, max_wait: Duration) -> Result<Duration> {
        let start = Instant::now();
        match timeout(max_wait, self.poll_until_in_sync(change_id)).await {
            Ok(res) => res.map(|()| start.elapsed()),
            Err(_) => Err(ZoneError::ChangeTimeout {
                change_id: change_id.to_string(),
                waited: max_wait,
            }),
        }
    }

    async fn poll_until_in_sync(&self, change_id: &str) -> Result<()> {
        loop {
            let change = self.api.get_change(change_id).await?;
            if change.is_in_sync() {
                return Ok(());
            }
            debug!(change_id, "change pending");
            sleep(self.wait.poll_interval).await;
        }
    }

    pub fn record_pages(&self, zone_id: &str) -> RecordSetPages<'_> {
        RecordSetPages {
            api: self.api.as_ref(),
            zone_id: zone_id.to_string(),
            next: None,
            done: false,
        }
    }

    /// Every record set in the zone, across all pages, in listing order.
    pub async fn get_resource_records(&self, zone_id: &str) -> Result<Vec<ResourceRecordSet>> {
        let mut pages = self.record_pages(zone_id);
        let mut records = Vec::new();
        while pages.has_more_pages() {
            records.extend(pages.next_page().await?);
        }
        Ok(records)
    }

    /// The zone's own apex NS record set.
    pub async fn get_ns_records(&self, zone: &HostedZone) -> Result<ResourceRecordSet> {
        let records = self.get_resource_records(&zone.id).await?;
        find_ns_record(&zone.name, &records)
            .cloned()
            .ok_or_else(|| ZoneError::ZoneNsMissing {
                zone_id: zone.id.clone(),
            })
    }

    /// Submit a batch as one transaction, tagged with where it came from.
    pub async fn update_records(
        &self,
        source_label: &str,
        zone_id: &str,
        changes: &[Change],
    ) -> Result<ChangeInfo> {
        let comment = format!("Importing ALL records from {source_label}");
        Ok(self
            .api
            .change_resource_record_sets(zone_id, changes, Some(&comment))
            .await?)
    }

    /// Delete every record set except the apex NS/SOA. Returns `None` when
    /// there is nothing to delete.
    pub async fn delete_records(
        &self,
        zone: &HostedZone,
        records: &[ResourceRecordSet],
    ) -> Result<Option<ChangeInfo>> {
        let changes = build_change_set(&zone.name, records, ChangeAction::Delete);
        if changes.is_empty() {
            return Ok(None);
        }
        let change = self
            .api
            .change_resource_record_sets(&zone.id, &changes, None)
            .await?;
        Ok(Some(change))
    }

    /// Route53 rejects this while non-apex records remain, so records must be
    /// deleted and in sync first.
    pub async fn delete_hosted_zone(&self, zone_id: &str) -> Result<ChangeInfo> {
        Ok(self.api.delete_hosted_zone(zone_id).await?)
    }
}

/// Lazy pager over `ListResourceRecordSets`. Finite and not restartable;
/// build a new one to read the zone again.
pub struct RecordSetPages<'a> {
    api: &'a dyn Route53Api,
    zone_id: String,
    next: Option<RecordPageToken>,
    done: bool,
}

impl RecordSetPages<'_> {
    pub fn has_more_pages(&self) -> bool {
        !self.done
    }

    pub async fn next_page(&mut self) -> Result<Vec<ResourceRecordSet>> {
        if self.done {
            return Ok(Vec::new());
        }
        let page = match self
            .api
            .list_resource_record_sets(&self.zone_id, self.next.as_ref())
            .await
        {
            Ok(page) => page,
            Err(err) => {
                self.done = true;
                return Err(err.into());
            }
        };
        self.next = page.next;
        self.done = self.next.is_none();
        Ok(page.records)
    }
}

/// First NS record set named exactly `apex`.
pub fn find_ns_record<'a>(
    apex: &str,
    records: &'a [ResourceRecordSet],
) -> Option<&'a ResourceRecordSet> {
    let apex = normalize(apex);
    records.iter().find(|r| r.is_type("NS") && r.name == apex)
}
