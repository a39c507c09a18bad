//! Route53 hosted-zone API: provider-neutral types plus the seam the
//! lifecycle manager talks to.
pub mod client;
pub mod types;

use async_trait::async_trait;

use types::{Change, ChangeInfo, HostedZone, RecordPageToken, RecordSetPage};

/// Black-box Route53 operations for a single account.
#[async_trait]
pub trait Route53Api: Send + Sync {
    /// Zones ordered by name starting at `dns_name`; not an exact-match lookup.
    async fn list_hosted_zones_by_name(
        &self,
        dns_name: &str,
        max_items: i32,
    ) -> anyhow::Result<Vec<HostedZone>>;

    async fn get_hosted_zone(&self, zone_id: &str) -> anyhow::Result<HostedZone>;

    async fn create_hosted_zone(
        &self,
        name: &str,
        caller_reference: &str,
        comment: &str,
    ) -> anyhow::Result<(HostedZone, ChangeInfo)>;

    async fn delete_hosted_zone(&self, zone_id: &str) -> anyhow::Result<ChangeInfo>;

    async fn list_resource_record_sets(
        &self,
        zone_id: &str,
        start: Option<&RecordPageToken>,
    ) -> anyhow::Result<RecordSetPage>;

    async fn change_resource_record_sets(
        &self,
        zone_id: &str,
        changes: &[Change],
        comment: Option<&str>,
    ) -> anyhow::Result<ChangeInfo>;

    async fn get_change(&self, change_id: &str) -> anyhow::Result<ChangeInfo>;
}
