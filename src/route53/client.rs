use crate::route53::Route53Api;
use crate::route53::types::*;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use aws_sdk_route53::{Client, types as sdk};

#[derive(Clone)]
pub struct Route53Client {
    sdk: Client,
    profile: String, // only used in error context
}

impl Route53Client {
    pub fn new(config: &aws_config::SdkConfig, profile: impl Into<String>) -> Self {
        Self {
            sdk: Client::new(config),
            profile: profile.into(),
        }
    }
}

#[async_trait]
impl Route53Api for Route53Client {
    async fn list_hosted_zones_by_name(
        &self,
        dns_name: &str,
        max_items: i32,
    ) -> anyhow::Result<Vec<HostedZone>> {
        let res = self
            .sdk
            .list_hosted_zones_by_name()
            .dns_name(dns_name)
            .max_items(max_items)
            .send()
            .await
            .with_context(|| {
                format!("[{}] Route53 list_hosted_zones_by_name failed", self.profile)
            })?;
        Ok(res.hosted_zones().iter().map(zone_from_sdk).collect())
    }

    async fn get_hosted_zone(&self, zone_id: &str) -> anyhow::Result<HostedZone> {
        let res = self
            .sdk
            .get_hosted_zone()
            .id(zone_id)
            .send()
            .await
            .with_context(|| format!("[{}] Route53 get_hosted_zone failed", self.profile))?;
        res.hosted_zone()
            .map(zone_from_sdk)
            .ok_or_else(|| anyhow!("Route53 get_hosted_zone returned no zone for {zone_id}"))
    }

    async fn create_hosted_zone(
        &self,
        name: &str,
        caller_reference: &str,
        comment: &str,
    ) -> anyhow::Result<(HostedZone, ChangeInfo)> {
        let zone_config = sdk::HostedZoneConfig::builder()
            .comment(comment)
            .private_zone(false)
            .build();
        let res = self
            .sdk
            .create_hosted_zone()
            .name(name)
            .caller_reference(caller_reference)
            .hosted_zone_config(zone_config)
            .send()
            .await
            .with_context(|| format!("[{}] Route53 create_hosted_zone failed", self.profile))?;

        let zone = res
            .hosted_zone()
            .map(zone_from_sdk)
            .ok_or_else(|| anyhow!("Route53 create_hosted_zone returned no zone for {name}"))?;
        let change = res
            .change_info()
            .map(change_from_sdk)
            .ok_or_else(|| anyhow!("Route53 create_hosted_zone returned no change for {name}"))?;
        Ok((zone, change))
    }

    async fn delete_hosted_zone(&self, zone_id: &str) -> anyhow::Result<ChangeInfo> {
        let res = self
            .sdk
            .delete_hosted_zone()
            .id(zone_id)
            .send()
            .await
            .with_context(|| format!("[{}] Route53 delete_hosted_zone failed", self.profile))?;
        res.change_info()
            .map(change_from_sdk)
            .ok_or_else(|| anyhow!("Route53 delete_hosted_zone returned no change for {zone_id}"))
    }

    async fn list_resource_record_sets(
        &self,
        zone_id: &str,
        start: Option<&RecordPageToken>,
    ) -> anyhow::Result<RecordSetPage> {
        let res = self
            .sdk
            .list_resource_record_sets()
            .hosted_zone_id(zone_id)
            .set_start_record_name(start.map(|t| t.name.clone()))
            .set_start_record_type(start.map(|t| sdk::RrType::from(t.rrtype.as_str())))
            .set_start_record_identifier(start.and_then(|t| t.identifier.clone()))
            .send()
            .await
            .with_context(|| {
                format!("[{}] Route53 list_resource_record_sets failed", self.profile)
            })?;

        let records = res
            .resource_record_sets()
            .iter()
            .map(record_from_sdk)
            .collect();

        let next = match (res.is_truncated(), res.next_record_name(), res.next_record_type()) {
            (true, Some(name), Some(rrtype)) => Some(RecordPageToken {
                name: name.to_string(),
                rrtype: rrtype.as_str().to_string(),
                identifier: res.next_record_identifier().map(str::to_string),
            }),
            _ => None,
        };

        Ok(RecordSetPage { records, next })
    }

    async fn change_resource_record_sets(
        &self,
        zone_id: &str,
        changes: &[Change],
        comment: Option<&str>,
    ) -> anyhow::Result<ChangeInfo> {
        let sdk_changes = changes
            .iter()
            .map(change_to_sdk)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let batch = sdk::ChangeBatch::builder()
            .set_changes(Some(sdk_changes))
            .set_comment(comment.map(str::to_string))
            .build()
            .context("invalid change batch")?;

        let res = self
            .sdk
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
            .with_context(|| {
                format!("[{}] Route53 change_resource_record_sets failed", self.profile)
            })?;
        res.change_info()
            .map(change_from_sdk)
            .ok_or_else(|| anyhow!("Route53 change_resource_record_sets returned no change"))
    }

    async fn get_change(&self, change_id: &str) -> anyhow::Result<ChangeInfo> {
        let res = self
            .sdk
            .get_change()
            .id(change_id)
            .send()
            .await
            .with_context(|| format!("[{}] Route53 get_change failed", self.profile))?;
        res.change_info()
            .map(change_from_sdk)
            .ok_or_else(|| anyhow!("Route53 get_change returned no change for {change_id}"))
    }
}

fn zone_from_sdk(z: &sdk::HostedZone) -> HostedZone {
    HostedZone {
        id: z.id().to_string(),
        name: z.name().to_string(),
        record_count: z.resource_record_set_count(),
    }
}

fn change_from_sdk(c: &sdk::ChangeInfo) -> ChangeInfo {
    let status = match c.status() {
        sdk::ChangeStatus::Insync => ChangeStatus::Insync,
        _ => ChangeStatus::Pending,
    };
    ChangeInfo {
        id: c.id().to_string(),
        status,
    }
}

fn record_from_sdk(rrs: &sdk::ResourceRecordSet) -> ResourceRecordSet {
    ResourceRecordSet {
        name: rrs.name().to_string(),
        rrtype: rrs.r#type().as_str().to_string(),
        ttl: rrs.ttl(),
        values: rrs
            .resource_records()
            .iter()
            .map(|r| r.value().to_string())
            .collect(),
        routing: RoutingMeta {
            alias_target: rrs.alias_target().map(|a| AliasTarget {
                hosted_zone_id: a.hosted_zone_id().to_string(),
                dns_name: a.dns_name().to_string(),
                evaluate_target_health: a.evaluate_target_health(),
            }),
            failover: rrs.failover().map(|f| f.as_str().to_string()),
            geo_location: rrs.geo_location().map(|g| GeoLocation {
                continent_code: g.continent_code().map(str::to_string),
                country_code: g.country_code().map(str::to_string),
                subdivision_code: g.subdivision_code().map(str::to_string),
            }),
            health_check_id: rrs.health_check_id().map(str::to_string),
            multi_value_answer: rrs.multi_value_answer(),
            region: rrs.region().map(|r| r.as_str().to_string()),
            set_identifier: rrs.set_identifier().map(str::to_string),
            traffic_policy_instance_id: rrs.traffic_policy_instance_id().map(str::to_string),
            weight: rrs.weight(),
        },
    }
}

fn record_to_sdk(rs: &ResourceRecordSet) -> anyhow::Result<sdk::ResourceRecordSet> {
    let records = rs
        .values
        .iter()
        .map(|v| sdk::ResourceRecord::builder().value(v).build())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid record value in {} {}", rs.name, rs.rrtype))?;

    let routing = &rs.routing;
    let alias_target = routing
        .alias_target
        .as_ref()
        .map(|a| {
            sdk::AliasTarget::builder()
                .hosted_zone_id(&a.hosted_zone_id)
                .dns_name(&a.dns_name)
                .evaluate_target_health(a.evaluate_target_health)
                .build()
        })
        .transpose()
        .with_context(|| format!("invalid alias target in {} {}", rs.name, rs.rrtype))?;
    let geo_location = routing.geo_location.as_ref().map(|g| {
        sdk::GeoLocation::builder()
            .set_continent_code(g.continent_code.clone())
            .set_country_code(g.country_code.clone())
            .set_subdivision_code(g.subdivision_code.clone())
            .build()
    });

    sdk::ResourceRecordSet::builder()
        .name(&rs.name)
        .r#type(sdk::RrType::from(rs.rrtype.as_str()))
        .set_ttl(rs.ttl)
        // alias record sets must not carry resource records
        .set_resource_records((!records.is_empty()).then_some(records))
        .set_alias_target(alias_target)
        .set_failover(
            routing
                .failover
                .as_deref()
                .map(sdk::ResourceRecordSetFailover::from),
        )
        .set_geo_location(geo_location)
        .set_health_check_id(routing.health_check_id.clone())
        .set_multi_value_answer(routing.multi_value_answer)
        .set_region(routing.region.as_deref().map(sdk::ResourceRecordSetRegion::from))
        .set_set_identifier(routing.set_identifier.clone())
        .set_traffic_policy_instance_id(routing.traffic_policy_instance_id.clone())
        .set_weight(routing.weight)
        .build()
        .with_context(|| format!("invalid record set {} {}", rs.name, rs.rrtype))
}

fn change_to_sdk(change: &Change) -> anyhow::Result<sdk::Change> {
    let action = match change.action {
        ChangeAction::Upsert => sdk::ChangeAction::Upsert,
        ChangeAction::Delete => sdk::ChangeAction::Delete,
    };
    sdk::Change::builder()
        .action(action)
        .resource_record_set(record_to_sdk(&change.record_set)?)
        .build()
        .context("invalid change")
}
