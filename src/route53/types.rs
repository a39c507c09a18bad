use serde::{Deserialize, Serialize};

/// A hosted zone as seen by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    pub id: String,   // "/hostedzone/Z0123456789ABC"
    pub name: String, // "example.com."
    pub record_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecordSet {
    pub name: String, // "www.example.com."
    #[serde(rename = "type")]
    pub rrtype: String, // "A", "NS", ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(flatten)]
    pub routing: RoutingMeta,
}

/// Routing policy fields of a record set. Copied as-is between accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failover: Option<String>, // "PRIMARY" / "SECONDARY"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<GeoLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_value_answer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_policy_instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
}

impl RoutingMeta {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTarget {
    pub hosted_zone_id: String,
    pub dns_name: String,
    pub evaluate_target_health: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdivision_code: Option<String>,
}

impl ResourceRecordSet {
    pub fn new(
        name: impl Into<String>,
        rrtype: impl Into<String>,
        ttl: i64,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            rrtype: rrtype.into(),
            ttl: Some(ttl),
            values: values.into_iter().map(Into::into).collect(),
            routing: RoutingMeta::default(),
        }
    }

    /// Record set identity: `(name, type, set identifier)`.
    pub fn identity(&self) -> (&str, &str, Option<&str>) {
        (
            &self.name,
            &self.rrtype,
            self.routing.set_identifier.as_deref(),
        )
    }

    pub fn is_type(&self, rrtype: &str) -> bool {
        self.rrtype.eq_ignore_ascii_case(rrtype)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Upsert,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub action: ChangeAction,
    pub record_set: ResourceRecordSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeStatus {
    Pending,
    Insync,
}

/// An in-flight asynchronous mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInfo {
    pub id: String, // "/change/C0123456789ABC"
    pub status: ChangeStatus,
}

impl ChangeInfo {
    pub fn is_in_sync(&self) -> bool {
        self.status == ChangeStatus::Insync
    }
}

/// Cursor for the next page of `ListResourceRecordSets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPageToken {
    pub name: String,
    pub rrtype: String,
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordSetPage {
    pub records: Vec<ResourceRecordSet>,
    pub next: Option<RecordPageToken>,
}
