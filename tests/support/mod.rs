//! In-memory stand-ins for the Route53, registrar, resolver and prompt seams.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use route53copy::config::WaitConfig;
use route53copy::confirm::Confirm;
use route53copy::error::{Result as ZoneResult, ZoneError};
use route53copy::registrar::RegistrarApi;
use route53copy::registrar::types::Transfer;
use route53copy::resolver::NameserverLookup;
use route53copy::route53::Route53Api;
use route53copy::route53::types::*;
use route53copy::zone::ZoneManager;

pub const AWS_NS: [&str; 4] = [
    "ns-1.awsdns-01.org.",
    "ns-2.awsdns-02.co.uk.",
    "ns-3.awsdns-03.com.",
    "ns-4.awsdns-04.net.",
];

pub fn test_wait() -> WaitConfig {
    WaitConfig {
        poll_interval: Duration::from_secs(15),
        zone_create_timeout: Duration::from_secs(60),
        change_timeout: Duration::from_secs(120),
    }
}

pub fn a_record(name: &str, ip: &str) -> ResourceRecordSet {
    ResourceRecordSet::new(name, "A", 300, [ip])
}

pub fn apex_records(apex: &str, ns: &[&str]) -> Vec<ResourceRecordSet> {
    vec![
        ResourceRecordSet::new(apex, "NS", 172800, ns.iter().copied()),
        ResourceRecordSet::new(
            apex,
            "SOA",
            900,
            [format!(
                "{} awsdns-hostmaster.amazon.com. 1 7200 900 1209600 86400",
                ns[0]
            )],
        ),
    ]
}

#[derive(Default)]
struct State {
    zones: Vec<HostedZone>,
    records: HashMap<String, Vec<ResourceRecordSet>>,
    // change id -> polls left before the change reports INSYNC
    pending: HashMap<String, u32>,
    batches: Vec<(String, Vec<Change>, Option<String>)>,
    calls: Vec<String>,
    caller_references: HashSet<String>,
    next_id: u32,
}

/// Route53 for one account. Changes stay PENDING for `pending_polls`
/// `GetChange` calls, then report INSYNC.
pub struct FakeRoute53 {
    state: Mutex<State>,
    pending_polls: u32,
    page_size: usize,
    fail_list_zones: bool,
}

impl FakeRoute53 {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            pending_polls: 0,
            page_size: 100,
            fail_list_zones: false,
        }
    }

    pub fn with_pending_polls(mut self, polls: u32) -> Self {
        self.pending_polls = polls;
        self
    }

    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn failing_zone_listing(mut self) -> Self {
        self.fail_list_zones = true;
        self
    }

    /// Seed a zone with apex NS/SOA plus `extra` records; returns its id.
    pub fn add_zone(&self, apex: &str, ns: &[&str], extra: Vec<ResourceRecordSet>) -> String {
        let mut st = self.state.lock().unwrap();
        st.next_id += 1;
        let id = format!("/hostedzone/Z{:04}", st.next_id);
        let mut records = apex_records(apex, ns);
        records.extend(extra);
        st.zones.push(HostedZone {
            id: id.clone(),
            name: apex.to_string(),
            record_count: Some(records.len() as i64),
        });
        st.records.insert(id.clone(), records);
        id
    }

    pub fn zones(&self) -> Vec<HostedZone> {
        self.state.lock().unwrap().zones.clone()
    }

    pub fn records(&self, zone_id: &str) -> Vec<ResourceRecordSet> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(zone_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn batches(&self) -> Vec<(String, Vec<Change>, Option<String>)> {
        self.state.lock().unwrap().batches.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn new_change(&self, st: &mut State) -> ChangeInfo {
        st.next_id += 1;
        let id = format!("/change/C{:04}", st.next_id);
        st.pending.insert(id.clone(), self.pending_polls);
        ChangeInfo {
            id,
            status: if self.pending_polls == 0 {
                ChangeStatus::Insync
            } else {
                ChangeStatus::Pending
            },
        }
    }

    fn refresh_count(st: &mut State, zone_id: &str) {
        let count = st.records.get(zone_id).map(Vec::len).unwrap_or(0) as i64;
        if let Some(zone) = st.zones.iter_mut().find(|z| z.id == zone_id) {
            zone.record_count = Some(count);
        }
    }
}

#[async_trait]
impl Route53Api for FakeRoute53 {
    async fn list_hosted_zones_by_name(
        &self,
        dns_name: &str,
        max_items: i32,
    ) -> anyhow::Result<Vec<HostedZone>> {
        let mut st = self.state.lock().unwrap();
        st.calls.push(format!("list_hosted_zones_by_name {dns_name}"));
        if self.fail_list_zones {
            bail!("AccessDenied: not authorized to perform route53:ListHostedZonesByName");
        }
        let mut zones = st
            .zones
            .iter()
            .filter(|z| z.name.as_str() >= dns_name)
            .cloned()
            .collect::<Vec<_>>();
        zones.sort_by(|a, b| a.name.cmp(&b.name));
        zones.truncate(max_items as usize);
        Ok(zones)
    }

    async fn get_hosted_zone(&self, zone_id: &str) -> anyhow::Result<HostedZone> {
        let mut st = self.state.lock().unwrap();
        st.calls.push(format!("get_hosted_zone {zone_id}"));
        st.zones
            .iter()
            .find(|z| z.id == zone_id)
            .cloned()
            .ok_or_else(|| anyhow!("NoSuchHostedZone: {zone_id}"))
    }

    async fn create_hosted_zone(
        &self,
        name: &str,
        caller_reference: &str,
        _comment: &str,
    ) -> anyhow::Result<(HostedZone, ChangeInfo)> {
        {
            let mut st = self.state.lock().unwrap();
            st.calls
                .push(format!("create_hosted_zone {name} {caller_reference}"));
            if !st.caller_references.insert(caller_reference.to_string()) {
                bail!("HostedZoneAlreadyExists: caller reference {caller_reference} already used");
            }
        }
        let id = self.add_zone(name, &AWS_NS, Vec::new());
        let mut st = self.state.lock().unwrap();
        let change = self.new_change(&mut st);
        // the create response does not carry the record count yet
        let zone = HostedZone {
            id,
            name: name.to_string(),
            record_count: None,
        };
        Ok((zone, change))
    }

    async fn delete_hosted_zone(&self, zone_id: &str) -> anyhow::Result<ChangeInfo> {
        let mut st = self.state.lock().unwrap();
        st.calls.push(format!("delete_hosted_zone {zone_id}"));
        let Some(pos) = st.zones.iter().position(|z| z.id == zone_id) else {
            bail!("NoSuchHostedZone: {zone_id}");
        };
        let apex = st.zones[pos].name.clone();
        let leftover = st
            .records
            .get(zone_id)
            .map(|rs| {
                rs.iter()
                    .filter(|r| !((r.rrtype == "NS" || r.rrtype == "SOA") && r.name == apex))
                    .count()
            })
            .unwrap_or(0);
        if leftover > 0 {
            bail!("HostedZoneNotEmpty: {leftover} records remain in {zone_id}");
        }
        st.zones.remove(pos);
        st.records.remove(zone_id);
        Ok(self.new_change(&mut st))
    }

    async fn list_resource_record_sets(
        &self,
        zone_id: &str,
        start: Option<&RecordPageToken>,
    ) -> anyhow::Result<RecordSetPage> {
        let mut st = self.state.lock().unwrap();
        st.calls.push(format!("list_resource_record_sets {zone_id}"));
        let all = st
            .records
            .get(zone_id)
            .cloned()
            .ok_or_else(|| anyhow!("NoSuchHostedZone: {zone_id}"))?;

        let from = match start {
            None => 0,
            Some(token) => all
                .iter()
                .position(|r| {
                    r.name == token.name
                        && r.rrtype == token.rrtype
                        && r.routing.set_identifier == token.identifier
                })
                .ok_or_else(|| anyhow!("InvalidInput: bad start record"))?,
        };
        let to = (from + self.page_size).min(all.len());
        let next = all.get(to).map(|r| RecordPageToken {
            name: r.name.clone(),
            rrtype: r.rrtype.clone(),
            identifier: r.routing.set_identifier.clone(),
        });
        Ok(RecordSetPage {
            records: all[from..to].to_vec(),
            next,
        })
    }

    async fn change_resource_record_sets(
        &self,
        zone_id: &str,
        changes: &[Change],
        comment: Option<&str>,
    ) -> anyhow::Result<ChangeInfo> {
        let mut st = self.state.lock().unwrap();
        st.calls.push(format!("change_resource_record_sets {zone_id}"));
        if changes.is_empty() {
            bail!("InvalidChangeBatch: empty change batch");
        }
        let mut records = st
            .records
            .get(zone_id)
            .cloned()
            .ok_or_else(|| anyhow!("NoSuchHostedZone: {zone_id}"))?;

        // validate the whole batch before applying anything
        for change in changes {
            let id = change.record_set.identity();
            let pos = records.iter().position(|r| r.identity() == id);
            match change.action {
                ChangeAction::Upsert => match pos {
                    Some(pos) => records[pos] = change.record_set.clone(),
                    None => records.push(change.record_set.clone()),
                },
                ChangeAction::Delete => match pos {
                    Some(pos) => {
                        records.remove(pos);
                    }
                    None => bail!("InvalidChangeBatch: {} {} not found", id.0, id.1),
                },
            }
        }

        st.records.insert(zone_id.to_string(), records);
        FakeRoute53::refresh_count(&mut st, zone_id);
        st.batches.push((
            zone_id.to_string(),
            changes.to_vec(),
            comment.map(str::to_string),
        ));
        Ok(self.new_change(&mut st))
    }

    async fn get_change(&self, change_id: &str) -> anyhow::Result<ChangeInfo> {
        let mut st = self.state.lock().unwrap();
        st.calls.push(format!("get_change {change_id}"));
        let Some(left) = st.pending.get_mut(change_id) else {
            bail!("NoSuchChange: {change_id}");
        };
        let status = if *left == 0 {
            ChangeStatus::Insync
        } else {
            *left -= 1;
            ChangeStatus::Pending
        };
        Ok(ChangeInfo {
            id: change_id.to_string(),
            status,
        })
    }
}

pub fn manager(api: &Arc<FakeRoute53>, label: &str) -> ZoneManager {
    ZoneManager::new(api.clone(), label, test_wait())
}

#[derive(Default)]
pub struct FakeRegistrar {
    nameservers: Mutex<HashMap<String, Vec<String>>>,
    updates: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeRegistrar {
    pub fn with_domain(domain: &str, ns: &[&str]) -> Self {
        let reg = Self::default();
        reg.nameservers.lock().unwrap().insert(
            domain.to_string(),
            ns.iter().map(|s| s.to_string()).collect(),
        );
        reg
    }

    pub fn updates(&self) -> Vec<(String, Vec<String>)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn nameservers(&self, domain: &str) -> Vec<String> {
        self.nameservers
            .lock()
            .unwrap()
            .get(domain)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RegistrarApi for FakeRegistrar {
    async fn get_nameservers(&self, domain: &str) -> anyhow::Result<Vec<String>> {
        self.nameservers
            .lock()
            .unwrap()
            .get(domain)
            .cloned()
            .ok_or_else(|| anyhow!("UnsupportedTLD/InvalidInput: {domain} not registered here"))
    }

    async fn update_nameservers(
        &self,
        domain: &str,
        nameservers: &[String],
    ) -> anyhow::Result<String> {
        self.nameservers
            .lock()
            .unwrap()
            .insert(domain.to_string(), nameservers.to_vec());
        self.updates
            .lock()
            .unwrap()
            .push((domain.to_string(), nameservers.to_vec()));
        Ok("op-update-1".to_string())
    }

    async fn list_domains(&self) -> anyhow::Result<Vec<String>> {
        let mut domains = self
            .nameservers
            .lock()
            .unwrap()
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        domains.sort();
        Ok(domains)
    }

    async fn account_id(&self) -> anyhow::Result<String> {
        Ok("111122223333".to_string())
    }

    async fn transfer_domain(&self, domain: &str, account_id: &str) -> anyhow::Result<Transfer> {
        Ok(Transfer {
            password: format!("{domain}-{account_id}-secret"),
            operation_id: "op-transfer-1".to_string(),
        })
    }

    async fn cancel_transfer(&self, _domain: &str) -> anyhow::Result<String> {
        Ok("op-cancel-1".to_string())
    }

    async fn accept_transfer(&self, _domain: &str, _password: &str) -> anyhow::Result<String> {
        Ok("op-accept-1".to_string())
    }
}

/// `None` simulates a non-success response code.
pub struct FakeResolver(pub Option<Vec<String>>);

impl FakeResolver {
    pub fn answering(ns: &[&str]) -> Self {
        Self(Some(ns.iter().map(|s| s.to_string()).collect()))
    }

    pub fn failing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl NameserverLookup for FakeResolver {
    async fn lookup_ns(&self, domain: &str) -> ZoneResult<Vec<String>> {
        match &self.0 {
            Some(ns) => Ok(ns.clone()),
            None => Err(ZoneError::ns_not_found(domain)),
        }
    }
}

pub struct FakeConfirm {
    answer: bool,
    asked: Mutex<u32>,
}

impl FakeConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(0),
        }
    }

    pub fn times_asked(&self) -> u32 {
        *self.asked.lock().unwrap()
    }
}

#[async_trait]
impl Confirm for FakeConfirm {
    async fn confirm(&self, _prompt: &str) -> anyhow::Result<bool> {
        *self.asked.lock().unwrap() += 1;
        Ok(self.answer)
    }
}
