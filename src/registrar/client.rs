use crate::registrar::RegistrarApi;
use crate::registrar::types::Transfer;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use std::future::Future;
use aws_sdk_route53domains::{Client, types::Nameserver};

#[derive(Clone)]
pub struct RegistrarClient {
    domains: Client,
    sts: aws_sdk_sts::Client,
    profile: String, // only used in error context
}

impl RegistrarClient {
    pub fn new(config: &aws_config::SdkConfig, profile: impl Into<String>) -> Self {
        Self {
            domains: Client::new(config),
            sts: aws_sdk_sts::Client::new(config),
            profile: profile.into(),
        }
    }
}

/// Call `fetch` with the previous page's marker until no marker (or an empty
/// one) comes back, collecting every page in order.
async fn drain_marker_pages<F, Fut>(mut fetch: F) -> anyhow::Result<Vec<String>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = anyhow::Result<(Vec<String>, Option<String>)>>,
{
    let mut items = Vec::new();
    let mut marker = None;
    loop {
        let (page, next) = fetch(marker.take()).await?;
        items.extend(page);
        match next {
            Some(next) if !next.is_empty() => marker = Some(next),
            _ => break,
        }
    }
    Ok(items)
}

#[async_trait]
impl RegistrarApi for RegistrarClient {
    async fn get_nameservers(&self, domain: &str) -> anyhow::Result<Vec<String>> {
        let res = self
            .domains
            .get_domain_detail()
            .domain_name(domain)
            .send()
            .await
            .with_context(|| {
                format!("[{}] Route53Domains get_domain_detail failed", self.profile)
            })?;
        Ok(res
            .nameservers()
            .iter()
            .map(|ns| ns.name().to_string())
            .collect())
    }

    async fn update_nameservers(
        &self,
        domain: &str,
        nameservers: &[String],
    ) -> anyhow::Result<String> {
        let nameservers = nameservers
            .iter()
            .map(|name| Nameserver::builder().name(name).build())
            .collect::<Result<Vec<_>, _>>()
            .context("invalid nameserver")?;
        let res = self
            .domains
            .update_domain_nameservers()
            .domain_name(domain)
            .set_nameservers(Some(nameservers))
            .send()
            .await
            .with_context(|| {
                format!("[{}] Route53Domains update_domain_nameservers failed", self.profile)
            })?;
        Ok(res.operation_id().unwrap_or_default().to_string())
    }

    async fn list_domains(&self) -> anyhow::Result<Vec<String>> {
        drain_marker_pages(|marker| async move {
            let page = self
                .domains
                .list_domains()
                .set_marker(marker)
                .send()
                .await
                .with_context(|| {
                    format!("[{}] Route53Domains list_domains failed", self.profile)
                })?;
            let names = page
                .domains()
                .iter()
                .filter_map(|d| d.domain_name().map(str::to_string))
                .collect();
            Ok((names, page.next_page_marker().map(str::to_string)))
        })
        .await
    }

    async fn account_id(&self) -> anyhow::Result<String> {
        let res = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .with_context(|| format!("[{}] STS get_caller_identity failed", self.profile))?;
        res.account()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("STS returned no account for profile {}", self.profile))
    }

    async fn transfer_domain(&self, domain: &str, account_id: &str) -> anyhow::Result<Transfer> {
        let res = self
            .domains
            .transfer_domain_to_another_aws_account()
            .domain_name(domain)
            .account_id(account_id)
            .send()
            .await
            .with_context(|| {
                format!("[{}] Route53Domains transfer_domain failed", self.profile)
            })?;
        Ok(Transfer {
            password: res.password().unwrap_or_default().to_string(),
            operation_id: res.operation_id().unwrap_or_default().to_string(),
        })
    }

    async fn cancel_transfer(&self, domain: &str) -> anyhow::Result<String> {
        let res = self
            .domains
            .cancel_domain_transfer_to_another_aws_account()
            .domain_name(domain)
            .send()
            .await
            .with_context(|| {
                format!("[{}] Route53Domains cancel_transfer failed", self.profile)
            })?;
        Ok(res.operation_id().unwrap_or_default().to_string())
    }

    async fn accept_transfer(&self, domain: &str, password: &str) -> anyhow::Result<String> {
        let res = self
            .domains
            .accept_domain_transfer_from_another_aws_account()
            .domain_name(domain)
            .password(password)
            .send()
            .await
            .with_context(|| {
                format!("[{}] Route53Domains accept_transfer failed", self.profile)
            })?;
        Ok(res.operation_id().unwrap_or_default().to_string())
    }
}
