//! Route53Domains registrar operations for one account.
pub mod client;
pub mod types;

use async_trait::async_trait;

use types::Transfer;

#[async_trait]
pub trait RegistrarApi: Send + Sync {
    /// Nameserver host names configured at the registrar, as reported.
    async fn get_nameservers(&self, domain: &str) -> anyhow::Result<Vec<String>>;

    /// Replace the registrar's nameservers; returns the operation id.
    async fn update_nameservers(
        &self,
        domain: &str,
        nameservers: &[String],
    ) -> anyhow::Result<String>;

    async fn list_domains(&self) -> anyhow::Result<Vec<String>>;

    async fn account_id(&self) -> anyhow::Result<String>;

    async fn transfer_domain(&self, domain: &str, account_id: &str) -> anyhow::Result<Transfer>;

    async fn cancel_transfer(&self, domain: &str) -> anyhow::Result<String>;

    async fn accept_transfer(&self, domain: &str, password: &str) -> anyhow::Result<String>;
}
