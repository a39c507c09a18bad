//! Crate entrypoint wiring together per-account Route53 clients, the zone
//! lifecycle manager, and the copy/delete workflows.

pub mod changeset;
pub mod config;
pub mod confirm;
pub mod error;
pub mod reconcile;
pub mod registrar;
pub mod resolver;
pub mod route53;
pub mod validation;
pub mod workflow;
pub mod zone;

use config::{AccountConfig, WaitConfig};
use registrar::{RegistrarApi, client::RegistrarClient};
use route53::client::Route53Client;
use zone::ZoneManager;

use std::sync::Arc;

/// Clients for one AWS account. Each account gets its own credentials; two
/// accounts never share a client.
pub struct Account {
    pub config: AccountConfig,
    pub zones: ZoneManager,
    pub registrar: Arc<dyn RegistrarApi>,
}

impl Account {
    pub async fn connect(config: AccountConfig, wait: WaitConfig) -> Self {
        let sdk = config.load_sdk_config().await;
        let route53 = Route53Client::new(&sdk, &config.profile);
        let registrar = RegistrarClient::new(&sdk, &config.profile);

        Self {
            zones: ZoneManager::new(Arc::new(route53), &config.profile, wait),
            registrar: Arc::new(registrar),
            config,
        }
    }
}
