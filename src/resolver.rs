//! Live NS lookups through the host's recursive resolver.
use anyhow::Context;
use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use tracing::debug;

use crate::error::{Result, ZoneError};
use crate::validation::{denormalize, normalize};

#[async_trait]
pub trait NameserverLookup: Send + Sync {
    /// NS answers for `domain` as the resolver returned them. A non-success
    /// response code maps to `ZoneError::NsRecordNotFound`.
    async fn lookup_ns(&self, domain: &str) -> Result<Vec<String>>;
}

/// Resolver configured from `/etc/resolv.conf` (or the platform equivalent).
/// Queries go out with recursion desired.
pub struct SystemResolver {
    inner: TokioAsyncResolver,
}

impl SystemResolver {
    pub fn from_system_conf() -> anyhow::Result<Self> {
        let inner = TokioAsyncResolver::tokio_from_system_conf()
            .context("failed to load system resolver configuration")?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl NameserverLookup for SystemResolver {
    async fn lookup_ns(&self, domain: &str) -> Result<Vec<String>> {
        match self.inner.ns_lookup(normalize(domain).as_str()).await {
            Ok(lookup) => Ok(lookup.iter().map(|ns| ns.0.to_string()).collect()),
            Err(err) => classify_failure(err, domain),
        }
    }
}

/// A NOERROR answer without NS records is an empty set. Any other response
/// code (NXDOMAIN, SERVFAIL, REFUSED, ...) is `NsRecordNotFound`. Transport
/// failures stay fatal.
fn classify_failure(err: ResolveError, domain: &str) -> Result<Vec<String>> {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if *response_code == ResponseCode::NoError =>
        {
            Ok(Vec::new())
        }
        ResolveErrorKind::NoRecordsFound { .. } => Err(ZoneError::ns_not_found(domain)),
        _ => Err(ZoneError::Api(
            anyhow::Error::new(err).context(format!("NS lookup for {domain} failed")),
        )),
    }
}

/// Authoritative nameservers for `domain`, denormalized.
pub async fn resolve_authoritative(
    resolver: &dyn NameserverLookup,
    domain: &str,
) -> Result<Vec<String>> {
    let answers = resolver.lookup_ns(domain).await?;
    let servers = answers
        .iter()
        .map(|ns| denormalize(ns).to_string())
        .collect::<Vec<_>>();
    for server in &servers {
        debug!(domain, server = %server, "found nameserver");
    }
    Ok(servers)
}
