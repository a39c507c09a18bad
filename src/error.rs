use std::time::Duration;

use thiserror::Error;

use crate::validation::ValidationError;

/// Why a hosted-zone lookup missed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupMiss {
    /// The listing came back empty.
    Empty,
    /// The closest zone in the listing has a different name.
    NameMismatch { found: String },
}

/// Coarse classification used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Recoverable: create on demand or fall back to forced mode.
    NotFound,
    /// Lookup returned something that is not what was asked for.
    Validation,
    /// Propagation did not finish in time; the operator must re-run.
    Transient,
    /// Anything else. Aborts the workflow with no cleanup.
    Fatal,
}

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("hosted zone not found: {zone}")]
    HostedZoneNotFound { zone: String, miss: LookupMiss },

    #[error("failed to get nameservers for: {domain}")]
    NsRecordNotFound { domain: String },

    #[error("no NS records found in zone {zone_id}")]
    ZoneNsMissing { zone_id: String },

    #[error("change {change_id} not in sync after {waited:?}")]
    ChangeTimeout { change_id: String, waited: Duration },

    #[error("invalid domain: {0}")]
    InvalidDomain(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] anyhow::Error),
}

impl ZoneError {
    pub fn zone_not_found(zone: impl Into<String>, miss: LookupMiss) -> Self {
        ZoneError::HostedZoneNotFound {
            zone: zone.into(),
            miss,
        }
    }

    pub fn ns_not_found(domain: impl Into<String>) -> Self {
        ZoneError::NsRecordNotFound {
            domain: domain.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ZoneError::HostedZoneNotFound {
                miss: LookupMiss::NameMismatch { .. },
                ..
            } => ErrorKind::Validation,
            ZoneError::HostedZoneNotFound { .. } | ZoneError::NsRecordNotFound { .. } => {
                ErrorKind::NotFound
            }
            ZoneError::ChangeTimeout { .. } => ErrorKind::Transient,
            ZoneError::ZoneNsMissing { .. }
            | ZoneError::InvalidDomain(_)
            | ZoneError::Api(_) => ErrorKind::Fatal,
        }
    }

    /// Name mismatches are treated like an absent zone.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound | ErrorKind::Validation)
    }
}

pub type Result<T, E = ZoneError> = std::result::Result<T, E>;
