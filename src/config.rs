use std::time::Duration;

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Route53 is global and Route53Domains only lives here.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Credentials scope for one side of a copy: a shared-config profile plus the
/// region its clients talk to.
#[derive(Clone, Debug)]
pub struct AccountConfig {
    pub profile: String,
    pub region: String,
}

impl AccountConfig {
    pub fn new(profile: impl Into<String>, region: Option<String>) -> Self {
        Self {
            profile: profile.into(),
            region: region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
        }
    }

    /// Resolve credentials for this profile. The region is set on the loaded
    /// config only; the process environment is left alone.
    pub async fn load_sdk_config(&self) -> SdkConfig {
        aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&self.profile)
            .region(Region::new(self.region.clone()))
            .load()
            .await
    }
}

/// Bounds for the change-propagation waiter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitConfig {
    /// Delay between `GetChange` polls.
    pub poll_interval: Duration,
    /// Budget for a freshly created zone to become visible.
    pub zone_create_timeout: Duration,
    /// Budget for record batches and zone deletion.
    pub change_timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(15),
            zone_create_timeout: Duration::from_secs(60),
            change_timeout: Duration::from_secs(120),
        }
    }
}
