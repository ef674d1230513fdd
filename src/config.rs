//! Settings for building AWS SDK clients.
//!
//! Credentials always come from the SDK's default provider chain. These settings
//! only choose where the clients point: an optional Region, a named profile from
//! the shared config files, and an optional endpoint override for local testing.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::env;

/// Profile used by the custom labels examples.
pub const CUSTOM_LABELS_PROFILE: &str = "custom-labels-access";
/// Profile used by the Lookout for Vision examples.
pub const LOOKOUT_VISION_PROFILE: &str = "lookoutvision-access";

/// Where the SDK clients should send requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    /// AWS Region, e.g. `us-east-1`. Falls back to the SDK's region chain.
    pub region: Option<String>,
    /// Named profile from `~/.aws/config`.
    pub profile: Option<String>,
    /// Custom endpoint, e.g. a mock server or VPC endpoint.
    pub endpoint_url: Option<String>,
}

impl AwsSettings {
    /// Reads `CLOUDAI_REGION`, `CLOUDAI_PROFILE` and `CLOUDAI_ENDPOINT_URL`.
    ///
    /// Unset or empty variables leave the corresponding setting to the SDK defaults.
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            region: var("CLOUDAI_REGION"),
            profile: var("CLOUDAI_PROFILE"),
            endpoint_url: var("CLOUDAI_ENDPOINT_URL"),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Fills unset fields from `other`, keeping the values already present.
    pub fn or(self, other: AwsSettings) -> Self {
        Self {
            region: self.region.or(other.region),
            profile: self.profile.or(other.profile),
            endpoint_url: self.endpoint_url.or(other.endpoint_url),
        }
    }

    /// Loads the shared SDK configuration used to build every service client.
    pub async fn load(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let config = loader.load().await;
        tracing::debug!(
            region = ?config.region(),
            profile = ?self.profile,
            "loaded AWS SDK configuration"
        );
        config
    }
}
