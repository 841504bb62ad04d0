// src/infrastructure/aws.rs
use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::{debug, info};

/// Connection overrides; anything left unset falls back to the SDK's default chain
/// (environment, shared config files, instance metadata).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionSettings {
    pub profile: Option<String>,
    pub region: Option<String>,
    /// Point both clients at a local emulator, e.g. `http://localhost:4566`
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

pub async fn load_sdk_config(settings: &ConnectionSettings) -> SdkConfig {
    debug!(?settings, "Loading AWS configuration");
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(profile) = &settings.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = &settings.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &settings.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let config = loader.load().await;
    info!(region = ?config.region(), "AWS configuration loaded");
    config
}

pub fn dynamodb_client(config: &SdkConfig) -> aws_sdk_dynamodb::Client {
    aws_sdk_dynamodb::Client::new(config)
}

pub fn s3_client(config: &SdkConfig, settings: &ConnectionSettings) -> aws_sdk_s3::Client {
    let s3_config = aws_sdk_s3::config::Builder::from(config)
        .force_path_style(settings.force_path_style)
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
