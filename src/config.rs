//! Configuration file support for eol-sync.
//!
//! Provides YAML-based configuration through `eol-sync.config.yml` files,
//! including data structures, file loading, validation, and merging with
//! command-line and environment overrides.

use anyhow::Context;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapters::outbound::network::{CatalogClientConfig, Credentials};
use crate::application::dto::{OutputFormat, SyncRequest};
use crate::eol_tracking::domain::SyncTarget;
use crate::eol_tracking::policies::MissingRelationPolicy;
use crate::shared::error::SyncError;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "eol-sync.config.yml";

const AUTH_PATH: &str = "/v1/auth/access_token";
const MAX_RETRIES_LIMIT: u32 = 10;

/// Top-level configuration file schema.
///
/// Credentials are deliberately absent: they come from the command line or
/// the environment only.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub auth_url: Option<String>,
    pub format: Option<String>,
    pub missing_relation: Option<String>,
    pub skip_unchanged: Option<bool>,
    pub concurrency: Option<usize>,
    pub max_retries: Option<u32>,
    pub retry_base_delay_ms: Option<u64>,
    pub targets: Option<Vec<TargetConfig>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// One framework/service pairing; omitted fields take the default contract.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TargetConfig {
    pub name: Option<String>,
    pub framework_blueprint: Option<String>,
    pub service_blueprint: Option<String>,
    pub relation: Option<String>,
    pub property: Option<String>,
}

impl TargetConfig {
    fn to_sync_target(&self) -> Result<SyncTarget> {
        let pick = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_string())
        };

        SyncTarget::new(
            pick(&self.name, SyncTarget::DEFAULT_NAME),
            pick(&self.framework_blueprint, SyncTarget::DEFAULT_FRAMEWORK_BLUEPRINT),
            pick(&self.service_blueprint, SyncTarget::DEFAULT_SERVICE_BLUEPRINT),
            pick(&self.relation, SyncTarget::DEFAULT_RELATION),
            pick(&self.property, SyncTarget::DEFAULT_PROPERTY),
        )
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(concurrency) = config.concurrency {
        validate_concurrency(concurrency)?;
    }

    if let Some(max_retries) = config.max_retries {
        if max_retries > MAX_RETRIES_LIMIT {
            return Err(SyncError::config(
                format!("max_retries must be at most {}", MAX_RETRIES_LIMIT),
                format!("Got {}", max_retries),
            )
            .into());
        }
    }

    if let Some(ref policy) = config.missing_relation {
        policy
            .parse::<MissingRelationPolicy>()
            .map_err(|e| SyncError::config(e, "Use 'count-as-zero' or 'skip'"))?;
    }

    if let Some(ref format) = config.format {
        format
            .parse::<OutputFormat>()
            .map_err(|e| SyncError::config(e, "Use 'text' or 'json'"))?;
    }

    if let Some(ref targets) = config.targets {
        if targets.is_empty() {
            return Err(SyncError::config(
                "targets must not be empty",
                "Remove the 'targets' key to use the default framework/service contract",
            )
            .into());
        }
        build_targets(targets)?;
    }

    Ok(())
}

fn validate_concurrency(concurrency: usize) -> Result<()> {
    if concurrency == 0 || concurrency > SyncRequest::MAX_CONCURRENCY {
        return Err(SyncError::config(
            format!(
                "concurrency must be between 1 and {}",
                SyncRequest::MAX_CONCURRENCY
            ),
            format!("Got {}", concurrency),
        )
        .into());
    }
    Ok(())
}

/// Builds sync targets, rejecting invalid fields and duplicate names.
fn build_targets(targets: &[TargetConfig]) -> Result<Vec<SyncTarget>> {
    let mut names = HashSet::new();
    let mut built = Vec::with_capacity(targets.len());

    for (i, target) in targets.iter().enumerate() {
        let sync_target = target.to_sync_target().map_err(|e| {
            SyncError::config(
                format!("targets[{}]: {}", i, e),
                "Each target needs non-empty blueprint, relation and property names",
            )
        })?;

        if !names.insert(sync_target.name().to_string()) {
            return Err(SyncError::config(
                format!("targets[{}]: duplicate target name '{}'", i, sync_target.name()),
                "Give every target a unique 'name'",
            )
            .into());
        }
        built.push(sync_target);
    }

    Ok(built)
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

/// Values given on the command line or through the environment.
///
/// Every field set here wins over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub auth_url: Option<String>,
    pub format: Option<OutputFormat>,
    pub missing_relation: Option<MissingRelationPolicy>,
    pub concurrency: Option<usize>,
    pub max_retries: Option<u32>,
    pub dry_run: bool,
    pub skip_unchanged: bool,
    pub output: Option<PathBuf>,
}

/// Everything a run needs, resolved once before any request is sent.
#[derive(Debug)]
pub struct RunSettings {
    pub request: SyncRequest,
    pub client: CatalogClientConfig,
    pub credentials: Credentials,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

impl RunSettings {
    /// Merges overrides, config file and defaults, in that order of precedence.
    pub fn resolve(overrides: Overrides, file: Option<ConfigFile>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let base_url = non_empty(overrides.base_url)
            .or(non_empty(file.base_url))
            .unwrap_or_else(|| CatalogClientConfig::DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        let auth_url = non_empty(overrides.auth_url)
            .or(non_empty(file.auth_url))
            .unwrap_or_else(|| format!("{}{}", base_url, AUTH_PATH));

        let credentials = resolve_credentials(
            non_empty(overrides.token),
            non_empty(overrides.client_id),
            non_empty(overrides.client_secret),
            auth_url,
        )?;

        let format = match overrides.format {
            Some(format) => format,
            None => match file.format {
                Some(ref format) => format
                    .parse()
                    .map_err(|e: String| SyncError::config(e, "Use 'text' or 'json'"))?,
                None => OutputFormat::default(),
            },
        };

        let missing_relation_policy = match overrides.missing_relation {
            Some(policy) => policy,
            None => match file.missing_relation {
                Some(ref policy) => policy
                    .parse()
                    .map_err(|e: String| SyncError::config(e, "Use 'count-as-zero' or 'skip'"))?,
                None => MissingRelationPolicy::default(),
            },
        };

        let concurrency = overrides
            .concurrency
            .or(file.concurrency)
            .unwrap_or(SyncRequest::DEFAULT_CONCURRENCY);
        validate_concurrency(concurrency)?;

        let targets = match file.targets {
            Some(ref targets) => build_targets(targets)?,
            None => vec![SyncTarget::default()],
        };

        let request = SyncRequest {
            targets,
            missing_relation_policy,
            dry_run: overrides.dry_run,
            skip_unchanged: overrides.skip_unchanged || file.skip_unchanged.unwrap_or(false),
            concurrency,
        };

        let defaults = CatalogClientConfig::default();
        let client = CatalogClientConfig {
            base_url,
            max_retries: overrides
                .max_retries
                .or(file.max_retries)
                .unwrap_or(defaults.max_retries),
            retry_base_delay: file
                .retry_base_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_base_delay),
            timeout: defaults.timeout,
        };

        Ok(Self {
            request,
            client,
            credentials,
            format,
            output: overrides.output,
        })
    }
}

/// A static token wins over client credentials.
fn resolve_credentials(
    token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    auth_url: String,
) -> Result<Credentials> {
    if let Some(token) = token {
        return Ok(Credentials::StaticToken(token));
    }

    match (client_id, client_secret) {
        (Some(client_id), Some(client_secret)) => Ok(Credentials::ClientCredentials {
            client_id,
            client_secret,
            auth_url,
        }),
        (Some(_), None) | (None, Some(_)) => Err(SyncError::config(
            "incomplete client credentials",
            "Set both PORT_CLIENT_ID and PORT_CLIENT_SECRET, or PORT_TOKEN",
        )
        .into()),
        (None, None) => Err(SyncError::config(
            "no catalog credentials provided",
            "Set PORT_TOKEN, or PORT_CLIENT_ID and PORT_CLIENT_SECRET (a .env file works too)",
        )
        .into()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
