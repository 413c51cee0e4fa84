use clap::Parser;
use std::path::PathBuf;

use eol_sync::application::dto::{OutputFormat, SyncRequest};
use eol_sync::config::Overrides;
use eol_sync::eol_tracking::policies::MissingRelationPolicy;

/// Sync end-of-life framework counts onto service entities in the Port catalog
#[derive(Parser, Debug)]
#[command(name = "eol-sync")]
#[command(version)]
#[command(
    about = "Sync end-of-life framework counts onto service entities in the Port catalog",
    long_about = None
)]
pub struct Args {
    /// Path to a YAML config file (defaults to ./eol-sync.config.yml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Catalog API base URL
    #[arg(long, env = "PORT_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Static bearer token (takes precedence over client credentials)
    #[arg(long, env = "PORT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// OAuth client id for the client-credentials exchange
    #[arg(long, env = "PORT_CLIENT_ID", value_name = "ID")]
    pub client_id: Option<String>,

    /// OAuth client secret for the client-credentials exchange
    #[arg(
        long,
        env = "PORT_CLIENT_SECRET",
        hide_env_values = true,
        value_name = "SECRET"
    )]
    pub client_secret: Option<String>,

    /// Token endpoint (defaults to <BASE_URL>/v1/auth/access_token)
    #[arg(long, env = "PORT_AUTH_URL", value_name = "URL")]
    pub auth_url: Option<String>,

    /// What to do with services lacking the framework relation: count-as-zero or skip
    #[arg(long, value_name = "POLICY")]
    pub missing_relation: Option<MissingRelationPolicy>,

    /// Maximum concurrent updates per target (1-16)
    #[arg(long, value_name = "N", value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    /// Retries for transient catalog failures (429, 5xx, timeouts)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(0..=10))]
    pub max_retries: Option<u32>,

    /// Compute counts without sending any update
    #[arg(long)]
    pub dry_run: bool,

    /// Do not send an update when the stored count already matches
    #[arg(long)]
    pub skip_unchanged: bool,

    /// Report format: text or json
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Splits off the config path; everything else overrides the config file
    pub fn into_overrides(self) -> (Option<PathBuf>, Overrides) {
        let overrides = Overrides {
            base_url: self.base_url,
            token: self.token,
            client_id: self.client_id,
            client_secret: self.client_secret,
            auth_url: self.auth_url,
            format: self.format,
            missing_relation: self.missing_relation,
            concurrency: self.concurrency,
            max_retries: self.max_retries,
            dry_run: self.dry_run,
            skip_unchanged: self.skip_unchanged,
            output: self.output,
        };
        (self.config, overrides)
    }
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a positive number", s))?;
    if value == 0 || value > SyncRequest::MAX_CONCURRENCY {
        return Err(format!(
            "concurrency must be between 1 and {}",
            SyncRequest::MAX_CONCURRENCY
        ));
    }
    Ok(value)
}
