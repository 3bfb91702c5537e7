use clap::Parser;
use serde::Deserialize;

use crate::error::Result;
use crate::session::default_session_path;
use crate::transport::TransportKind;

const DEFAULT_CONFIG_PATH: &str = "config/finpro.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote procedure endpoint the envelopes are sent to.
    pub base_url: String,
    pub transport: TransportKind,
    /// Where the session survives reloads.
    pub session_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/exec".to_string(),
            transport: TransportKind::Direct,
            session_path: default_session_path().to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "finpro_client", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the endpoint URL.
    #[arg(long)]
    base_url: Option<String>,
    /// Override the transport strategy (direct | callback).
    #[arg(long)]
    transport: Option<TransportKind>,
    /// Override the session state file path.
    #[arg(long)]
    session_path: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("FINPRO"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(transport) = args.transport {
        settings.transport = transport;
    }
    if let Some(session_path) = args.session_path {
        settings.session_path = session_path;
    }

    Ok(settings)
}
