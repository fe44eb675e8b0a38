pub mod credentials;
pub mod storage;
pub mod toml_config;

pub use toml_config::ProxyConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "truckstop-proxy")]
#[command(about = "JSON to SOAP proxy for the TruckStop load search API")]
pub struct ServeArgs {
    /// Path to TOML configuration file
    #[arg(short, long, env = "TRUCKSTOP_PROXY_CONFIG")]
    pub config: Option<String>,

    /// Override server.bind_address
    #[arg(long)]
    pub bind: Option<String>,

    /// Override truckstop.api_url
    #[arg(long, env = "TRUCKSTOP_API_URL")]
    pub api_url: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ServeArgs {
    /// File (or defaults) with command-line overrides applied on top.
    pub fn load_config(&self) -> Result<ProxyConfig> {
        let mut config = match &self.config {
            Some(path) => ProxyConfig::from_file(path)?,
            None => ProxyConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(api_url) = &self.api_url {
            config.truckstop.api_url = api_url.clone();
        }
        if self.json_logs {
            config.logging.format = toml_config::LogFormat::Json;
        }
        if self.verbose {
            config.logging.verbose = true;
        }

        Ok(config)
    }
}
