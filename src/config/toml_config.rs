use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ProxyError, Result};
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.truckstop.com/v13/Searching/LoadSearch.svc";
pub const DEFAULT_SOAP_ACTION: &str =
    "http://webservices.truckstop.com/v12/ILoadSearch/GetMultipleLoadDetailResults";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5244";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub truckstop: TruckStopConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub allowed_origins: Vec<String>,
    pub openapi: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            openapi: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TruckStopConfig {
    pub api_url: String,
    pub soap_action: String,
    pub timeout_seconds: u64,
}

impl Default for TruckStopConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            soap_action: DEFAULT_SOAP_ACTION.to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub verbose: bool,
}

impl ProxyConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProxyError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ProxyError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TRUCKSTOP_API_URL})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("truckstop.api_url", &self.truckstop.api_url)?;

        if self.truckstop.soap_action.trim().is_empty() {
            return Err(ProxyError::MissingConfigError {
                field: "truckstop.soap_action".to_string(),
            });
        }

        validate_positive_number("truckstop.timeout_seconds", self.truckstop.timeout_seconds, 1)?;

        self.bind_address()?;

        for origin in &self.server.allowed_origins {
            if origin != "*" {
                validate_url("server.allowed_origins", origin)?;
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.server
            .bind_address
            .parse()
            .map_err(|e| ProxyError::InvalidConfigValueError {
                field: "server.bind_address".to_string(),
                value: self.server.bind_address.clone(),
                reason: format!("{}", e),
            })
    }
}

impl ConfigProvider for ProxyConfig {
    fn api_url(&self) -> &str {
        &self.truckstop.api_url
    }

    fn soap_action(&self) -> &str {
        &self.truckstop.soap_action
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.truckstop.timeout_seconds)
    }
}

impl Validate for ProxyConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
