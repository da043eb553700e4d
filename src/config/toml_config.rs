use crate::adapters::resend::DEFAULT_API_BASE_URL;
use crate::config::{AppConfig, MailSettings, ServerSettings, DEFAULT_TIMEOUT_SECONDS};
use crate::core::intake::DeliveryPolicy;
use crate::core::lead::ValidationPolicy;
use crate::utils::error::{LeadError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub mail: Option<MailConfig>,
    pub validation: ValidationPolicy,
    pub delivery: DeliveryPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub to: Option<String>,
    pub from: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Blank values and values whose `${VAR}` placeholder could not be resolved
/// count as unset.
fn resolved(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.contains("${"))
        .map(str::to_string)
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LeadError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，`${VAR}` 以環境變數替換
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |key| std::env::var(key).ok())
    }

    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_env_vars(content, lookup)?;

        toml::from_str(&processed_content).map_err(|e| LeadError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換 ${VAR_NAME}，找不到的變數保持原樣
    fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LeadError::ConfigError {
            message: format!("placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn into_app_config(self) -> AppConfig {
        let mail = self.mail.and_then(|mail| {
            match (resolved(&mail.api_key), resolved(&mail.to), resolved(&mail.from)) {
                (Some(api_key), Some(to), Some(from)) => Some(MailSettings {
                    api_key,
                    to,
                    from,
                    api_base_url: resolved(&mail.api_base_url)
                        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
                    timeout_seconds: mail.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
                }),
                _ => None,
            }
        });

        AppConfig {
            server: ServerSettings {
                bind_addr: resolved(&self.server.bind_addr)
                    .unwrap_or_else(|| ServerSettings::default().bind_addr),
            },
            mail,
            validation: self.validation,
            delivery: self.delivery,
        }
    }
}
