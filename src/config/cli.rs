use crate::config::toml_config::TomlConfig;
use crate::config::AppConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "lead-intake")]
#[command(about = "Contact form intake service forwarding leads by email")]
pub struct CliConfig {
    /// Path to a TOML configuration file; the environment is used when omitted
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the listen address (e.g. 127.0.0.1:3000)
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?.into_app_config()
            }
            None => AppConfig::from_env()?,
        };

        if let Some(bind) = &self.bind {
            tracing::info!("🔧 Bind address overridden to: {}", bind);
            config.server.bind_addr = bind.clone();
        }

        Ok(config)
    }
}
