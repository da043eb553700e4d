use clap::Parser;
use lead_intake::adapters::http;
use lead_intake::utils::error::{ErrorSeverity, LeadError};
use lead_intake::utils::{logger, validation::Validate};
use lead_intake::{build_state, CliConfig};

fn exit_with(e: &LeadError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

    let exit_code = match e.severity() {
        ErrorSeverity::Critical => 3,
        _ => 1,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting lead-intake server");

    // 載入並驗證配置
    let config = match cli.load_app_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let state = match build_state(&config) {
        Ok(state) => state,
        Err(e) => exit_with(&e),
    };

    // validate() 已確認可解析
    let addr: std::net::SocketAddr = config.server.bind_addr.parse()?;
    http::serve(addr, state).await
}
