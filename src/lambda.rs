#[cfg(feature = "lambda")]
use lambda_http::{run, Error};
#[cfg(feature = "lambda")]
use lead_intake::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use lead_intake::{build_state, router, AppConfig};

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    tracing::info!("Starting lead-intake Lambda function");

    // 冷啟動時載入一次
    let config = AppConfig::from_env()?;
    config.validate()?;

    let state = build_state(&config)?;

    run(router(state)).await
}
