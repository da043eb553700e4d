// Application wiring: turns an AppConfig into a ready-to-serve state.

use crate::adapters::http::AppState;
use crate::adapters::resend::ResendMailer;
use crate::config::AppConfig;
use crate::core::intake::LeadIntake;
use crate::core::notify::LeadNotifier;
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;

pub fn build_intake(config: &AppConfig) -> Result<LeadIntake> {
    let notifier = match &config.mail {
        Some(mail) => {
            let mailer = ResendMailer::new(
                mail.api_key.clone(),
                mail.api_base_url.clone(),
                Duration::from_secs(mail.timeout_seconds),
            )?;
            tracing::info!("📧 Mail delivery configured, leads will be forwarded");
            Some(LeadNotifier::new(Arc::new(mailer), mail.from.clone(), mail.to.clone()))
        }
        None => None,
    };

    Ok(LeadIntake::new(config.validation, config.delivery, notifier))
}

pub fn build_state(config: &AppConfig) -> Result<Arc<AppState>> {
    Ok(Arc::new(AppState::new(build_intake(config)?)))
}
