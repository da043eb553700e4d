pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::{router, AppState, LeadResponse};
pub use adapters::resend::ResendMailer;
pub use app::{build_intake, build_state};
pub use config::AppConfig;
pub use crate::core::{intake::LeadIntake, notify::LeadNotifier};
pub use utils::error::{LeadError, Result};
