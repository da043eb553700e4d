pub mod intake;
pub mod lead;
pub mod notify;
pub mod quote;

pub use crate::domain::model::{EmailMessage, IntakeOutcome, Lead, SendReceipt};
pub use crate::domain::ports::Mailer;
pub use crate::utils::error::Result;
