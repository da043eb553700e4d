use serde::{Deserialize, Serialize};

/// A contact submission that passed validation. Optional fields are `None`
/// when the visitor left them blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub nome: String,
    pub cognome: String,
    pub email: String,
    pub telefono: String,
    pub messaggio: Option<String>,
    pub citta: Option<String>,
    pub immobile: Option<String>,
    pub mensilita: Option<String>,
    pub source: Option<String>,
    pub page: Option<String>,
    pub lang: Option<String>,
}

impl Lead {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nome, self.cognome).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
    pub reply_to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub id: Option<String>,
}

/// How a submission that did not fail was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    Delivered(SendReceipt),
    /// Mail is not configured and delivery is best-effort.
    Skipped,
    /// Honeypot filled in; answered as a success without sending.
    Discarded,
}

impl IntakeOutcome {
    pub fn receipt_id(&self) -> Option<&str> {
        match self {
            IntakeOutcome::Delivered(receipt) => receipt.id.as_deref(),
            _ => None,
        }
    }
}
