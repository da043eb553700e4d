use crate::domain::model::{EmailMessage, Lead, SendReceipt};
use crate::domain::ports::Mailer;
use crate::utils::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use html_escape::encode_quoted_attribute;
use std::sync::Arc;

const HEADLINE: &str = "Nuova richiesta dal sito";

/// Sends one operator notification per accepted lead through the injected
/// [`Mailer`].
#[derive(Clone)]
pub struct LeadNotifier {
    mailer: Arc<dyn Mailer>,
    from: String,
    to: String,
}

impl LeadNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            mailer,
            from: from.into(),
            to: to.into(),
        }
    }

    pub async fn notify(&self, lead: &Lead) -> Result<SendReceipt> {
        let message = compose_message(lead, &self.from, &self.to, Utc::now());
        tracing::debug!(subject = %message.subject, "Dispatching lead notification");

        let receipt = self.mailer.send(&message).await?;
        tracing::info!(
            id = receipt.id.as_deref().unwrap_or("-"),
            source = lead.source.as_deref().unwrap_or("-"),
            "📧 Lead notification sent"
        );
        Ok(receipt)
    }
}

fn labelled_fields(lead: &Lead) -> Vec<(&'static str, &str)> {
    let mut fields = vec![
        ("Nome", lead.nome.as_str()),
        ("Cognome", lead.cognome.as_str()),
        ("Email", lead.email.as_str()),
        ("Telefono", lead.telefono.as_str()),
        ("Messaggio", lead.messaggio.as_deref().unwrap_or("-")),
    ];

    let extras = [
        ("Città", &lead.citta),
        ("Immobile", &lead.immobile),
        ("Mensilità non pagate", &lead.mensilita),
        ("Fonte", &lead.source),
        ("Pagina", &lead.page),
        ("Lingua", &lead.lang),
    ];
    fields.extend(
        extras
            .into_iter()
            .filter_map(|(label, value)| value.as_deref().map(|v| (label, v))),
    );

    fields
        .into_iter()
        .map(|(label, value)| (label, if value.is_empty() { "-" } else { value }))
        .collect()
}

/// Builds the operator email. Replies go straight to the lead.
pub fn compose_message(lead: &Lead, from: &str, to: &str, received_at: DateTime<Utc>) -> EmailMessage {
    let fields = labelled_fields(lead);
    let received = received_at.to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut text = vec![format!("{}:", HEADLINE), String::new()];
    text.extend(fields.iter().map(|(label, value)| format!("{}: {}", label, value)));
    text.push(format!("Ricevuta: {}", received));

    let rows: String = fields
        .iter()
        .map(|(label, value)| {
            let value = encode_quoted_attribute(value).replace('\n', "<br/>");
            format!("<p><b>{}:</b> {}</p>", encode_quoted_attribute(label), value)
        })
        .collect();
    let html = format!(
        "<div style=\"font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial; line-height:1.5\">\
         <h2>{}</h2>{}<p style=\"color:#888\">Ricevuta: {}</p></div>",
        HEADLINE, rows, received
    );

    EmailMessage {
        from: from.to_string(),
        to: vec![to.to_string()],
        subject: format!("Nuova richiesta - {}", lead.full_name()),
        text: text.join("\n"),
        html,
        reply_to: lead.email.clone(),
    }
}
