use crate::domain::model::Lead;
use crate::utils::validation::is_email_address;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Hidden form fields that real visitors never fill.
pub const HONEYPOT_FIELDS: [&str; 2] = ["company", "website"];

/// Which fields must be present for a lead to be accepted. `nome` and a
/// well-formed `email` are always required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    pub require_surname: bool,
    pub require_phone: bool,
    pub require_message: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            require_surname: true,
            require_phone: true,
            require_message: false,
        }
    }
}

/// Returns the trimmed string under the first key that holds one. Non-string
/// values count as empty.
fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn optional_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    Some(text_field(obj, keys)).filter(|s| !s.is_empty())
}

// 報價頁以數字送出月數
fn months_field(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("mensilita") {
        Some(Value::Number(n)) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => optional_field(obj, &["mensilita"]),
    }
}

/// True when any honeypot field carries a non-blank string.
pub fn is_honeypot_triggered(input: &Value) -> bool {
    input
        .as_object()
        .map(|obj| {
            HONEYPOT_FIELDS.iter().any(|key| {
                obj.get(*key)
                    .and_then(Value::as_str)
                    .is_some_and(|s| !s.trim().is_empty())
            })
        })
        .unwrap_or(false)
}

/// Coerces, trims and checks a submitted form. Every violated rule
/// contributes one message to the error list.
pub fn validate_lead(input: &Value, policy: &ValidationPolicy) -> Result<Lead, Vec<String>> {
    let Some(obj) = input.as_object() else {
        return Err(vec!["Payload non valido".to_string()]);
    };

    let lead = Lead {
        nome: text_field(obj, &["nome", "name"]),
        cognome: text_field(obj, &["cognome", "surname"]),
        email: text_field(obj, &["email"]),
        telefono: text_field(obj, &["telefono", "phone"]),
        messaggio: optional_field(obj, &["messaggio", "message"]),
        citta: optional_field(obj, &["citta", "city"]),
        immobile: optional_field(obj, &["immobile", "property"]),
        mensilita: months_field(obj),
        source: optional_field(obj, &["source"]),
        page: optional_field(obj, &["page"]),
        lang: optional_field(obj, &["lang"]),
    };

    let mut errors = Vec::new();

    if lead.nome.is_empty() {
        errors.push("Nome obbligatorio".to_string());
    }
    if policy.require_surname && lead.cognome.is_empty() {
        errors.push("Cognome obbligatorio".to_string());
    }
    if lead.email.is_empty() {
        errors.push("Email obbligatoria".to_string());
    } else if !is_email_address(&lead.email) {
        errors.push("Email non valida".to_string());
    }
    if policy.require_phone && lead.telefono.is_empty() {
        errors.push("Telefono obbligatorio".to_string());
    }
    if policy.require_message && lead.messaggio.is_none() {
        errors.push("Messaggio obbligatorio".to_string());
    }

    if errors.is_empty() {
        Ok(lead)
    } else {
        Err(errors)
    }
}
