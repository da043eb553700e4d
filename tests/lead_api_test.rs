use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use lead_intake::core::intake::{DeliveryPolicy, LeadIntake};
use lead_intake::core::lead::ValidationPolicy;
use lead_intake::core::{EmailMessage, Mailer, SendReceipt};
use lead_intake::utils::error::{LeadError, Result};
use lead_intake::{router, AppState, LeadNotifier, LeadResponse};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// 記錄所有送出的郵件
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail_with: Option<(u16, String)>,
}

impl RecordingMailer {
    fn failing(status: u16, message: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some((status, message.to_string())),
        }
    }

    fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt> {
        self.sent.lock().unwrap().push(message.clone());
        match &self.fail_with {
            Some((status, message)) => Err(LeadError::ProviderRejected {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(SendReceipt { id: None }),
        }
    }
}

fn app_with(mailer: Option<Arc<RecordingMailer>>, delivery: DeliveryPolicy) -> axum::Router {
    let notifier = mailer.map(|m| {
        LeadNotifier::new(m, "Sfratto Morosi <noreply@sfrattomorosi.it>", "avvocato@sfrattomorosi.it")
    });
    let intake = LeadIntake::new(ValidationPolicy::default(), delivery, notifier);
    router(Arc::new(AppState::new(intake)))
}

async fn post_json(app: axum::Router, uri: &str, body: impl Into<Body>) -> (StatusCode, LeadResponse) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn mario() -> Value {
    json!({
        "nome": "Mario",
        "cognome": "Rossi",
        "email": "mario@example.com",
        "telefono": "3331234567",
        "messaggio": "Ho 3 mensilità non pagate"
    })
}

#[tokio::test]
async fn test_valid_lead_sends_one_email() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = app_with(Some(mailer.clone()), DeliveryPolicy::default());

    let (status, body) = post_json(app, "/api/lead", mario().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, LeadResponse::success(None));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].reply_to, "mario@example.com");
    assert_eq!(sent[0].to, vec!["avvocato@sfrattomorosi.it"]);
    assert_eq!(sent[0].subject, "Nuova richiesta - Mario Rossi");
    assert!(sent[0].text.contains("Messaggio: Ho 3 mensilità non pagate"));
}

#[tokio::test]
async fn test_contatti_route_is_an_alias() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = app_with(Some(mailer.clone()), DeliveryPolicy::default());

    let (status, body) = post_json(app, "/api/contatti", mario().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.ok);
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_invalid_lead_lists_errors_and_sends_nothing() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = app_with(Some(mailer.clone()), DeliveryPolicy::default());

    let (status, body) = post_json(
        app,
        "/api/lead",
        json!({"nome": "", "email": "not-an-email"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.ok);
    let errors = body.errors.unwrap();
    assert!(errors.contains(&"Nome obbligatorio".to_string()));
    assert!(errors.contains(&"Email non valida".to_string()));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_invalid_payload() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = app_with(Some(mailer.clone()), DeliveryPolicy::default());

    let (status, body) = post_json(app, "/api/lead", "{\"nome\": ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, LeadResponse::failure("invalid_payload"));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_honeypot_fakes_success() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = app_with(Some(mailer.clone()), DeliveryPolicy::default());

    let mut payload = mario();
    payload["website"] = json!("https://cheap-pills.example");

    let (status, body) = post_json(app, "/api/lead", payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, LeadResponse::success(None));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_missing_configuration_is_server_error() {
    let app = app_with(None, DeliveryPolicy::default());

    let (status, body) = post_json(app, "/api/lead", mario().to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, LeadResponse::failure("server_misconfigured"));
}

#[tokio::test]
async fn test_missing_configuration_best_effort_succeeds() {
    let delivery = DeliveryPolicy {
        require_delivery: false,
        ..DeliveryPolicy::default()
    };
    let app = app_with(None, delivery);

    let (status, body) = post_json(app, "/api/lead", mario().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.ok);
}

#[tokio::test]
async fn test_provider_error_is_hidden_by_default() {
    let mailer = Arc::new(RecordingMailer::failing(403, "domain not verified"));
    let app = app_with(Some(mailer.clone()), DeliveryPolicy::default());

    let (status, body) = post_json(app, "/api/lead", mario().to_string()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, LeadResponse::failure("email_send_failed"));
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_provider_error_can_be_exposed() {
    let mailer = Arc::new(RecordingMailer::failing(403, "domain not verified"));
    let delivery = DeliveryPolicy {
        expose_provider_errors: true,
        ..DeliveryPolicy::default()
    };
    let app = app_with(Some(mailer), delivery);

    let (status, body) = post_json(app, "/api/lead", mario().to_string()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body.error.as_deref(), Some("domain not verified"));
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = app_with(None, DeliveryPolicy::default());

    let response = app
        .oneshot(Request::builder().uri("/api/lead").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_health_check() {
    let app = app_with(None, DeliveryPolicy::default());

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_quote_estimate() {
    let app = app_with(None, DeliveryPolicy::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/preventivo?mensilita=5&esecutiva=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["totale"], json!(2500));
    assert_eq!(body["mensilita"], json!(5));
    assert_eq!(body["ordinanza_giorni"], json!(90));
}

#[tokio::test]
async fn test_bad_quote_query_answers_json() {
    let app = app_with(None, DeliveryPolicy::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/preventivo?mensilita=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: LeadResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, LeadResponse::failure("invalid_payload"));
}

#[tokio::test]
async fn test_oversized_body_answers_json() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = app_with(Some(mailer.clone()), DeliveryPolicy::default());

    // 超過 axum 預設 2 MB 上限
    let huge = json!({ "nome": "a".repeat(3 * 1024 * 1024) }).to_string();
    let (status, body) = post_json(app, "/api/lead", huge).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, LeadResponse::failure("payload_too_large"));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = app_with(None, DeliveryPolicy::default());

    let response = app
        .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
