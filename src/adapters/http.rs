use crate::core::intake::LeadIntake;
use crate::core::quote::{estimate, QuoteRequest};
use crate::domain::model::IntakeOutcome;
use crate::utils::error::{ErrorCategory, LeadError};
use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub struct AppState {
    pub intake: LeadIntake,
}

impl AppState {
    pub fn new(intake: LeadIntake) -> Self {
        Self { intake }
    }
}

/// Body of every `/api/lead` response.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeadResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl LeadResponse {
    pub fn success(id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            ..Self::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/lead", get(liveness).post(submit_lead))
        .route("/api/contatti", axum::routing::post(submit_lead))
        .route("/api/preventivo", get(quote))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_origin(Any)
                .allow_headers([header::CONTENT_TYPE]),
        )
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("🚀 lead intake listening on {}", addr);

    axum::serve(listener, router(state).into_make_service())
        .await
        .context("error running lead intake server")
}

async fn health_check() -> &'static str {
    "OK"
}

async fn liveness() -> Json<LeadResponse> {
    Json(LeadResponse::success(None))
}

async fn quote(query: std::result::Result<Query<QuoteRequest>, QueryRejection>) -> Response {
    match query {
        Ok(Query(request)) => Json(estimate(request)).into_response(),
        Err(rejection) => rejection_response(rejection.status(), &rejection.body_text()),
    }
}

pub async fn submit_lead(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection.status(), &rejection.body_text()),
    };

    match state.intake.submit(&body).await {
        Ok(outcome) => {
            if outcome == IntakeOutcome::Skipped {
                tracing::debug!("Lead accepted without notification");
            }
            let id = outcome.receipt_id().map(str::to_string);
            (StatusCode::OK, Json(LeadResponse::success(id))).into_response()
        }
        Err(e) => error_response(&e, state.intake.delivery_policy().expose_provider_errors),
    }
}

pub fn error_response(err: &LeadError, expose_provider_errors: bool) -> Response {
    if err.category() != ErrorCategory::Input {
        tracing::error!(
            "❌ Lead submission failed: {} (Category: {:?}, Severity: {:?})",
            err,
            err.category(),
            err.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", err.recovery_suggestion());
    }

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = match err {
        LeadError::ValidationFailed { errors } => LeadResponse {
            ok: false,
            errors: Some(errors.clone()),
            ..LeadResponse::default()
        },
        e if e.category() == ErrorCategory::Provider && expose_provider_errors => {
            LeadResponse::failure(e.user_friendly_message())
        }
        e => LeadResponse::failure(e.code()),
    };

    (status, Json(body)).into_response()
}

/// Extractor failures (oversized body, bad query string) keep the JSON shape.
fn rejection_response(status: StatusCode, detail: &str) -> Response {
    tracing::warn!("Request rejected before intake ({}): {}", status, detail);

    let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "payload_too_large"
    } else {
        "invalid_payload"
    };

    (status, Json(LeadResponse::failure(code))).into_response()
}
