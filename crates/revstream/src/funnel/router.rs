use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ConnectPlatformRequest, FunnelStep, SessionId, SignInRequest};
use super::service::{OnboardingError, OnboardingService};
use super::session::{IdentityError, IdentityProvider, SessionStore, SessionStoreError};

/// Router builder exposing HTTP endpoints for the onboarding funnel.
pub fn funnel_router<S, I>(service: Arc<OnboardingService<S, I>>) -> Router
where
    S: SessionStore + 'static,
    I: IdentityProvider + 'static,
{
    Router::new()
        .route("/api/v1/funnel/sessions", post(sign_in_handler::<S, I>))
        .route(
            "/api/v1/funnel/sessions/:session_id",
            get(session_handler::<S, I>).delete(sign_out_handler::<S, I>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/connect",
            post(connect_handler::<S, I>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/advance",
            post(advance_handler::<S, I>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/navigate",
            post(navigate_handler::<S, I>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/disconnect",
            post(disconnect_handler::<S, I>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/access/:step",
            get(access_handler::<S, I>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct NavigateRequest {
    pub(crate) to: FunnelStep,
}

pub(crate) async fn sign_in_handler<S, I>(
    State(service): State<Arc<OnboardingService<S, I>>>,
    axum::Json(request): axum::Json<SignInRequest>,
) -> Response
where
    S: SessionStore + 'static,
    I: IdentityProvider + 'static,
{
    match service.sign_in(request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn session_handler<S, I>(
    State(service): State<Arc<OnboardingService<S, I>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    I: IdentityProvider + 'static,
{
    match service.session(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn sign_out_handler<S, I>(
    State(service): State<Arc<OnboardingService<S, I>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    I: IdentityProvider + 'static,
{
    match service.sign_out(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn connect_handler<S, I>(
    State(service): State<Arc<OnboardingService<S, I>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<ConnectPlatformRequest>,
) -> Response
where
    S: SessionStore + 'static,
    I: IdentityProvider + 'static,
{
    match service.connect_platform(&SessionId(session_id), request) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn advance_handler<S, I>(
    State(service): State<Arc<OnboardingService<S, I>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    I: IdentityProvider + 'static,
{
    match service.advance(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn navigate_handler<S, I>(
    State(service): State<Arc<OnboardingService<S, I>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<NavigateRequest>,
) -> Response
where
    S: SessionStore + 'static,
    I: IdentityProvider + 'static,
{
    match service.navigate(&SessionId(session_id), request.to) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn disconnect_handler<S, I>(
    State(service): State<Arc<OnboardingService<S, I>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    I: IdentityProvider + 'static,
{
    match service.disconnect_platform(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn access_handler<S, I>(
    State(service): State<Arc<OnboardingService<S, I>>>,
    Path((session_id, step)): Path<(String, String)>,
) -> Response
where
    S: SessionStore + 'static,
    I: IdentityProvider + 'static,
{
    let Some(step) = FunnelStep::from_slug(&step) else {
        let payload = json!({ "error": format!("unknown funnel step '{step}'") });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    match service.check_access(&SessionId(session_id), step) {
        Ok(decision) => (StatusCode::OK, axum::Json(decision)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: OnboardingError) -> Response {
    match error {
        OnboardingError::Identity(IdentityError::InvalidCredentials) => {
            let payload = json!({ "error": "invalid credentials" });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        }
        OnboardingError::Store(SessionStoreError::NotFound) => {
            let payload = json!({ "error": "session not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        OnboardingError::Store(SessionStoreError::Conflict) => {
            let payload = json!({ "error": "session already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        OnboardingError::AccessDenied { redirect_to } => {
            let payload = json!({
                "error": "prerequisites unmet",
                "redirect_to": redirect_to.slug(),
            });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        OnboardingError::SkipAhead { attempted, current } => {
            let payload = json!({
                "error": format!(
                    "cannot skip ahead to {} from {}",
                    attempted.slug(),
                    current.slug()
                ),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        OnboardingError::FunnelComplete => {
            let payload = json!({ "error": "the funnel is complete" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
