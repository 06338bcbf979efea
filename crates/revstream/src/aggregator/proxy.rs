use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderName, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use serde_json::json;
use tracing::warn;

use super::{extract_error_message, AggregatorClient, AggregatorError, UpstreamResponse};
use crate::config::AggregatorConfig;

/// Relay state: the outbound client plus the credential configuration.
pub struct AggregatorProxy<C> {
    client: Arc<C>,
    config: AggregatorConfig,
}

impl<C> AggregatorProxy<C> {
    pub fn new(client: Arc<C>, config: AggregatorConfig) -> Self {
        Self { client, config }
    }
}

/// Router builder exposing the two relay endpoints.
///
/// Method gating happens inside the handlers (via `any`) so non-POST requests
/// receive the documented JSON 405 body with CORS headers rather than axum's
/// bare method-not-allowed response.
pub fn aggregator_router<C>(proxy: Arc<AggregatorProxy<C>>) -> Router
where
    C: AggregatorClient + 'static,
{
    Router::new()
        .route(
            "/api/plaid/create-link-token",
            any(create_link_token_handler::<C>),
        )
        .route(
            "/api/plaid/exchange-token",
            any(exchange_token_handler::<C>),
        )
        .with_state(proxy)
}

static LINK_USER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_link_user_id() -> String {
    let id = LINK_USER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("user-{id:06}")
}

pub(crate) async fn create_link_token_handler<C>(
    State(proxy): State<Arc<AggregatorProxy<C>>>,
    method: Method,
) -> Response
where
    C: AggregatorClient + 'static,
{
    if let Some(early) = gate_method(&method) {
        return early;
    }

    let Some((client_id, secret)) = proxy.config.credentials() else {
        return configuration_error();
    };

    let payload = json!({
        "client_id": client_id,
        "secret": secret,
        "client_name": "Revstream Capital",
        "user": { "client_user_id": next_link_user_id() },
        "products": ["transactions"],
        "country_codes": ["US"],
        "language": "en",
    });

    relay(
        proxy.client.post_json("/link/token/create", payload).await,
        "Failed to create link token",
    )
}

pub(crate) async fn exchange_token_handler<C>(
    State(proxy): State<Arc<AggregatorProxy<C>>>,
    method: Method,
    body: Bytes,
) -> Response
where
    C: AggregatorClient + 'static,
{
    if let Some(early) = gate_method(&method) {
        return early;
    }

    let public_token = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("public_token")
                .and_then(|token| token.as_str())
                .map(str::to_string)
        });

    let Some(public_token) = public_token else {
        return error_payload(StatusCode::BAD_REQUEST, "Missing public_token", None);
    };

    let Some((client_id, secret)) = proxy.config.credentials() else {
        return configuration_error();
    };

    let payload = json!({
        "client_id": client_id,
        "secret": secret,
        "public_token": public_token,
    });

    relay(
        proxy
            .client
            .post_json("/item/public_token/exchange", payload)
            .await,
        "Failed to exchange public token",
    )
}

fn cors_headers() -> [(HeaderName, &'static str); 3] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
    ]
}

fn gate_method(method: &Method) -> Option<Response> {
    if *method == Method::OPTIONS {
        return Some((StatusCode::NO_CONTENT, cors_headers()).into_response());
    }
    if *method != Method::POST {
        return Some(error_payload(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed",
            None,
        ));
    }
    None
}

fn configuration_error() -> Response {
    error_payload(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Aggregator credentials are not configured",
        None,
    )
}

fn error_payload(status: StatusCode, error: &str, error_message: Option<String>) -> Response {
    let body = match error_message {
        Some(message) => json!({ "error": error, "error_message": message }),
        None => json!({ "error": error }),
    };
    (status, cors_headers(), axum::Json(body)).into_response()
}

/// Relay an upstream result: verbatim body on success, extracted message on
/// upstream failure, generic 500 when the aggregator is unreachable.
fn relay(result: Result<UpstreamResponse, AggregatorError>, generic: &'static str) -> Response {
    match result {
        Err(error) => {
            warn!(%error, "aggregator relay failed");
            error_payload(
                StatusCode::INTERNAL_SERVER_ERROR,
                generic,
                Some(error.to_string()),
            )
        }
        Ok(upstream) if upstream.is_success() => {
            let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::OK);
            (
                status,
                cors_headers(),
                [(header::CONTENT_TYPE, "application/json")],
                upstream.body,
            )
                .into_response()
        }
        Ok(upstream) => {
            let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let message =
                extract_error_message(&upstream.body).unwrap_or_else(|| generic.to_string());
            error_payload(status, generic, Some(message))
        }
    }
}
