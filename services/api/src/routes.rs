use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use revstream::aggregator::{aggregator_router, AggregatorClient, AggregatorProxy};
use revstream::funnel::{
    funnel_router, IdentityProvider, OnboardingService, SessionStore,
};
use revstream::pricing::{
    advance_offer, property_manager_commission, AdvanceOffer, CommissionQuote,
};

#[derive(Debug, Deserialize)]
pub(crate) struct OfferQuoteRequest {
    pub(crate) total_repayment: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommissionQuoteRequest {
    pub(crate) monthly_rent: u64,
    pub(crate) term_months: u8,
}

pub(crate) fn with_platform_routes<S, I, C>(
    service: Arc<OnboardingService<S, I>>,
    proxy: Arc<AggregatorProxy<C>>,
) -> axum::Router
where
    S: SessionStore + 'static,
    I: IdentityProvider + 'static,
    C: AggregatorClient + 'static,
{
    funnel_router(service)
        .merge(aggregator_router(proxy))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/offers/quote",
            axum::routing::post(offer_quote_endpoint),
        )
        .route(
            "/api/v1/offers/commission",
            axum::routing::post(commission_quote_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Quote an advance for the repayment the slider selected. Recomputed on
/// every request; offers are never persisted.
pub(crate) async fn offer_quote_endpoint(
    Json(payload): Json<OfferQuoteRequest>,
) -> Json<AdvanceOffer> {
    Json(advance_offer(payload.total_repayment))
}

pub(crate) async fn commission_quote_endpoint(
    Json(payload): Json<CommissionQuoteRequest>,
) -> Json<CommissionQuote> {
    Json(property_manager_commission(
        payload.monthly_rent,
        payload.term_months,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offer_quote_endpoint_matches_the_calculator() {
        let Json(offer) = offer_quote_endpoint(Json(OfferQuoteRequest {
            total_repayment: 30_000,
        }))
        .await;

        assert_eq!(offer.term_months, 3);
        assert_eq!(offer.fee_rate.basis_points(), 700);
        assert_eq!(offer.fee, 2_100);
        assert_eq!(offer.advance_amount, 27_900);
    }

    #[tokio::test]
    async fn offer_quote_endpoint_clamps_the_term() {
        let Json(offer) = offer_quote_endpoint(Json(OfferQuoteRequest {
            total_repayment: 90_000,
        }))
        .await;

        assert_eq!(offer.term_months, 9);
        assert_eq!(offer.fee, 11_700);
        assert_eq!(offer.advance_amount, 78_300);
    }

    #[tokio::test]
    async fn commission_quote_endpoint_applies_the_flat_rate() {
        let Json(quote) = commission_quote_endpoint(Json(CommissionQuoteRequest {
            monthly_rent: 2_500,
            term_months: 6,
        }))
        .await;

        assert_eq!(quote.commission_rate.basis_points(), 200);
        assert_eq!(quote.commission, 300);
    }
}
