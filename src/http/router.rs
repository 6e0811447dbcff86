use crate::http::handlers::{notifications, ops, packages, payments};
use crate::http::middleware::admin_auth::require_internal_api_key;
use crate::http::middleware::caller_auth::require_caller;
use crate::http::middleware::rate_limit::{enforce, RateLimitState};
use crate::AppState;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::Router;

/// Buyer routes need a bearer token and are rate limited when Redis is
/// configured. The gateway webhooks are public and never rate limited.
pub fn build_router(
    state: AppState,
    internal_api_key: String,
    rate_limit: Option<RateLimitState>,
) -> Router {
    let mut buyer_routes: Router<AppState> = Router::new()
        .route("/packages", get(packages::list_packages))
        .route("/packages/:package_id", get(packages::get_package))
        .route("/payment/momo-pay", post(payments::create_momo_payment))
        .route("/payment/history", get(payments::transaction_history))
        .layer(from_fn_with_state(state.clone(), require_caller));

    if let Some(limits) = rate_limit {
        buyer_routes = buyer_routes.layer(from_fn_with_state(limits, enforce));
    }

    let admin_routes: Router<AppState> = Router::new()
        .route(
            "/admin/packages/:package_id/price",
            put(packages::reprice_package),
        )
        .layer(from_fn_with_state(internal_api_key, require_internal_api_key));

    Router::new()
        .route("/health", get(payments::health))
        .route("/ops/readiness", get(ops::readiness))
        .route("/ops/liveness", get(ops::liveness))
        .route("/payment/momo-ipn", post(notifications::momo_ipn))
        .route("/payment/momo-return", get(notifications::momo_return))
        .merge(buyer_routes)
        .merge(admin_routes)
        .with_state(state)
}
