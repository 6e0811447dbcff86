use crate::domain::notification::{IpnPayload, NotificationOutcome};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Public webhook for the wallet gateway. Always answers 204 so the gateway
/// stops redelivering, whatever happened internally.
pub async fn momo_ipn(State(state): State<AppState>, body: Bytes) -> StatusCode {
    match serde_json::from_slice::<IpnPayload>(&body) {
        Ok(ipn) => {
            state.notification_service.handle(ipn).await;
        }
        Err(e) => {
            tracing::warn!(bytes = body.len(), "unparseable notification body: {}", e);
        }
    }
    StatusCode::NO_CONTENT
}

/// Browser redirect target after checkout. Carries the same signed fields as
/// the IPN, so it settles the transaction too when it arrives first.
pub async fn momo_return(
    State(state): State<AppState>,
    Query(ipn): Query<IpnPayload>,
) -> impl IntoResponse {
    let order_id = ipn.order_id.clone();
    let outcome = state.notification_service.handle(ipn).await;

    let status = match outcome {
        NotificationOutcome::Settled { transaction, .. }
        | NotificationOutcome::PaidAfterExpiry { transaction, .. } => Some(transaction.status),
        NotificationOutcome::UnknownOrder => None,
        _ if order_id.is_empty() => None,
        _ => match state.payment_service.transaction_status(&order_id).await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(%order_id, "status lookup failed: {:#}", e);
                None
            }
        },
    };

    match status {
        Some(status) => (
            StatusCode::OK,
            Json(serde_json::json!({ "order_id": order_id, "status": status })),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
