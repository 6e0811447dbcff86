use crate::domain::context::Caller;
use crate::domain::payment::CreatePaymentRequest;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Extension, Json};

pub async fn create_momo_payment(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Bytes,
) -> impl IntoResponse {
    let req = match CreatePaymentRequest::from_body(&body) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };
    match state.payment_service.create_payment(&caller, req).await {
        Ok(resp) => (axum::http::StatusCode::OK, Json(resp)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn transaction_history(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> impl IntoResponse {
    match state.payment_service.transaction_history(&caller).await {
        Ok(items) => (axum::http::StatusCode::OK, Json(items)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn health() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "ok")
}
