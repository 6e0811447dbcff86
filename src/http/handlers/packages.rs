use crate::domain::context::Caller;
use crate::domain::package::RepriceRequest;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};

pub async fn list_packages(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> impl IntoResponse {
    match state.catalog_service.list_packages(&caller).await {
        Ok(items) => (axum::http::StatusCode::OK, Json(items)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_package(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(package_id): Path<i64>,
) -> impl IntoResponse {
    match state.catalog_service.get_package(&caller, package_id).await {
        Ok(detail) => (axum::http::StatusCode::OK, Json(detail)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn reprice_package(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
    Json(req): Json<RepriceRequest>,
) -> impl IntoResponse {
    match state.catalog_service.reprice_package(package_id, req.price).await {
        Ok(()) => (
            axum::http::StatusCode::OK,
            Json(serde_json::json!({ "updated": true, "price": req.price })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
