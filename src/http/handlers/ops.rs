use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = match state.ledger.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("readiness: database check failed: {:#}", e);
            false
        }
    };

    let redis_ok = match &state.redis_client {
        Some(client) => Some(
            async {
                if let Ok(mut conn) = client.get_multiplexed_async_connection().await {
                    let pong: redis::RedisResult<String> =
                        redis::cmd("PING").query_async(&mut conn).await;
                    return pong.is_ok();
                }
                false
            }
            .await,
        ),
        None => None,
    };

    let ok = db_ok && redis_ok.unwrap_or(true);
    let status = if ok {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "ready": ok,
            "db": db_ok,
            "redis": redis_ok,
        })),
    )
        .into_response()
}

pub async fn liveness() -> impl IntoResponse {
    (axum::http::StatusCode::OK, Json(serde_json::json!({"alive": true}))).into_response()
}
