use crate::domain::transaction::TransactionStatus;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreatePaymentRequest {
    #[serde(default, deserialize_with = "numeric_id")]
    pub service_package_id: Option<i64>,
}

impl CreatePaymentRequest {
    /// Parses a raw request body. An empty body is a request without a
    /// package id; any unreadable body is a validation error.
    pub fn from_body(body: &[u8]) -> Result<Self, PaymentError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| PaymentError::Validation(format!("invalid request body: {e}")))
    }
}

/// Accepts `5`, `"5"` or `null`.
fn numeric_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
        Null(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Ok(Some(v)),
        Raw::Text(v) if v.trim().is_empty() => Ok(None),
        Raw::Text(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("service_package_id {v:?} is not a number"))),
        Raw::Null(()) => Ok(None),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedPayment {
    pub order_id: String,
    #[serde(rename = "payUrl")]
    pub pay_url: String,
    pub status: TransactionStatus,
    pub amount: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_result_code: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("{0}")]
    Validation(String),
    #[error("authentication credentials were not provided or are invalid")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("payment declined by gateway ({result_code}): {message}")]
    Declined { result_code: i64, message: String },
    #[error("payment gateway unavailable: {0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status(&self) -> StatusCode {
        match self {
            PaymentError::Validation(_) => StatusCode::BAD_REQUEST,
            PaymentError::Unauthorized => StatusCode::UNAUTHORIZED,
            PaymentError::Forbidden(_) => StatusCode::FORBIDDEN,
            PaymentError::NotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::Declined { .. } => StatusCode::BAD_REQUEST,
            PaymentError::Upstream(_) => StatusCode::BAD_GATEWAY,
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PaymentError::Validation(_) => "VALIDATION_ERROR",
            PaymentError::Unauthorized => "UNAUTHORIZED",
            PaymentError::Forbidden(_) => "FORBIDDEN",
            PaymentError::NotFound(_) => "NOT_FOUND",
            PaymentError::Declined { .. } => "PAYMENT_DECLINED",
            PaymentError::Upstream(_) => "UPSTREAM_ERROR",
            PaymentError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let (message, details, gateway_result_code) = match self {
            PaymentError::Declined {
                result_code,
                message,
            } => (message.clone(), None, Some(*result_code)),
            PaymentError::Upstream(reason) => (
                "payment gateway is unreachable or returned an invalid response".to_string(),
                Some(reason.clone()),
                None,
            ),
            PaymentError::Internal(_) => ("internal error".to_string(), None, None),
            other => (other.to_string(), None, None),
        };

        ErrorEnvelope {
            error: ErrorPayload {
                code: self.code().to_string(),
                message,
                details,
                gateway_result_code,
            },
        }
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        if let PaymentError::Internal(e) = &self {
            tracing::error!("internal error: {:#}", e);
        }
        (self.status(), Json(self.envelope())).into_response()
    }
}
