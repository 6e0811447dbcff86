use crate::domain::transaction::PaymentMethod;
use uuid::Uuid;

pub mod mock;
pub mod momo;
pub mod signature;

/// One outbound payment attempt. Ids are fresh per attempt and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    pub order_id: String,
    pub request_id: String,
    pub amount: i64,
    pub order_info: String,
    pub extra_data: String,
}

impl PaymentOrder {
    pub fn new(amount: i64, order_info: String) -> Self {
        Self {
            order_id: Uuid::new_v4().to_string(),
            request_id: Uuid::new_v4().to_string(),
            amount,
            order_info,
            extra_data: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayAck {
    Accepted { pay_url: String },
    Declined { result_code: i64, message: String },
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway connection failed: {0}")]
    Transport(String),
    #[error("gateway exchange interrupted: {0}")]
    Interrupted(String),
    #[error("gateway timed out")]
    Timeout,
    #[error("gateway returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("gateway response malformed: {0}")]
    Malformed(String),
}

impl GatewayError {
    /// Whether the attempt may be resent with the same order ids.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport(_) => true,
            GatewayError::Http { status, .. } => *status >= 500,
            GatewayError::Interrupted(_) | GatewayError::Timeout | GatewayError::Malformed(_) => {
                false
            }
        }
    }
}

#[async_trait::async_trait]
pub trait WalletGateway: Send + Sync {
    fn name(&self) -> &'static str;

    fn payment_method(&self) -> PaymentMethod;

    async fn create_payment(&self, order: &PaymentOrder) -> Result<GatewayAck, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_get_distinct_ids() {
        let a = PaymentOrder::new(10, "x".to_string());
        let b = PaymentOrder::new(10, "x".to_string());
        assert_ne!(a.order_id, b.order_id);
        assert_ne!(a.order_id, a.request_id);
        assert!(a.extra_data.is_empty());
    }

    #[test]
    fn only_transport_and_server_errors_retry() {
        assert!(GatewayError::Transport("refused".into()).is_retryable());
        assert!(GatewayError::Http { status: 503, body: String::new() }.is_retryable());
        assert!(!GatewayError::Http { status: 400, body: String::new() }.is_retryable());
        assert!(!GatewayError::Timeout.is_retryable());
        assert!(!GatewayError::Interrupted("reset".into()).is_retryable());
        assert!(!GatewayError::Malformed("eof".into()).is_retryable());
    }
}
