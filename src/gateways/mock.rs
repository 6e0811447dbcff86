use crate::domain::transaction::PaymentMethod;
use crate::gateways::{GatewayAck, GatewayError, PaymentOrder, WalletGateway};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Stand-in wallet used for local runs (`MOMO_MOCK_BEHAVIOR`) and tests.
///
/// Scripted replies are consumed first; once exhausted every call gets the
/// reply described by `behavior`.
pub struct MockGateway {
    pub behavior: String,
    script: Mutex<VecDeque<Result<GatewayAck, GatewayError>>>,
    calls: AtomicUsize,
    orders: Mutex<Vec<PaymentOrder>>,
}

impl MockGateway {
    pub fn new(behavior: &str) -> Self {
        Self {
            behavior: behavior.to_string(),
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            orders: Mutex::new(Vec::new()),
        }
    }

    pub fn with_script(behavior: &str, replies: Vec<Result<GatewayAck, GatewayError>>) -> Self {
        let gateway = Self::new(behavior);
        if let Ok(mut script) = gateway.script.lock() {
            script.extend(replies);
        }
        gateway
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn orders(&self) -> Vec<PaymentOrder> {
        self.orders.lock().map(|o| o.clone()).unwrap_or_default()
    }

    fn default_reply(&self, order: &PaymentOrder) -> Result<GatewayAck, GatewayError> {
        match self.behavior.as_str() {
            "ALWAYS_DECLINE" => Ok(GatewayAck::Declined {
                result_code: 1001,
                message: "mock decline: insufficient balance".to_string(),
            }),
            "ALWAYS_UNAVAILABLE" => Err(GatewayError::Http {
                status: 503,
                body: "mock unavailable".to_string(),
            }),
            "ALWAYS_TIMEOUT" => Err(GatewayError::Timeout),
            _ => Ok(GatewayAck::Accepted {
                pay_url: format!("https://mock-wallet.local/pay/{}", order.order_id),
            }),
        }
    }
}

#[async_trait::async_trait]
impl WalletGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn payment_method(&self) -> PaymentMethod {
        PaymentMethod::Momo
    }

    async fn create_payment(&self, order: &PaymentOrder) -> Result<GatewayAck, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut orders) = self.orders.lock() {
            orders.push(order.clone());
        }

        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        scripted.unwrap_or_else(|| self.default_reply(order))
    }
}
