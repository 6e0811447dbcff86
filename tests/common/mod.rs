#![allow(dead_code)]

use jobhunter_payments::config::MomoConfig;
use jobhunter_payments::domain::context::{Caller, Role};
use jobhunter_payments::domain::notification::IpnPayload;
use jobhunter_payments::domain::package::TargetUser;
use jobhunter_payments::gateways::mock::MockGateway;
use jobhunter_payments::gateways::signature::sign_notification;
use jobhunter_payments::repo::memory::MemoryStore;
use jobhunter_payments::AppState;
use rust_decimal::Decimal;
use std::sync::Arc;

pub fn momo_config() -> MomoConfig {
    MomoConfig {
        endpoint: "http://127.0.0.1:9/create".to_string(),
        partner_code: "MOMOJOBHUNTER".to_string(),
        access_key: "test-access-key".to_string(),
        secret_key: "test-secret-key".to_string(),
        redirect_url: "https://jobhunter.example/payment/return".to_string(),
        ipn_url: "https://api.jobhunter.example/payment/momo-ipn".to_string(),
        timeout_ms: 1_000,
        max_attempts: 3,
        backoff_base_ms: 1,
        mock_behavior: None,
    }
}

pub struct Harness {
    pub store: MemoryStore,
    pub gateway: Arc<MockGateway>,
    pub state: AppState,
    pub momo: MomoConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_gateway(MockGateway::new("ALWAYS_SUCCESS"))
    }

    pub fn with_gateway(gateway: MockGateway) -> Self {
        let store = MemoryStore::new();
        let gateway = Arc::new(gateway);
        let momo = momo_config();
        let state = AppState::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            gateway.clone(),
            momo.clone(),
            None,
        );
        Self {
            store,
            gateway,
            state,
            momo,
        }
    }

    pub async fn applicant(&self, name: &str) -> Caller {
        let user_id = self.store.add_user(name, Role::Applicant, true).await;
        Caller {
            user_id,
            role: Role::Applicant,
        }
    }

    pub async fn recruiter(&self, name: &str) -> Caller {
        let user_id = self.store.add_user(name, Role::Recruiter, false).await;
        Caller {
            user_id,
            role: Role::Recruiter,
        }
    }

    pub async fn package(&self, name: &str, price: Decimal, target: TargetUser) -> i64 {
        self.store.add_package(name, price, target).await
    }

    /// A notification as the gateway would sign it.
    pub fn ipn(&self, order_id: &str, amount: i64, result_code: i64) -> IpnPayload {
        let mut ipn = IpnPayload {
            partner_code: self.momo.partner_code.clone(),
            order_id: order_id.to_string(),
            request_id: format!("req-{order_id}"),
            amount: amount.to_string(),
            order_info: "Thanh toan goi Premium".to_string(),
            order_type: "momo_wallet".to_string(),
            trans_id: "4088878653".to_string(),
            result_code: result_code.to_string(),
            message: if result_code == 0 {
                "Successful.".to_string()
            } else {
                "Transaction denied by user.".to_string()
            },
            pay_type: "qr".to_string(),
            response_time: "1721720663942".to_string(),
            extra_data: String::new(),
            signature: String::new(),
        };
        ipn.signature = sign_notification(&self.momo, &ipn);
        ipn
    }
}
