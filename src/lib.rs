pub mod config;
pub mod domain {
    pub mod context;
    pub mod notification;
    pub mod package;
    pub mod payment;
    pub mod transaction;
}
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod notifications;
        pub mod ops;
        pub mod packages;
        pub mod payments;
    }
    pub mod middleware {
        pub mod admin_auth;
        pub mod caller_auth;
        pub mod rate_limit;
    }
    pub mod router;
}
pub mod repo;
pub mod service {
    pub mod catalog_service;
    pub mod notification_service;
    pub mod payment_service;
    pub mod reconciler;
    pub mod retry_orchestrator;
}

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
    pub notification_service: service::notification_service::NotificationService,
    pub catalog_service: service::catalog_service::CatalogService,
    pub users: Arc<dyn repo::UserStore>,
    pub ledger: Arc<dyn repo::LedgerStore>,
    pub redis_client: Option<redis::Client>,
}

impl AppState {
    /// Wires every service onto one set of stores.
    pub fn new(
        packages: Arc<dyn repo::PackageStore>,
        ledger: Arc<dyn repo::LedgerStore>,
        users: Arc<dyn repo::UserStore>,
        gateway: Arc<dyn gateways::WalletGateway>,
        momo: config::MomoConfig,
        redis_client: Option<redis::Client>,
    ) -> Self {
        let retry_policy = service::retry_orchestrator::RetryPolicy {
            max_attempts: momo.max_attempts,
            base_backoff_ms: momo.backoff_base_ms,
            ..Default::default()
        };

        Self {
            payment_service: service::payment_service::PaymentService {
                packages: packages.clone(),
                ledger: ledger.clone(),
                users: users.clone(),
                gateway,
                retry_policy,
            },
            notification_service: service::notification_service::NotificationService {
                ledger: ledger.clone(),
                users: users.clone(),
                momo,
            },
            catalog_service: service::catalog_service::CatalogService { packages },
            users,
            ledger,
            redis_client,
        }
    }
}
