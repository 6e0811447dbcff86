use crate::domain::context::Caller;
use crate::domain::package::PackageSummary;
use crate::domain::payment::{CreatePaymentRequest, CreatedPayment, PaymentError};
use crate::domain::transaction::{NewTransaction, Settlement, TransactionStatus, TransactionView};
use crate::gateways::{GatewayAck, GatewayError, PaymentOrder, WalletGateway};
use crate::repo::{LedgerStore, PackageStore, UserStore};
use crate::service::retry_orchestrator::{classify_attempt_result, RetryDirective, RetryPolicy};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct PaymentService {
    pub packages: Arc<dyn PackageStore>,
    pub ledger: Arc<dyn LedgerStore>,
    pub users: Arc<dyn UserStore>,
    pub gateway: Arc<dyn WalletGateway>,
    pub retry_policy: RetryPolicy,
}

impl PaymentService {
    /// Registers a PENDING transaction for the package and asks the wallet for
    /// a payment link.
    ///
    /// The row is written before the gateway call so a notification racing the
    /// response always finds it. A decline settles the row as FAILED; an
    /// unreachable gateway leaves it PENDING for the reconciler, since the
    /// gateway may have registered the order. A decline is reported to the
    /// buyer even if recording it fails; the row is then left to the reconciler.
    pub async fn create_payment(
        &self,
        caller: &Caller,
        req: CreatePaymentRequest,
    ) -> Result<CreatedPayment, PaymentError> {
        let package_id = req
            .service_package_id
            .ok_or_else(|| PaymentError::Validation("service_package_id is required".to_string()))?;

        let package = self
            .packages
            .find_active(package_id)
            .await?
            .ok_or_else(|| PaymentError::NotFound(format!("service package {package_id} not found")))?;

        if !package.target_user.admits(caller.role) {
            return Err(PaymentError::Forbidden(format!(
                "package {} is not sold to {} accounts",
                package.id,
                caller.role.as_str()
            )));
        }

        let amount = package.charge_amount()?;
        let order = PaymentOrder::new(amount, format!("Thanh toan goi {}", package.name));

        let tx = self
            .ledger
            .insert_pending(NewTransaction {
                order_id: order.order_id.clone(),
                request_id: order.request_id.clone(),
                user_id: caller.user_id,
                package_id: package.id,
                amount,
                payment_method: self.gateway.payment_method(),
            })
            .await?;

        tracing::info!(
            order_id = %tx.order_id,
            user_id = caller.user_id,
            package_id = package.id,
            amount,
            gateway = self.gateway.name(),
            "payment registered"
        );

        match self.call_gateway(&order).await {
            Ok(GatewayAck::Accepted { pay_url }) => Ok(CreatedPayment {
                order_id: tx.order_id,
                pay_url,
                status: tx.status,
                amount: tx.amount,
            }),
            Ok(GatewayAck::Declined {
                result_code,
                message,
            }) => {
                tracing::warn!(order_id = %tx.order_id, result_code, %message, "gateway declined payment");
                if let Err(e) = self
                    .ledger
                    .settle_pending(
                        &tx.order_id,
                        &Settlement::failed(None, Some(format!("{result_code}: {message}"))),
                    )
                    .await
                {
                    tracing::error!(order_id = %tx.order_id, "failed to record gateway decline: {:#}", e);
                }
                Err(PaymentError::Declined {
                    result_code,
                    message,
                })
            }
            Err(e) => {
                tracing::error!(order_id = %tx.order_id, "gateway call failed: {}", e);
                Err(PaymentError::Upstream(e.to_string()))
            }
        }
    }

    async fn call_gateway(&self, order: &PaymentOrder) -> Result<GatewayAck, GatewayError> {
        let mut attempt = 1;
        loop {
            let result = self.gateway.create_payment(order).await;
            match classify_attempt_result(&result, attempt, &self.retry_policy) {
                RetryDirective::RetryAfter(delay) => {
                    tracing::warn!(
                        order_id = %order.order_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "retrying gateway call"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDirective::Done | RetryDirective::GiveUp => return result,
            }
        }
    }

    pub async fn transaction_history(
        &self,
        caller: &Caller,
    ) -> Result<Vec<TransactionView>, PaymentError> {
        let transactions = self.ledger.list_for_user(caller.user_id).await?;
        let buyer = self.users.find_user(caller.user_id).await?;

        let mut packages: HashMap<i64, Option<PackageSummary>> = HashMap::new();
        let mut out = Vec::with_capacity(transactions.len());
        for tx in transactions {
            let summary = match tx.package_id {
                Some(id) => {
                    if !packages.contains_key(&id) {
                        let found = self.packages.find_any(id).await?;
                        packages.insert(id, found.as_ref().map(PackageSummary::from));
                    }
                    packages.get(&id).cloned().flatten()
                }
                None => None,
            };
            out.push(TransactionView::new(tx, buyer.clone(), summary));
        }
        Ok(out)
    }

    pub async fn transaction_status(
        &self,
        order_id: &str,
    ) -> anyhow::Result<Option<TransactionStatus>> {
        Ok(self
            .ledger
            .find_by_order_id(order_id)
            .await?
            .map(|tx| tx.status))
    }
}
