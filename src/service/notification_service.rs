use crate::config::MomoConfig;
use crate::domain::context::Role;
use crate::domain::notification::{IpnPayload, NotificationOutcome, RejectReason, ResultClass};
use crate::domain::transaction::{Settlement, SettledStatus, TransactionStatus};
use crate::gateways::signature::verify_notification;
use crate::repo::{LedgerStore, UserStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationService {
    pub ledger: Arc<dyn LedgerStore>,
    pub users: Arc<dyn UserStore>,
    pub momo: MomoConfig,
}

impl NotificationService {
    /// Applies a gateway notification. Never fails: the gateway redelivers on
    /// anything but an acknowledgment, so every problem ends up as an outcome.
    pub async fn handle(&self, ipn: IpnPayload) -> NotificationOutcome {
        let outcome = match self.process(&ipn).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(order_id = %ipn.order_id, "notification processing failed: {:#}", e);
                NotificationOutcome::Errored(e.to_string())
            }
        };
        tracing::info!(order_id = %ipn.order_id, result_code = %ipn.result_code, ?outcome, "notification handled");
        outcome
    }

    async fn process(&self, ipn: &IpnPayload) -> anyhow::Result<NotificationOutcome> {
        if ipn.order_id.is_empty() {
            tracing::warn!("notification without orderId");
            return Ok(NotificationOutcome::Rejected(RejectReason::Malformed));
        }
        if !verify_notification(&self.momo, ipn) {
            tracing::warn!(order_id = %ipn.order_id, "notification signature mismatch");
            return Ok(NotificationOutcome::Rejected(RejectReason::BadSignature));
        }
        if ipn.partner_code != self.momo.partner_code {
            tracing::warn!(order_id = %ipn.order_id, partner_code = %ipn.partner_code, "notification for another partner");
            return Ok(NotificationOutcome::Rejected(RejectReason::ForeignPartner));
        }

        let settled = match ipn.result_class() {
            ResultClass::InProgress => return Ok(NotificationOutcome::InProgress),
            ResultClass::Success => SettledStatus::Success,
            ResultClass::Failure => SettledStatus::Failed,
        };

        let Some(existing) = self.ledger.find_by_order_id(&ipn.order_id).await? else {
            tracing::warn!(order_id = %ipn.order_id, "notification for unknown transaction");
            return Ok(NotificationOutcome::UnknownOrder);
        };

        if ipn.amount_value() != Some(existing.amount) {
            tracing::warn!(
                order_id = %ipn.order_id,
                expected = existing.amount,
                got = %ipn.amount,
                "notification amount mismatch"
            );
            return Ok(NotificationOutcome::Rejected(RejectReason::AmountMismatch));
        }

        let settlement = match settled {
            SettledStatus::Success => Settlement::success(ipn.gateway_trans_id(), ipn.result_message()),
            SettledStatus::Failed => Settlement::failed(ipn.gateway_trans_id(), ipn.result_message()),
        };

        let Some(transaction) = self.ledger.settle_pending(&ipn.order_id, &settlement).await? else {
            let current = self
                .ledger
                .find_by_order_id(&ipn.order_id)
                .await?
                .unwrap_or(existing);
            if settled == SettledStatus::Success && current.status == TransactionStatus::Failed {
                tracing::error!(
                    order_id = %ipn.order_id,
                    trans_id = %ipn.trans_id,
                    amount = current.amount,
                    user_id = ?current.user_id,
                    result_message = ?current.result_message,
                    "gateway reports payment captured for a failed transaction; manual follow-up required"
                );
                return Ok(NotificationOutcome::PaidAfterExpiry {
                    transaction: current,
                    gateway_trans_id: ipn.gateway_trans_id(),
                });
            }
            return Ok(NotificationOutcome::AlreadyFinal(current.status));
        };

        let premium_activated = match settled {
            SettledStatus::Success => match transaction.user_id {
                Some(user_id) => self.grant_entitlement(user_id).await,
                None => false,
            },
            SettledStatus::Failed => false,
        };

        Ok(NotificationOutcome::Settled {
            transaction,
            premium_activated,
        })
    }

    /// Entitlement failures are logged and swallowed; the payment itself is
    /// already recorded.
    async fn grant_entitlement(&self, user_id: i64) -> bool {
        let user = match self.users.find_user(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(user_id, "paid transaction belongs to a missing user");
                return false;
            }
            Err(e) => {
                tracing::error!(user_id, "buyer lookup failed: {:#}", e);
                return false;
            }
        };

        match user.role {
            Role::Applicant => match self.users.activate_premium(user.id).await {
                Ok(true) => {
                    tracing::info!(user_id, username = %user.username, "premium activated for applicant");
                    true
                }
                Ok(false) => {
                    tracing::warn!(user_id, username = %user.username, "applicant has no profile; premium not activated");
                    false
                }
                Err(e) => {
                    tracing::error!(user_id, "premium activation failed: {:#}", e);
                    false
                }
            },
            Role::Recruiter | Role::Admin => {
                tracing::info!(user_id, role = user.role.as_str(), "no entitlement change for role");
                false
            }
        }
    }
}
