use crate::domain::context::User;
use crate::domain::package::PackageSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Paypal,
    Stripe,
    Momo,
    Zalopay,
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Paypal,
        PaymentMethod::Stripe,
        PaymentMethod::Momo,
        PaymentMethod::Zalopay,
        PaymentMethod::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Paypal => "PAYPAL",
            PaymentMethod::Stripe => "STRIPE",
            PaymentMethod::Momo => "MOMO",
            PaymentMethod::Zalopay => "ZALOPAY",
            PaymentMethod::Cash => "CASH",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::Stripe => "Stripe",
            PaymentMethod::Momo => "MoMo",
            PaymentMethod::Zalopay => "ZaloPay",
            PaymentMethod::Cash => "Tiền mặt",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failed => "FAILED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PENDING" => Some(TransactionStatus::Pending),
            "SUCCESS" => Some(TransactionStatus::Success),
            "FAILED" => Some(TransactionStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

/// The two states a PENDING transaction may move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettledStatus {
    Success,
    Failed,
}

impl From<SettledStatus> for TransactionStatus {
    fn from(s: SettledStatus) -> Self {
        match s {
            SettledStatus::Success => TransactionStatus::Success,
            SettledStatus::Failed => TransactionStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub status: SettledStatus,
    pub gateway_trans_id: Option<String>,
    pub result_message: Option<String>,
}

impl Settlement {
    pub fn success(gateway_trans_id: Option<String>, result_message: Option<String>) -> Self {
        Self {
            status: SettledStatus::Success,
            gateway_trans_id,
            result_message,
        }
    }

    pub fn failed(gateway_trans_id: Option<String>, result_message: Option<String>) -> Self {
        Self {
            status: SettledStatus::Failed,
            gateway_trans_id,
            result_message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub order_id: String,
    pub request_id: String,
    pub user_id: Option<i64>,
    pub package_id: Option<i64>,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub status: TransactionStatus,
    pub gateway_trans_id: Option<String>,
    pub result_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Applies a settlement if, and only if, the row is still PENDING.
    pub fn settle(&mut self, settlement: &Settlement, now: DateTime<Utc>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = settlement.status.into();
        if settlement.gateway_trans_id.is_some() {
            self.gateway_trans_id = settlement.gateway_trans_id.clone();
        }
        if settlement.result_message.is_some() {
            self.result_message = settlement.result_message.clone();
        }
        self.updated_at = now;
        true
    }
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub order_id: String,
    pub request_id: String,
    pub user_id: i64,
    pub package_id: i64,
    pub amount: i64,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub id: i64,
    pub order_id: String,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub gateway_trans_id: Option<String>,
    pub user_detail: Option<User>,
    pub package_detail: Option<PackageSummary>,
}

impl TransactionView {
    pub fn new(
        tx: Transaction,
        user_detail: Option<User>,
        package_detail: Option<PackageSummary>,
    ) -> Self {
        Self {
            id: tx.id,
            order_id: tx.order_id,
            amount: tx.amount,
            payment_method: tx.payment_method,
            status: tx.status,
            created_at: tx.created_at,
            gateway_trans_id: tx.gateway_trans_id,
            user_detail,
            package_detail,
        }
    }
}
