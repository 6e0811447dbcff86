use crate::domain::transaction::{Transaction, TransactionStatus};
use serde::{Deserialize, Deserializer, Serialize};

/// Instant payment notification as posted by the wallet gateway.
///
/// The gateway sends numbers in JSON and strings in redirect query strings, so
/// numeric fields are kept in their textual form; that form is also what the
/// signature is computed over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IpnPayload {
    pub partner_code: String,
    pub order_id: String,
    pub request_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub amount: String,
    pub order_info: String,
    pub order_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub trans_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub result_code: String,
    pub message: String,
    pub pay_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub response_time: String,
    pub extra_data: String,
    pub signature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultClass {
    Success,
    InProgress,
    Failure,
}

impl IpnPayload {
    pub fn result_class(&self) -> ResultClass {
        classify_result_code(&self.result_code)
    }

    pub fn amount_value(&self) -> Option<i64> {
        self.amount.trim().parse().ok()
    }

    pub fn gateway_trans_id(&self) -> Option<String> {
        let id = self.trans_id.trim();
        (!id.is_empty()).then(|| id.to_string())
    }

    pub fn result_message(&self) -> Option<String> {
        (!self.message.is_empty()).then(|| self.message.clone())
    }
}

pub fn classify_result_code(raw: &str) -> ResultClass {
    match raw.trim().parse::<i64>() {
        Ok(0) => ResultClass::Success,
        Ok(1000) | Ok(7000) | Ok(7002) | Ok(9000) => ResultClass::InProgress,
        _ => ResultClass::Failure,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Malformed,
    BadSignature,
    ForeignPartner,
    AmountMismatch,
}

/// What happened to a delivered notification. Never surfaced to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationOutcome {
    Settled {
        transaction: Transaction,
        premium_activated: bool,
    },
    AlreadyFinal(TransactionStatus),
    /// A genuine success for a row that was already failed, typically by
    /// expiry. The row stays FAILED; the payment needs manual follow-up.
    PaidAfterExpiry {
        transaction: Transaction,
        gateway_trans_id: Option<String>,
    },
    InProgress,
    UnknownOrder,
    Rejected(RejectReason),
    Errored(String),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Int(v) => v.to_string(),
        Raw::Float(v) => v.to_string(),
        Raw::Text(v) => v,
        Raw::Null(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_and_string_fields() {
        let json = r#"{"orderId":"abc","resultCode":0,"amount":"100000","transId":4088878653,"responseTime":1721720663942}"#;
        let p: IpnPayload = serde_json::from_str(json).unwrap();
        assert_eq!(p.result_code, "0");
        assert_eq!(p.amount_value(), Some(100000));
        assert_eq!(p.gateway_trans_id().as_deref(), Some("4088878653"));
        assert_eq!(p.result_class(), ResultClass::Success);
        assert!(p.signature.is_empty());
    }

    #[test]
    fn classifies_result_codes() {
        assert_eq!(classify_result_code("0"), ResultClass::Success);
        assert_eq!(classify_result_code("7000"), ResultClass::InProgress);
        assert_eq!(classify_result_code("1006"), ResultClass::Failure);
        assert_eq!(classify_result_code(""), ResultClass::Failure);
    }
}
