//! Request and notification signatures for the MoMo wallet gateway.
//!
//! Both signatures are HMAC-SHA256 over `key=value` pairs joined with `&` in a
//! fixed alphabetical order, hex encoded. The order is part of the gateway
//! protocol and must not change.

use crate::config::MomoConfig;
use crate::domain::notification::IpnPayload;
use crate::gateways::PaymentOrder;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const REQUEST_TYPE: &str = "captureWallet";

pub fn create_request_payload(cfg: &MomoConfig, order: &PaymentOrder) -> String {
    format!(
        "accessKey={}&amount={}&extraData={}&ipnUrl={}&orderId={}&orderInfo={}&partnerCode={}&redirectUrl={}&requestId={}&requestType={}",
        cfg.access_key,
        order.amount,
        order.extra_data,
        cfg.ipn_url,
        order.order_id,
        order.order_info,
        cfg.partner_code,
        cfg.redirect_url,
        order.request_id,
        REQUEST_TYPE,
    )
}

pub fn sign_create_request(cfg: &MomoConfig, order: &PaymentOrder) -> String {
    hmac_hex(&cfg.secret_key, &create_request_payload(cfg, order))
}

/// The access key is ours; every other field comes from the notification.
pub fn notification_payload(cfg: &MomoConfig, ipn: &IpnPayload) -> String {
    format!(
        "accessKey={}&amount={}&extraData={}&message={}&orderId={}&orderInfo={}&orderType={}&partnerCode={}&payType={}&requestId={}&responseTime={}&resultCode={}&transId={}",
        cfg.access_key,
        ipn.amount,
        ipn.extra_data,
        ipn.message,
        ipn.order_id,
        ipn.order_info,
        ipn.order_type,
        ipn.partner_code,
        ipn.pay_type,
        ipn.request_id,
        ipn.response_time,
        ipn.result_code,
        ipn.trans_id,
    )
}

pub fn sign_notification(cfg: &MomoConfig, ipn: &IpnPayload) -> String {
    hmac_hex(&cfg.secret_key, &notification_payload(cfg, ipn))
}

pub fn verify_notification(cfg: &MomoConfig, ipn: &IpnPayload) -> bool {
    let Ok(provided) = hex::decode(ipn.signature.trim()) else {
        return false;
    };
    if provided.is_empty() {
        return false;
    }
    let mut mac = new_mac(&cfg.secret_key);
    mac.update(notification_payload(cfg, ipn).as_bytes());
    mac.verify_slice(&provided).is_ok()
}

fn hmac_hex(secret: &str, raw: &str) -> String {
    let mut mac = new_mac(secret);
    mac.update(raw.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn new_mac(secret: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take any size key")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> MomoConfig {
        MomoConfig {
            endpoint: "http://localhost/create".to_string(),
            partner_code: "MOMOJOBHUNTER".to_string(),
            access_key: "ak".to_string(),
            secret_key: "sk".to_string(),
            redirect_url: "https://r.example".to_string(),
            ipn_url: "https://i.example".to_string(),
            timeout_ms: 1000,
            max_attempts: 1,
            backoff_base_ms: 1,
            mock_behavior: None,
        }
    }

    fn order() -> PaymentOrder {
        PaymentOrder {
            order_id: "oid".to_string(),
            request_id: "rid".to_string(),
            amount: 100000,
            order_info: "Thanh toan goi Premium".to_string(),
            extra_data: String::new(),
        }
    }

    #[test]
    fn create_payload_has_exact_field_order() {
        assert_eq!(
            create_request_payload(&cfg(), &order()),
            "accessKey=ak&amount=100000&extraData=&ipnUrl=https://i.example&orderId=oid&orderInfo=Thanh toan goi Premium&partnerCode=MOMOJOBHUNTER&redirectUrl=https://r.example&requestId=rid&requestType=captureWallet"
        );
    }

    #[test]
    fn signature_is_lowercase_hex_sha256() {
        let sig = sign_create_request(&cfg(), &order());
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(sig, sign_create_request(&cfg(), &order()));
    }

    #[test]
    fn hmac_matches_reference_vector() {
        // RFC 4231 test case 2.
        assert_eq!(
            hmac_hex("Jefe", "what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn notification_signature_round_trips_and_detects_tampering() {
        let cfg = cfg();
        let mut ipn = IpnPayload {
            partner_code: cfg.partner_code.clone(),
            order_id: "oid".to_string(),
            amount: "100000".to_string(),
            result_code: "0".to_string(),
            ..IpnPayload::default()
        };
        ipn.signature = sign_notification(&cfg, &ipn);
        assert!(verify_notification(&cfg, &ipn));

        ipn.amount = "1".to_string();
        assert!(!verify_notification(&cfg, &ipn));
    }

    #[test]
    fn missing_or_garbage_signature_fails() {
        let ipn = IpnPayload::default();
        assert!(!verify_notification(&cfg(), &ipn));
        let ipn = IpnPayload {
            signature: "not-hex".to_string(),
            ..IpnPayload::default()
        };
        assert!(!verify_notification(&cfg(), &ipn));
    }
}
