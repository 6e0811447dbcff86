use crate::config::MomoConfig;
use crate::domain::transaction::PaymentMethod;
use crate::gateways::signature::{sign_create_request, REQUEST_TYPE};
use crate::gateways::{GatewayAck, GatewayError, PaymentOrder, WalletGateway};
use serde::{Deserialize, Serialize};

const PARTNER_NAME: &str = "Job Hunter";
const STORE_ID: &str = "JobHunterStore";
const LANG: &str = "vi";

pub struct MomoGateway {
    pub config: MomoConfig,
    pub client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentBody<'a> {
    pub partner_code: &'a str,
    pub partner_name: &'a str,
    pub store_id: &'a str,
    pub request_id: &'a str,
    pub amount: i64,
    pub order_id: &'a str,
    pub order_info: &'a str,
    pub redirect_url: &'a str,
    pub ipn_url: &'a str,
    pub lang: &'a str,
    pub extra_data: &'a str,
    pub request_type: &'a str,
    pub signature: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePaymentReply {
    result_code: Option<serde_json::Value>,
    message: Option<String>,
    local_message: Option<String>,
    pay_url: Option<String>,
}

impl MomoGateway {
    pub fn new(config: MomoConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn request_body<'a>(&'a self, order: &'a PaymentOrder) -> CreatePaymentBody<'a> {
        CreatePaymentBody {
            partner_code: &self.config.partner_code,
            partner_name: PARTNER_NAME,
            store_id: STORE_ID,
            request_id: &order.request_id,
            amount: order.amount,
            order_id: &order.order_id,
            order_info: &order.order_info,
            redirect_url: &self.config.redirect_url,
            ipn_url: &self.config.ipn_url,
            lang: LANG,
            extra_data: &order.extra_data,
            request_type: REQUEST_TYPE,
            signature: sign_create_request(&self.config, order),
        }
    }
}

#[async_trait::async_trait]
impl WalletGateway for MomoGateway {
    fn name(&self) -> &'static str {
        "momo"
    }

    fn payment_method(&self) -> PaymentMethod {
        PaymentMethod::Momo
    }

    async fn create_payment(&self, order: &PaymentOrder) -> Result<GatewayAck, GatewayError> {
        let body = self.request_body(order);

        let resp = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .timeout(std::time::Duration::from_millis(self.config.timeout_ms))
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = resp.status();
        let text = resp.text().await.map_err(classify_send_error)?;

        if status.is_server_error() {
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        // Declines come back as 4xx with a JSON body carrying resultCode.
        let reply: CreatePaymentReply = serde_json::from_str(&text).map_err(|e| {
            if status.is_success() {
                GatewayError::Malformed(e.to_string())
            } else {
                GatewayError::Http {
                    status: status.as_u16(),
                    body: text.chars().take(200).collect(),
                }
            }
        })?;

        let result_code = reply
            .result_code
            .as_ref()
            .and_then(code_as_i64)
            .ok_or_else(|| GatewayError::Malformed("missing resultCode".to_string()))?;

        if result_code == 0 {
            let pay_url = reply
                .pay_url
                .filter(|u| !u.is_empty())
                .ok_or_else(|| GatewayError::Malformed("accepted without payUrl".to_string()))?;
            return Ok(GatewayAck::Accepted { pay_url });
        }

        Ok(GatewayAck::Declined {
            result_code,
            message: reply
                .message
                .or(reply.local_message)
                .unwrap_or_default(),
        })
    }
}

fn code_as_i64(v: &serde_json::Value) -> Option<i64> {
    v.as_i64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn classify_send_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::Transport(e.to_string())
    } else {
        GatewayError::Interrupted(e.to_string())
    }
}
