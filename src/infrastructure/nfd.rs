use crate::domain::account::Address;
use crate::domain::group::TransactionGroup;
use crate::domain::payment::PaymentRequest;
use crate::domain::ports::Resolver;
use crate::error::{PayoutError, ResolutionError};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.nf.domains";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendToRequest {
    amount: u64,
    assets: Vec<u64>,
    sender: String,
    opt_in_only: bool,
}

/// HTTP client for the naming service's vault `sendTo` endpoint.
///
/// Builds unsigned transactions that move `asset_id` from `sender` into the
/// vault behind a handle. The sender must already hold the asset.
#[derive(Debug, Clone)]
pub struct NfdClient {
    client: Client,
    base_url: Url,
    asset_id: u64,
    sender: Address,
}

impl NfdClient {
    pub fn new(
        base_url: &str,
        asset_id: u64,
        sender: Address,
        timeout: Duration,
    ) -> Result<Self, PayoutError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PayoutError::ConfigError(format!("invalid resolver URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(PayoutError::ConfigError(format!(
                "invalid resolver URL: {base_url}"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PayoutError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            asset_id,
            sender,
        })
    }

    fn send_to_url(&self, handle: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["nfd", "vault", "sendTo", handle]);
        }
        url
    }
}

#[async_trait]
impl Resolver for NfdClient {
    async fn fetch_group(
        &self,
        request: &PaymentRequest,
    ) -> Result<TransactionGroup, ResolutionError> {
        let handle = &request.handle;
        let transport = |e: reqwest::Error| ResolutionError::Transport {
            handle: handle.clone(),
            message: e.to_string(),
        };

        let body = SendToRequest {
            amount: request.amount.value(),
            assets: vec![self.asset_id],
            sender: self.sender.to_string(),
            opt_in_only: false,
        };

        let response = self
            .client
            .post(self.send_to_url(handle))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(ResolutionError::Status {
                handle: handle.clone(),
                status: status.as_u16(),
                message: text,
            });
        }

        decode_group(handle, &text)
    }
}

/// Parses a `sendTo` response: `[[type, base64-txn], ...]`.
///
/// The service sometimes wraps that array in a JSON string; both forms are
/// accepted. Type tags are dropped and order is kept.
pub fn decode_group(handle: &str, body: &str) -> Result<TransactionGroup, ResolutionError> {
    let malformed = |message: String| ResolutionError::Malformed {
        handle: handle.to_string(),
        message,
    };

    let mut value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
    if let serde_json::Value::String(inner) = &value {
        value = serde_json::from_str(inner).map_err(|e| malformed(e.to_string()))?;
    }
    let pairs: Vec<(String, String)> =
        serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
    if pairs.is_empty() {
        return Err(malformed("no transactions returned".to_string()));
    }

    let transactions = pairs
        .into_iter()
        .enumerate()
        .map(|(index, (_kind, encoded))| {
            STANDARD
                .decode(encoded)
                .map_err(|e| malformed(format!("transaction {index}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TransactionGroup::new(transactions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Account;

    fn client(base: &str) -> NfdClient {
        NfdClient::new(
            base,
            1285225688,
            Account::from_seed([4u8; 32]).address(),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_group_keeps_order() {
        let body = r#"[["u","AQI="],["u","Aw=="],["s","BAUG"]]"#;
        let group = decode_group("a.algo", body).unwrap();
        assert_eq!(
            group.transactions(),
            &[vec![1, 2], vec![3], vec![4, 5, 6]]
        );
    }

    #[test]
    fn test_decode_group_accepts_string_wrapped_array() {
        let body = r#""[[\"u\",\"AQI=\"]]""#;
        let group = decode_group("a.algo", body).unwrap();
        assert_eq!(group.transactions(), &[vec![1, 2]]);
    }

    #[test]
    fn test_decode_group_rejects_bad_payloads() {
        for body in ["not json", "{}", "[]", r#"[["u","%%%"]]"#] {
            assert!(
                matches!(
                    decode_group("a.algo", body),
                    Err(ResolutionError::Malformed { .. })
                ),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn test_send_to_url() {
        assert_eq!(
            client("https://api.nf.domains").send_to_url("alice.algo").as_str(),
            "https://api.nf.domains/nfd/vault/sendTo/alice.algo"
        );
        assert_eq!(
            client("http://localhost:9000/api/").send_to_url("bob.algo").as_str(),
            "http://localhost:9000/api/nfd/vault/sendTo/bob.algo"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let sender = Account::from_seed([4u8; 32]).address();
        assert!(NfdClient::new("not a url", 1, sender, Duration::from_secs(1)).is_err());
        assert!(NfdClient::new("mailto:x@y", 1, sender, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let body = SendToRequest {
            amount: 5,
            assets: vec![7],
            sender: "SENDER".into(),
            opt_in_only: false,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"amount": 5, "assets": [7], "sender": "SENDER", "optInOnly": false})
        );
    }
}
