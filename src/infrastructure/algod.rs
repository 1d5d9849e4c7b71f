use crate::domain::group::SignedGroup;
use crate::domain::ports::Ledger;
use crate::error::{LedgerError, PayoutError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const TOKEN_HEADER: &str = "X-Algo-API-Token";

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

#[derive(Debug, Deserialize)]
struct NodeStatus {
    #[serde(rename = "last-round")]
    last_round: u64,
}

#[derive(Debug, Deserialize)]
struct PendingTransaction {
    #[serde(rename = "confirmed-round", default)]
    confirmed_round: Option<u64>,
    #[serde(rename = "pool-error", default)]
    pool_error: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// REST client for a ledger node (`algod` v2 API).
#[derive(Debug, Clone)]
pub struct AlgodClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl AlgodClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, PayoutError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PayoutError::ConfigError(format!("invalid node URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(PayoutError::ConfigError(format!(
                "invalid node URL: {base_url}"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PayoutError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: token.to_string(),
        })
    }

    fn endpoint(&self, path: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, LedgerError> {
        let response = self
            .client
            .get(url)
            .header(TOKEN_HEADER, &self.token)
            .query(&[("format", "json")])
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        read_json(response).await
    }

    async fn status(&self) -> Result<NodeStatus, LedgerError> {
        self.get(self.endpoint(&["v2", "status"])).await
    }

    async fn status_after_block(&self, round: u64) -> Result<NodeStatus, LedgerError> {
        let round = round.to_string();
        self.get(self.endpoint(&["v2", "status", "wait-for-block-after", round.as_str()]))
            .await
    }

    async fn pending(&self, tx_id: &str) -> Result<PendingTransaction, LedgerError> {
        self.get(self.endpoint(&["v2", "transactions", "pending", tx_id]))
            .await
    }
}

/// Decodes a successful JSON body, or turns the node's error body into `Rejected`.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, LedgerError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| LedgerError::Transport(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or_else(|_| {
                if text.trim().is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });
        return Err(LedgerError::Rejected(message));
    }

    serde_json::from_str(&text).map_err(|e| LedgerError::Malformed(e.to_string()))
}

#[async_trait]
impl Ledger for AlgodClient {
    async fn submit(&self, group: &SignedGroup) -> Result<String, LedgerError> {
        let response = self
            .client
            .post(self.endpoint(&["v2", "transactions"]))
            .header(TOKEN_HEADER, &self.token)
            .header(CONTENT_TYPE, "application/x-binary")
            .body(group.to_bytes())
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let submitted: SubmitResponse = read_json(response).await?;
        Ok(submitted.tx_id)
    }

    /// Polls the pending pool once per round, starting after the node's current round.
    async fn wait_for_confirmation(
        &self,
        tx_id: &str,
        max_rounds: u64,
    ) -> Result<u64, LedgerError> {
        let start = self.status().await?.last_round.saturating_add(1);
        let end = start.saturating_add(max_rounds);
        let mut current = start;

        while current < end {
            match self.pending(tx_id).await {
                Ok(pending) => {
                    if let Some(round) = pending.confirmed_round
                        && round > 0
                    {
                        return Ok(round);
                    }
                    if !pending.pool_error.is_empty() {
                        return Err(LedgerError::PoolError(pending.pool_error));
                    }
                }
                // The node may not know the transaction yet; keep waiting.
                Err(err) => debug!(tx_id, round = current, error = %err, "Pending lookup failed"),
            }
            self.status_after_block(current).await?;
            current += 1;
        }

        Err(LedgerError::NotConfirmed(max_rounds))
    }
}
