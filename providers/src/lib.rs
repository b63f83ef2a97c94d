use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use ethers_primitives::{Address, H256, U256};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

pub mod error;
pub mod types;

pub use error::ProviderError;
pub use types::*;

pub type RPCResult<T> = Result<T, ProviderError>;

/// Default interval between two `eth_getTransactionReceipt` polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Serialize)]
struct JsonRpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

/// Ether network api provider over http
///
#[derive(Clone)]
pub struct Provider {
    client: reqwest::Client,
    url: String,
    next_id: Arc<AtomicU64>,
}

impl Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider").field("url", &self.url).finish()
    }
}

/// Create http provider connect to `url`, e.g `http://localhost:8545`
pub fn connect_to<S: Into<String>>(url: S) -> Provider {
    Provider {
        client: reqwest::Client::new(),
        url: url.into(),
        next_id: Default::default(),
    }
}

impl Provider {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one json-rpc request and decode the `result` field.
    ///
    /// A `null`/missing result is decoded as json `null`, so `R` should be an
    /// [`Option`] for methods returning nullable objects.
    pub async fn call<P, R>(&self, method: &str, params: P) -> RPCResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        log::trace!(target: "json-rpc", "send {} id({})", method, id);

        let response: JsonRpcResponse = self
            .client
            .post(&self.url)
            .json(&JsonRpcRequest {
                jsonrpc: "2.0",
                id,
                method,
                params,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            log::debug!(target: "json-rpc", "{} id({}) error, {}", method, id, err.message);

            return Err(ProviderError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        Ok(serde_json::from_value(
            response.result.unwrap_or(Value::Null),
        )?)
    }

    /// Returns the chain ID of the current network
    pub async fn eth_chain_id(&self) -> RPCResult<U256> {
        self.call("eth_chainId", Vec::<String>::new()).await
    }

    /// Returns a list of addresses owned by client.
    pub async fn eth_accounts(&self) -> RPCResult<Vec<Address>> {
        self.call("eth_accounts", Vec::<String>::new()).await
    }

    /// Signs and submits a transaction with one of the node managed accounts.
    pub async fn eth_send_transaction(&self, transaction: &TransactionRequest) -> RPCResult<H256> {
        self.call("eth_sendTransaction", vec![transaction]).await
    }

    /// Returns the information about a transaction requested by transaction hash.
    pub async fn eth_get_transaction_by_hash(&self, tx_hash: &H256) -> RPCResult<Option<Transaction>> {
        self.call("eth_getTransactionByHash", vec![tx_hash]).await
    }

    /// Returns the receipt of a transaction by transaction hash.
    pub async fn eth_get_transaction_receipt(
        &self,
        tx_hash: &H256,
    ) -> RPCResult<Option<TransactionReceipt>> {
        self.call("eth_getTransactionReceipt", vec![tx_hash]).await
    }

    /// Poll `eth_getTransactionReceipt` until the transaction is included.
    ///
    /// There is no timeout, transport level retries and timeouts belong to the http client.
    pub async fn wait_for_receipt(
        &self,
        tx_hash: &H256,
        poll_interval: Duration,
    ) -> RPCResult<TransactionReceipt> {
        loop {
            if let Some(receipt) = self.eth_get_transaction_receipt(tx_hash).await? {
                log::debug!(
                    target: "json-rpc",
                    "tx {} included in block {:?}",
                    tx_hash,
                    receipt.block_number.as_ref().map(ToString::to_string)
                );

                return Ok(receipt);
            }

            log::trace!(target: "json-rpc", "tx {} pending", tx_hash);

            tokio::time::sleep(poll_interval).await;
        }
    }
}
