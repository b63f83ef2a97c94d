use ethers_primitives::{Address, Bytes, H256, U256};
use serde::{Deserialize, Serialize};

/// `eth_sendTransaction`/`eth_estimateGas` transaction object, signed by the node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// `None` for contract creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// Transferring native token values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// Gas limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
}

/// Transaction object returned by `eth_getTransactionByHash`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: H256,
    pub from: Address,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default)]
    pub value: Option<U256>,
    /// Gas limit
    pub gas: U256,
    /// Missing for eip1559 transactions on some nodes.
    #[serde(default)]
    pub gas_price: Option<U256>,
    #[serde(default)]
    pub block_number: Option<U256>,
}

/// Receipt returned by `eth_getTransactionReceipt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: H256,
    #[serde(default)]
    pub block_number: Option<U256>,
    #[serde(default)]
    pub contract_address: Option<Address>,
    #[serde(default)]
    pub gas_used: Option<U256>,
    #[serde(default)]
    pub effective_gas_price: Option<U256>,
    /// `0x1` success, `0x0` failure. Pre-byzantium receipts have no status.
    #[serde(default)]
    pub status: Option<U256>,
}

impl TransactionReceipt {
    /// Returns false only if the receipt reports a failed (reverted) execution.
    pub fn is_success(&self) -> bool {
        self.status.as_ref().map(|s| !s.is_zero()).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_json() {
        let tx = TransactionRequest {
            from: Some(
                "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
                    .parse()
                    .unwrap(),
            ),
            data: Some(vec![0x60, 0x80].into()),
            value: Some(U256::from(1u64)),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&tx).unwrap(),
            serde_json::json!({
                "from": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
                "data": "0x6080",
                "value": "0x1",
            })
        );
    }

    #[test]
    fn test_receipt_json() {
        let receipt: TransactionReceipt = serde_json::from_value(serde_json::json!({
            "transactionHash": "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
            "blockNumber": "0x2",
            "contractAddress": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
            "gasUsed": "0x5208",
            "status": "0x1",
            "logs": []
        }))
        .unwrap();

        assert!(receipt.is_success());
        assert_eq!(receipt.gas_used, Some(U256::from(21000u64)));

        let failed = TransactionReceipt {
            status: Some(U256::zero()),
            ..receipt
        };

        assert!(!failed.is_success());
    }

    #[test]
    fn test_transaction_json() {
        let tx: Transaction = serde_json::from_value(serde_json::json!({
            "hash": "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
            "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "to": null,
            "gas": "0x1c9c380",
            "gasPrice": "0x77359400",
            "nonce": "0x0"
        }))
        .unwrap();

        assert_eq!(tx.gas, U256::from(30_000_000u64));
        assert_eq!(tx.gas_price, Some(U256::from(2_000_000_000u64)));
        assert!(tx.to.is_none());
    }
}
