use std::fmt::Display;

use ethers_primitives::{format_ether, H256, U256};

use crate::DeployTransaction;

/// Upper bound cost of a deploy transaction, `gas_limit * gas_price`.
#[derive(Debug, Clone, PartialEq)]
pub struct GasReport {
    pub cost: U256,
    pub transaction_hash: H256,
}

impl GasReport {
    /// Returns `None` if the transaction or one of its gas fields is unavailable.
    pub fn from_transaction(tx: Option<&DeployTransaction>) -> Option<Self> {
        let tx = tx?;

        let gas_limit = tx.gas_limit.as_ref()?;
        let gas_price = tx.gas_price.as_ref()?;

        Some(Self {
            cost: gas_limit * gas_price,
            transaction_hash: tx.hash,
        })
    }
}

impl Display for GasReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ETH, tx hash {}",
            format_ether(&self.cost),
            self.transaction_hash
        )
    }
}

/// Human readable gas cost of `tx`, empty string if unknown.
pub fn describe(tx: Option<&DeployTransaction>) -> String {
    GasReport::from_transaction(tx)
        .map(|report| report.to_string())
        .unwrap_or_default()
}
