//! Deploy hardhat compiled contracts through a json-rpc node, record their
//! addresses and constructor args, and verify them on tenderly.

pub use ethers_abi as abi;
pub use ethers_hardhat as hardhat;
pub use ethers_primitives as primitives;
pub use ethers_provider as providers;

pub mod assets;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod gas;
pub mod orchestrator;
pub mod plan;
pub mod registry;
pub mod store;
pub mod tenderly;
pub mod verify;

mod contract;
pub use contract::*;

pub use error::*;
