//! Contract abi support for the deployer.
//!
//! * [`ParamType`] parameter types parsed from hardhat/solc abi json.
//! * [`Token`] typed values, built from json values by [`tokenize`].
//! * [`encode`]/[`decode`] the solidity [`abi`](https://docs.soliditylang.org/en/v0.8.17/abi-spec.html) format.

mod error;
pub use error::*;

mod param;
pub use param::*;

mod token;
pub use token::*;

mod tokenize;
pub use tokenize::*;

mod encode;
pub use encode::*;

mod decode;
pub use decode::*;

mod contract;
pub use contract::*;
