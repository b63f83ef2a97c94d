//! Constructor arguments encoding, as expected by block explorers and
//! verification services.

use ethers_abi::{AbiError, Constructor, Token};
use serde_json::Value;

use crate::DeployedContract;

/// Abi encode `args` with the constructor parameter types of `deployed`.
///
/// Returns empty bytes if `args` is empty or the contract declares no constructor.
pub fn encode_constructor_args(
    deployed: &DeployedContract,
    args: &[Value],
) -> Result<Vec<u8>, AbiError> {
    if args.is_empty() {
        log::debug!(target: "codec", "{} deployed without constructor args", deployed.name);
        return Ok(vec![]);
    }

    match deployed.interface.constructor() {
        Some(constructor) => constructor.encode_args(args),
        None => {
            log::debug!(target: "codec", "{} has no constructor, skip args encoding", deployed.name);
            Ok(vec![])
        }
    }
}

/// Decode constructor args encoded by [`encode_constructor_args`].
pub fn decode_constructor_args(
    constructor: &Constructor,
    data: &[u8],
) -> Result<Vec<Token>, AbiError> {
    constructor.decode_args(data)
}
