//! Primitives shared by the abi codec, the rpc provider and the deployer.

mod address;
pub use address::*;

mod bytes;
pub use self::bytes::*;

mod hash;
pub use hash::*;

mod int;
pub use int::*;

pub mod hex;
pub use self::hex::*;

mod unit;
pub use unit::*;
