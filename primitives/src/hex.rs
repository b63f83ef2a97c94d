//! ethereum hex string serialize/deserialize supporting,
//! generally ethereum hex string start with **"0x"**
//!
//! Also, this mod reexport types from crate [`hex`] .

pub use hex::*;

/// The marker every ethereum hex string starts with.
pub const ETH_HEX_MARKER: &str = "0x";

/// Implement this trait to support serialize `type` to ethereum hex string, "0x..."
pub trait ToEtherHex {
    fn to_eth_hex(&self) -> String;
}

impl<T: ToHex> ToEtherHex for T {
    fn to_eth_hex(&self) -> String {
        format!("{}{}", ETH_HEX_MARKER, self.encode_hex::<String>())
    }
}

/// Implement this trait to support deserialize `type` from ethereum hex string, "0x..."
pub trait FromEtherHex: Sized {
    type Error;
    fn from_eth_hex<T: AsRef<str>>(t: T) -> Result<Self, Self::Error>;
}

impl<T: FromHex> FromEtherHex for T {
    type Error = T::Error;

    fn from_eth_hex<S: AsRef<str>>(t: S) -> Result<Self, Self::Error> {
        let t = t.as_ref();

        Self::from_hex(strip_eth_hex_marker(t).unwrap_or(t))
    }
}

/// Returns the payload of an ethereum hex string, or `None` if `value` does not
/// start with [`ETH_HEX_MARKER`].
pub fn strip_eth_hex_marker(value: &str) -> Option<&str> {
    value
        .strip_prefix(ETH_HEX_MARKER)
        .or_else(|| value.strip_prefix("0X"))
}
