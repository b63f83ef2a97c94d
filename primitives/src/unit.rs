use num::BigUint;

use crate::U256;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UnitError {
    #[error("Parse ethereum unit from decimal string literal failed. {0}")]
    ParseDecimalString(String),

    #[error("Fractional component exceeds {1} decimals, {0}")]
    Decimals(String, u32),
}

/// Decimals of ether unit.
pub const ETHER_DECIMALS: u32 = 18;

/// Format `value` as a decimal string with `decimals` fractional digits,
/// trailing zeros are trimmed but at least one fractional digit is kept.
pub fn format_units(value: &BigUint, decimals: u32) -> String {
    let digits = value.to_string();

    let decimals = decimals as usize;

    let (whole, fraction) = if digits.len() > decimals {
        let (whole, fraction) = digits.split_at(digits.len() - decimals);
        (whole.to_owned(), fraction.to_owned())
    } else {
        ("0".to_owned(), format!("{:0>width$}", digits, width = decimals))
    };

    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Format wei value as ether string, e.g `0.0123`
pub fn format_ether(value: &U256) -> String {
    format_units(&value.0, ETHER_DECIMALS)
}

/// Parse decimal string `value` into base unit with `decimals` fractional digits.
pub fn parse_units(value: &str, decimals: u32) -> Result<U256, UnitError> {
    let value = value.trim();

    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (value, ""),
    };

    if (whole.is_empty() && fraction.is_empty())
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(UnitError::ParseDecimalString(value.to_owned()));
    }

    if fraction.len() > decimals as usize {
        return Err(UnitError::Decimals(value.to_owned(), decimals));
    }

    let digits = format!(
        "{}{:0<width$}",
        whole,
        fraction,
        width = decimals as usize
    );

    let digits = digits.trim_start_matches('0');

    let units = if digits.is_empty() {
        BigUint::from(0u8)
    } else {
        digits
            .parse::<BigUint>()
            .map_err(|_| UnitError::ParseDecimalString(value.to_owned()))?
    };

    U256::new(units).map_err(|_| UnitError::ParseDecimalString(value.to_owned()))
}

/// Parse ether decimal string into wei, e.g `"0.05"`
pub fn parse_ether(value: &str) -> Result<U256, UnitError> {
    parse_units(value, ETHER_DECIMALS)
}
