use ethers_primitives::{strip_eth_hex_marker, Address, FromEtherHex};
use num::{BigInt, BigUint, Num};
use serde_json::Value;

use crate::{token::int_in_range, AbiError, ParamType, Token};

/// Build [`Token`] values for `params` from json `values`.
///
/// Returns [`AbiError::Arity`] if the number of values does not match.
pub fn tokenize_all(params: &[ParamType], values: &[Value]) -> Result<Vec<Token>, AbiError> {
    if params.len() != values.len() {
        return Err(AbiError::Arity {
            expect: params.len(),
            got: values.len(),
        });
    }

    params
        .iter()
        .zip(values.iter())
        .map(|(param, value)| tokenize(param, value))
        .collect()
}

/// Build one [`Token`] of type `param` from json `value`.
///
/// Integers are accepted as json numbers, decimal strings or `0x` hex strings,
/// `bytes`/`bytes<M>` as `0x` hex strings and tuples as json arrays.
pub fn tokenize(param: &ParamType, value: &Value) -> Result<Token, AbiError> {
    match param {
        ParamType::Address => {
            let s = value
                .as_str()
                .ok_or_else(|| AbiError::invalid_value(param, value))?;

            let address: Address = s.parse().map_err(|_| AbiError::invalid_value(param, s))?;

            Ok(Token::Address(address))
        }
        ParamType::Bool => value
            .as_bool()
            .map(Token::Bool)
            .ok_or_else(|| AbiError::invalid_value(param, value)),
        ParamType::String => value
            .as_str()
            .map(|s| Token::String(s.to_owned()))
            .ok_or_else(|| AbiError::invalid_value(param, value)),
        ParamType::Bytes => Ok(Token::Bytes(parse_hex_data(param, value)?)),
        ParamType::FixedBytes(len) => {
            let bytes = parse_hex_data(param, value)?;

            if bytes.len() != *len {
                return Err(AbiError::invalid_value(param, value));
            }

            Ok(Token::FixedBytes(bytes))
        }
        ParamType::Uint(bits) => {
            let number = parse_integer(param, value)?;

            let number = number
                .to_biguint()
                .ok_or_else(|| AbiError::out_of_range(param, value))?;

            if number.bits() > *bits as u64 {
                return Err(AbiError::out_of_range(param, value));
            }

            Ok(Token::Uint(number))
        }
        ParamType::Int(bits) => {
            let number = parse_integer(param, value)?;

            if !int_in_range(&number, *bits) {
                return Err(AbiError::out_of_range(param, value));
            }

            Ok(Token::Int(number))
        }
        ParamType::Array(inner) => {
            let items = value
                .as_array()
                .ok_or_else(|| AbiError::invalid_value(param, value))?;

            Ok(Token::Array(
                items
                    .iter()
                    .map(|item| tokenize(inner, item))
                    .collect::<Result<Vec<_>, _>>()?,
            ))
        }
        ParamType::FixedArray(inner, len) => {
            let items = value
                .as_array()
                .ok_or_else(|| AbiError::invalid_value(param, value))?;

            if items.len() != *len {
                return Err(AbiError::Arity {
                    expect: *len,
                    got: items.len(),
                });
            }

            Ok(Token::FixedArray(
                items
                    .iter()
                    .map(|item| tokenize(inner, item))
                    .collect::<Result<Vec<_>, _>>()?,
            ))
        }
        ParamType::Tuple(members) => {
            let items = value
                .as_array()
                .ok_or_else(|| AbiError::invalid_value(param, value))?;

            Ok(Token::Tuple(tokenize_all(members, items)?))
        }
    }
}

fn parse_hex_data(param: &ParamType, value: &Value) -> Result<Vec<u8>, AbiError> {
    let s = value
        .as_str()
        .ok_or_else(|| AbiError::invalid_value(param, value))?;

    if strip_eth_hex_marker(s).is_none() {
        return Err(AbiError::invalid_value(param, s));
    }

    Vec::<u8>::from_eth_hex(s).map_err(|_| AbiError::invalid_value(param, s))
}

fn parse_integer(param: &ParamType, value: &Value) -> Result<BigInt, AbiError> {
    match value {
        Value::Number(n) => {
            if let Some(n) = n.as_u64() {
                Ok(BigInt::from(n))
            } else if let Some(n) = n.as_i64() {
                Ok(BigInt::from(n))
            } else {
                Err(AbiError::invalid_value(param, value))
            }
        }
        Value::String(s) => {
            let (negative, digits) = match s.strip_prefix('-') {
                Some(digits) => (true, digits),
                None => (false, s.as_str()),
            };

            let magnitude = match strip_eth_hex_marker(digits) {
                Some(hex) => BigUint::from_str_radix(hex, 16),
                None => BigUint::from_str_radix(digits, 10),
            }
            .map_err(|_| AbiError::invalid_value(param, s))?;

            let number = BigInt::from(magnitude);

            Ok(if negative { -number } else { number })
        }
        _ => Err(AbiError::invalid_value(param, value)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(
            tokenize(&ParamType::Uint(256), &json!(5)).unwrap(),
            Token::Uint(BigUint::from(5u8))
        );
        assert_eq!(
            tokenize(&ParamType::Uint(256), &json!("0x10")).unwrap(),
            Token::Uint(BigUint::from(16u8))
        );
        assert_eq!(
            tokenize(&ParamType::Uint(256), &json!("1000000000000000000000")).unwrap(),
            Token::Uint("1000000000000000000000".parse::<BigUint>().unwrap())
        );
        assert_eq!(
            tokenize(&ParamType::Int(16), &json!(-300)).unwrap(),
            Token::Int(BigInt::from(-300))
        );
        assert_eq!(
            tokenize(&ParamType::Int(256), &json!("-0x01")).unwrap(),
            Token::Int(BigInt::from(-1))
        );

        tokenize(&ParamType::Uint(8), &json!(256)).expect_err("uint8 overflow");
        tokenize(&ParamType::Uint(256), &json!(-1)).expect_err("Negative uint");
        tokenize(&ParamType::Uint(256), &json!(1.5)).expect_err("Float");
        tokenize(&ParamType::Uint(256), &json!("five")).expect_err("Not a number");
        tokenize(&ParamType::Uint(256), &json!(true)).expect_err("Bool is not a number");
    }

    #[test]
    fn test_tokenize_values() {
        assert_eq!(
            tokenize(
                &ParamType::Address,
                &json!("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359")
            )
            .unwrap(),
            Token::Address("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359".parse().unwrap())
        );

        tokenize(&ParamType::Address, &json!(5)).expect_err("Number is not an address");
        tokenize(&ParamType::Address, &json!("0x1234")).expect_err("Short address");

        assert_eq!(
            tokenize(&ParamType::Bytes, &json!("0x0102")).unwrap(),
            Token::Bytes(vec![1, 2])
        );

        tokenize(&ParamType::Bytes, &json!("0102")).expect_err("Bytes without marker");
        tokenize(&ParamType::FixedBytes(4), &json!("0x0102")).expect_err("Length mismatch");

        assert_eq!(
            tokenize(&ParamType::String, &json!("gm")).unwrap(),
            Token::String("gm".to_owned())
        );
    }

    #[test]
    fn test_tokenize_all() {
        let params = vec![ParamType::Address, ParamType::Uint(256)];

        let tokens = tokenize_all(
            &params,
            &[json!("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359"), json!(5)],
        )
        .unwrap();

        assert_eq!(tokens.len(), 2);

        match tokenize_all(&params, &[json!(5)]) {
            Err(AbiError::Arity { expect: 2, got: 1 }) => {}
            other => panic!("expect arity error, got {:?}", other),
        }

        tokenize_all(&params, &[json!(5), json!(5)]).expect_err("Type mismatch");
    }

    #[test]
    fn test_tokenize_nested() {
        let param = ParamType::Array(Box::new(ParamType::Tuple(vec![
            ParamType::Bool,
            ParamType::FixedArray(Box::new(ParamType::Uint(8)), 2),
        ])));

        let token = tokenize(&param, &json!([[true, [1, 2]], [false, [3, 4]]])).unwrap();

        assert!(token.type_check(&param));

        tokenize(&param, &json!([[true, [1, 2, 3]]])).expect_err("Fixed array length");
    }
}
