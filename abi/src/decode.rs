use bytes::Bytes;
use ethers_primitives::Address;
use num::{BigInt, BigUint};

use crate::{token::int_in_range, AbiError, ParamType, Token};

fn read_word(buff: &Bytes, offset: usize) -> Result<[u8; 32], AbiError> {
    let end = offset
        .checked_add(32)
        .ok_or_else(|| AbiError::InsufficentInputs(format!("Read word at {}", offset)))?;

    if end > buff.len() {
        return Err(AbiError::InsufficentInputs(format!(
            "Read word at {}, buff length {}",
            offset,
            buff.len()
        )));
    }

    let mut word = [0u8; 32];

    word.copy_from_slice(&buff[offset..end]);

    Ok(word)
}

fn read_usize(buff: &Bytes, offset: usize) -> Result<usize, AbiError> {
    let word = read_word(buff, offset)?;

    if word[..24].iter().any(|b| *b != 0) {
        return Err(AbiError::InvalidData(format!("offset/length at {}", offset)));
    }

    let mut low = [0u8; 8];

    low.copy_from_slice(&word[24..]);

    usize::try_from(u64::from_be_bytes(low))
        .map_err(|_| AbiError::InvalidData(format!("offset/length at {}", offset)))
}

fn tail(buff: &Bytes, offset: usize) -> Result<Bytes, AbiError> {
    if offset > buff.len() {
        return Err(AbiError::InsufficentInputs(format!(
            "Tail offset {}, buff length {}",
            offset,
            buff.len()
        )));
    }

    Ok(buff.slice(offset..))
}

fn decode_sequence(types: &[ParamType], buff: &Bytes) -> Result<Vec<Token>, AbiError> {
    let mut tokens = Vec::with_capacity(types.len());

    let mut head = 0;

    for param in types {
        if param.is_dynamic() {
            let offset = read_usize(buff, head)?;

            tokens.push(decode_param(param, &tail(buff, offset)?)?);
        } else {
            tokens.push(decode_param(param, &tail(buff, head)?)?);
        }

        head += param.head_size();
    }

    Ok(tokens)
}

fn decode_bytes(buff: &Bytes) -> Result<Vec<u8>, AbiError> {
    let len = read_usize(buff, 0)?;

    let end = len
        .checked_add(32)
        .filter(|end| *end <= buff.len())
        .ok_or_else(|| {
            AbiError::InsufficentInputs(format!("Read {} bytes, buff length {}", len, buff.len()))
        })?;

    Ok(buff[32..end].to_vec())
}

fn decode_param(param: &ParamType, buff: &Bytes) -> Result<Token, AbiError> {
    match param {
        ParamType::Address => {
            let word = read_word(buff, 0)?;

            if word[..12].iter().any(|b| *b != 0) {
                return Err(AbiError::InvalidData(param.to_string()));
            }

            let mut address = Address::zero_address();

            address.0.copy_from_slice(&word[12..]);

            Ok(Token::Address(address))
        }
        ParamType::Bool => match read_usize(buff, 0)? {
            0 => Ok(Token::Bool(false)),
            1 => Ok(Token::Bool(true)),
            _ => Err(AbiError::InvalidData(param.to_string())),
        },
        ParamType::Uint(bits) => {
            let value = BigUint::from_bytes_be(&read_word(buff, 0)?);

            if value.bits() > *bits as u64 {
                return Err(AbiError::InvalidData(param.to_string()));
            }

            Ok(Token::Uint(value))
        }
        ParamType::Int(bits) => {
            let word = read_word(buff, 0)?;

            let mut value = BigInt::from(BigUint::from_bytes_be(&word));

            if word[0] & 0x80 != 0 {
                value -= BigInt::from(1u8) << 256;
            }

            if !int_in_range(&value, *bits) {
                return Err(AbiError::InvalidData(param.to_string()));
            }

            Ok(Token::Int(value))
        }
        ParamType::FixedBytes(len) => {
            let word = read_word(buff, 0)?;

            Ok(Token::FixedBytes(word[..*len].to_vec()))
        }
        ParamType::Bytes => Ok(Token::Bytes(decode_bytes(buff)?)),
        ParamType::String => {
            let bytes = decode_bytes(buff)?;

            String::from_utf8(bytes)
                .map(Token::String)
                .map_err(|_| AbiError::InvalidData(param.to_string()))
        }
        ParamType::Array(inner) => {
            let len = read_usize(buff, 0)?;

            let items = tail(buff, 32)?;

            // reject lengths the remaining buffer can not hold before allocating
            if len
                .checked_mul(inner.head_size())
                .map_or(true, |size| size > items.len())
            {
                return Err(AbiError::InsufficentInputs(format!(
                    "{} items of {}",
                    len, inner
                )));
            }

            let types = vec![inner.as_ref().clone(); len];

            Ok(Token::Array(decode_sequence(&types, &items)?))
        }
        ParamType::FixedArray(inner, len) => {
            let types = vec![inner.as_ref().clone(); *len];

            Ok(Token::FixedArray(decode_sequence(&types, buff)?))
        }
        ParamType::Tuple(members) => Ok(Token::Tuple(decode_sequence(members, buff)?)),
    }
}

/// Abi decode `data` as a sequence of `types`.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let buff = Bytes::copy_from_slice(data);

    decode_sequence(types, &buff)
}
