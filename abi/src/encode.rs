use num::{BigInt, BigUint, Signed};

use crate::Token;

/// followed by the minimum number of zero-bytes such that `len(bytes)` is a multiple of 32
fn padding_right(mut bytes: Vec<u8>) -> Vec<u8> {
    let padding_zeros = 32 - bytes.len() % 32;

    if padding_zeros != 32 {
        bytes.append(&mut vec![0u8; padding_zeros]);
    }

    bytes
}

fn encode_usize(value: usize) -> [u8; 32] {
    encode_uint(&BigUint::from(value))
}

/// Big-endian, left padded to 32 bytes. Only the low 256 bits are kept.
fn encode_uint(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();

    let bytes = &bytes[bytes.len().saturating_sub(32)..];

    let mut buff = [0u8; 32];

    buff[32 - bytes.len()..].copy_from_slice(bytes);

    buff
}

/// Two's complement 256 bits representation.
fn encode_int(value: &BigInt) -> [u8; 32] {
    if value.is_negative() {
        let complement: BigInt = (BigInt::from(1u8) << 256) + value;

        encode_uint(&complement.to_biguint().unwrap_or_default())
    } else {
        encode_uint(&value.to_biguint().unwrap_or_default())
    }
}

/// `len(bytes)` encoded as uint256 followed by the right padded bytes.
fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut buff = encode_usize(bytes.len()).to_vec();

    buff.append(&mut padding_right(bytes.to_vec()));

    buff
}

/// Encode `tokens` as the elements of one tuple: static values are stored in
/// the head, dynamic values are stored in the tail and referenced by offset.
fn encode_sequence(tokens: &[Token]) -> Vec<u8> {
    let encoded: Vec<Vec<u8>> = tokens.iter().map(encode_token).collect();

    let heads_len: usize = tokens
        .iter()
        .zip(encoded.iter())
        .map(|(token, data)| if token.is_dynamic() { 32 } else { data.len() })
        .sum();

    let mut heads = Vec::with_capacity(heads_len);
    let mut tails = vec![];

    for (token, mut data) in tokens.iter().zip(encoded.into_iter()) {
        if token.is_dynamic() {
            heads.extend_from_slice(&encode_usize(heads_len + tails.len()));

            tails.append(&mut data);
        } else {
            heads.append(&mut data);
        }
    }

    heads.append(&mut tails);

    heads
}

fn encode_token(token: &Token) -> Vec<u8> {
    match token {
        Token::Address(address) => address.to_word().to_vec(),
        Token::Bool(b) => encode_usize(*b as usize).to_vec(),
        Token::Uint(value) => encode_uint(value).to_vec(),
        Token::Int(value) => encode_int(value).to_vec(),
        Token::FixedBytes(bytes) => {
            let mut buff = [0u8; 32];

            let len = bytes.len().min(32);

            buff[..len].copy_from_slice(&bytes[..len]);

            buff.to_vec()
        }
        Token::Bytes(bytes) => encode_bytes(bytes),
        Token::String(s) => encode_bytes(s.as_bytes()),
        Token::Array(items) => {
            let mut buff = encode_usize(items.len()).to_vec();

            buff.append(&mut encode_sequence(items));

            buff
        }
        Token::FixedArray(items) | Token::Tuple(items) => encode_sequence(items),
    }
}

/// Abi encode `tokens` as function/constructor arguments.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    encode_sequence(tokens)
}
