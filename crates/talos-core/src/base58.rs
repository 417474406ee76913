//! Base58 with the Bitcoin alphabet.
//!
//! The input is read as a big-endian unsigned integer and repeatedly divided
//! by 58; the remainders, reversed, are the digits. Each leading zero byte of
//! the input then contributes one leading `'1'`, prepended to the already
//! reversed digits. An all-zero input of length N encodes to N `'1'`s.

use crate::error::Base58Error;

/// The Bitcoin base58 alphabet (no `0`, `O`, `I`, `l`).
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Encode bytes to base58.
pub fn encode(input: &[u8]) -> String {
    let zeros = input.iter().take_while(|&&b| b == 0).count();

    // Long division of the big-endian magnitude, one byte at a time.
    let mut number = input[zeros..].to_vec();
    let mut digits = Vec::with_capacity(input.len() * 138 / 100 + 1);
    while !number.is_empty() {
        let mut remainder = 0u32;
        let mut quotient = Vec::with_capacity(number.len());
        for &byte in &number {
            let acc = (remainder << 8) | u32::from(byte);
            let q = acc / 58;
            remainder = acc % 58;
            if !quotient.is_empty() || q != 0 {
                quotient.push(q as u8);
            }
        }
        digits.push(ALPHABET[remainder as usize]);
        number = quotient;
    }
    digits.reverse();

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat(ALPHABET[0] as char).take(zeros));
    out.extend(digits.into_iter().map(char::from));
    out
}

/// Decode base58 back to bytes.
pub fn decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    // Little-endian accumulator, reversed at the end.
    let mut bytes: Vec<u8> = Vec::new();
    for (index, character) in s.chars().enumerate() {
        let digit = ALPHABET
            .iter()
            .position(|&c| char::from(c) == character)
            .ok_or(Base58Error::InvalidCharacter { character, index })?;

        let mut carry = digit as u32;
        for byte in bytes.iter_mut() {
            carry += u32::from(*byte) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let zeros = s.chars().take_while(|&c| c == char::from(ALPHABET[0])).count();
    bytes.extend(std::iter::repeat(0).take(zeros));
    bytes.reverse();
    Ok(bytes)
}
