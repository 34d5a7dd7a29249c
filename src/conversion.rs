//! Octet and address format conversion.
//!
//! Pure helpers converting between decimal octet strings, 8-bit binary
//! strings and dotted-decimal addresses, plus the power-of-two rounding
//! used to size subnet blocks.

use crate::error::{Result, SubnetError};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DOTTED_QUAD: Regex =
        Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})$")
            .expect("Invalid Regex?");
}

/// Convert a decimal octet string to a zero-padded 8-bit binary string.
///
/// # Examples
/// ```
/// use classful_subnet::conversion::to_binary;
/// assert_eq!(to_binary("4").unwrap(), "00000100");
/// ```
pub fn to_binary(decimal: &str) -> Result<String> {
    let octet = parse_octet(decimal)?;
    Ok(format!("{octet:08b}"))
}

/// Convert an 8-digit binary octet string back to its decimal string.
pub fn to_decimal(binary: &str) -> Result<String> {
    if binary.len() != 8 || !binary.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(SubnetError::InvalidBinary(binary.to_string()));
    }
    let octet =
        u8::from_str_radix(binary, 2).map_err(|_| SubnetError::InvalidBinary(binary.to_string()))?;
    Ok(octet.to_string())
}

/// Format four octets as a dotted-decimal address.
///
/// The octet range is enforced by the `u8` type, so this cannot fail.
pub fn ip_to_string(a: u8, b: u8, c: u8, d: u8) -> String {
    format!("{a}.{b}.{c}.{d}")
}

/// Split a dotted-decimal address into four 8-bit binary octet strings.
pub fn ip_to_binary(address: &str) -> Result<[String; 4]> {
    let octets = parse_octets(address)?;
    Ok(octets.map(|octet| format!("{octet:08b}")))
}

/// Format an address in dotted 8-bit binary, the classic teaching notation
/// (`192.168.2.1` becomes `11000000.10101000.00000010.00000001`).
pub fn ip_to_binary_string(address: &str) -> Result<String> {
    Ok(ip_to_binary(address)?.iter().join("."))
}

/// Round up to the smallest power of two >= `n`.
///
/// Subnetting arithmetic only operates on power-of-two block sizes, so a
/// requested subnet or host count is rounded up before bits are resolved.
/// 0 and 1 both round to 1.
pub fn round_to_power_of_two(n: u64) -> u64 {
    n.next_power_of_two()
}

/// Parse a dotted-decimal address into its four octets.
///
/// Leading zeros are accepted (`255.255.224.000` is the dotted-quad
/// tradition); a sign or any non-digit is not.
pub fn parse_octets(address: &str) -> Result<[u8; 4]> {
    let captures = DOTTED_QUAD
        .captures(address.trim())
        .ok_or_else(|| SubnetError::InvalidAddress(address.to_string()))?;

    let mut octets = [0u8; 4];
    for (i, octet) in octets.iter_mut().enumerate() {
        *octet = parse_octet(&captures[i + 1])?;
    }
    Ok(octets)
}

fn parse_octet(text: &str) -> Result<u8> {
    if text.is_empty() || text.len() > 3 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SubnetError::InvalidOctet(text.to_string()));
    }
    text.parse::<u8>()
        .map_err(|_| SubnetError::InvalidOctet(text.to_string()))
}
