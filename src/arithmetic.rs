//! Octet-wise address arithmetic.
//!
//! ANDing an address with a subnet mask yields the network address; ORing
//! a network address with the inverted mask yields the last address in the
//! block. Both operate on dotted-decimal strings, the calculator's external
//! format.

use crate::conversion::{ip_to_string, parse_octets};
use crate::error::Result;

/// Octet-wise bitwise AND of two addresses.
///
/// # Examples
/// ```
/// use classful_subnet::arithmetic::and;
/// assert_eq!(and("140.179.220.200", "255.255.224.0").unwrap(), "140.179.192.0");
/// ```
pub fn and(ip1: &str, ip2: &str) -> Result<String> {
    log::trace!("and({ip1}, {ip2})");
    let lhs = parse_octets(ip1)?;
    let rhs = parse_octets(ip2)?;
    Ok(ip_to_string(
        lhs[0] & rhs[0],
        lhs[1] & rhs[1],
        lhs[2] & rhs[2],
        lhs[3] & rhs[3],
    ))
}

/// Broadcast address of the block: `network OR (NOT mask)`, octet-wise.
///
/// The network operand is ANDed with the mask first, so passing a host
/// address instead of a network address still lands on the right block.
pub fn broadcast(network: &str, mask: &str) -> Result<String> {
    log::trace!("broadcast({network}, {mask})");
    let net = parse_octets(network)?;
    let mask = parse_octets(mask)?;
    Ok(ip_to_string(
        (net[0] & mask[0]) | !mask[0],
        (net[1] & mask[1]) | !mask[1],
        (net[2] & mask[2]) | !mask[2],
        (net[3] & mask[3]) | !mask[3],
    ))
}
