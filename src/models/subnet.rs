//! The subnet descriptor engine.
//!
//! A [`Subnet`] holds an IPv4 address plus one resolved subnetting
//! parameter. Network engineers think in whichever unit is convenient
//! (mask, prefix length, subnet count or host count), so every transition
//! normalizes its input to the canonical pair (natural mask bits, borrowed
//! subnet bits) and fans back out through one shared derivation routine.
//!
//! Transitions never mutate in place: each returns a new fully-derived
//! snapshot, so a failed transition leaves the receiver untouched and no
//! observer can ever see a partially recomputed descriptor.

use crate::conversion::{parse_octets, round_to_power_of_two};
use crate::error::{Result, SubnetError};
use crate::models::NetworkClass;
use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Longest prefix the engine will derive. A /31 or /32 leaves no room for
/// the reserved network and broadcast addresses.
pub const MAX_MASKED_BITS: u8 = 30;

/// Counting convention for usable subnets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum UsableSubnetsPolicy {
    /// RFC 950 convention: the all-zeros and all-ones subnets are reserved
    /// whenever bits have been borrowed. At zero borrowed bits the single
    /// natural network is fully usable.
    #[default]
    ExcludeFirstAndLast,
    /// Count every subnet as usable.
    CountAll,
}

/// Derived subnetting facts. Always internally consistent: a layout only
/// exists as the output of the shared derivation routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubnetLayout {
    /// Total prefix length: natural mask bits plus borrowed bits.
    pub masked_bits: u8,
    /// The mask, `masked_bits` leading ones.
    pub subnet_mask: Ipv4Addr,
    /// 2^subnet_bits.
    pub total_subnets: u64,
    /// Subnet count under the active [`UsableSubnetsPolicy`].
    pub usable_subnets: u64,
    /// 2^(32 - masked_bits), the full block size.
    pub total_hosts: u64,
    /// Block size minus the network and broadcast addresses.
    pub usable_hosts: u64,
    /// Network address: address AND mask.
    pub subnet_address: Ipv4Addr,
    /// Last address of the block: network OR NOT mask.
    pub broadcast_address: Ipv4Addr,
    /// First assignable host address.
    pub minimum_host_address: Ipv4Addr,
    /// Last assignable host address.
    pub maximum_host_address: Ipv4Addr,
    /// Address-space stride between successive subnets.
    pub network_increment: u64,
}

/// Subnet descriptor: an address, its class, and the authoritative number
/// of borrowed subnet bits, with every dependent attribute derived into
/// [`SubnetLayout`].
///
/// `subnet_bits` is the durable quantity across address changes: moving a
/// /19 descriptor (class B, 3 borrowed bits) onto a class C address
/// re-derives it as a /27.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subnet {
    /// The IPv4 address.
    pub address: Ipv4Addr,
    /// Classful category of `address`.
    pub class: NetworkClass,
    /// Bits borrowed from the host portion, authoritative across
    /// transitions.
    pub subnet_bits: u8,
    /// Active usable-subnets counting convention.
    pub policy: UsableSubnetsPolicy,
    /// Derived facts; `None` for class D/E addresses, which carry no
    /// natural mask.
    pub layout: Option<SubnetLayout>,
}

impl Subnet {
    /// Parse and classify `address`. Classes A-C start at the natural
    /// network (zero borrowed bits) with a full layout; classes D and E
    /// carry no layout.
    pub fn new(address: &str) -> Result<Subnet> {
        let seed = Subnet {
            address: Ipv4Addr::UNSPECIFIED,
            class: NetworkClass::A,
            subnet_bits: 0,
            policy: UsableSubnetsPolicy::default(),
            layout: None,
        };
        seed.with_address(address)
    }

    /// Re-address the descriptor, re-classifying and re-deriving.
    ///
    /// The borrowed `subnet_bits` survive the move and are re-applied
    /// against the new class's natural mask. Moving onto a class D/E
    /// address drops the layout; moving back re-derives from the retained
    /// bits.
    pub fn with_address(&self, address: &str) -> Result<Subnet> {
        let parsed = Ipv4Addr::from(parse_octets(address)?);
        let class = NetworkClass::of(parsed);
        log::debug!(
            "with_address({parsed}): class {class}, retaining {} borrowed bits",
            self.subnet_bits
        );

        let layout = if class.default_mask_bits().is_some() {
            Some(derive(parsed, class, self.subnet_bits, self.policy)?)
        } else {
            if self.layout.is_some() {
                log::warn!("{parsed} is class {class}; dropping the derived subnet layout");
            }
            None
        };

        Ok(Subnet {
            address: parsed,
            class,
            layout,
            ..*self
        })
    }

    /// Resubnet from a dotted-decimal mask.
    ///
    /// The mask must be a contiguous leading-ones prefix no shorter than
    /// the class's natural mask.
    pub fn with_subnet_mask(&self, mask: &str) -> Result<Subnet> {
        log::debug!("with_subnet_mask({mask})");
        let bits = u32::from(Ipv4Addr::from(parse_octets(mask)?));
        let ones = bits.count_ones() as u8;
        if bits != prefix_mask(ones) {
            return Err(SubnetError::InvalidMask(mask.to_string()));
        }

        let natural = self.natural_bits()?;
        let subnet_bits = ones.checked_sub(natural).ok_or_else(|| {
            SubnetError::InvalidMaskedBits(format!(
                "/{ones} is shorter than the class {} natural mask /{natural}",
                self.class
            ))
        })?;
        self.resubnet(subnet_bits)
    }

    /// Resubnet by borrowing `subnet_bits` bits from the host portion.
    pub fn with_subnet_bits(&self, subnet_bits: u8) -> Result<Subnet> {
        log::debug!("with_subnet_bits({subnet_bits})");
        self.resubnet(subnet_bits)
    }

    /// Resubnet to a total prefix length.
    pub fn with_masked_bits(&self, masked_bits: u8) -> Result<Subnet> {
        log::debug!("with_masked_bits({masked_bits})");
        let natural = self.natural_bits()?;
        let subnet_bits = masked_bits.checked_sub(natural).ok_or_else(|| {
            SubnetError::InvalidMaskedBits(format!(
                "/{masked_bits} is shorter than the class {} natural mask /{natural}",
                self.class
            ))
        })?;
        self.resubnet(subnet_bits)
    }

    /// Resubnet to hold at least `count` subnets, rounding up to the next
    /// power of two.
    pub fn with_total_subnets(&self, count: u64) -> Result<Subnet> {
        let rounded = round_to_power_of_two(count);
        let subnet_bits = rounded.trailing_zeros() as u8;
        log::debug!("with_total_subnets({count}): rounded to {rounded}, {subnet_bits} bits");
        self.resubnet(subnet_bits)
    }

    /// Resubnet so each subnet holds at least `count` host addresses,
    /// rounding up to the next power of two.
    pub fn with_total_hosts(&self, count: u64) -> Result<Subnet> {
        let natural = self.natural_bits()?;
        let rounded = round_to_power_of_two(count);
        let host_bits = i64::from(rounded.trailing_zeros());
        let subnet_bits = i64::from(MAX_LENGTH) - host_bits - i64::from(natural);
        log::debug!("with_total_hosts({count}): rounded to {rounded}, {host_bits} host bits");
        if subnet_bits < 0 {
            return Err(SubnetError::InvalidMaskedBits(format!(
                "a block of {rounded} hosts does not fit inside a class {} network",
                self.class
            )));
        }
        self.resubnet(subnet_bits as u8)
    }

    /// Switch the usable-subnets counting convention, re-deriving the
    /// layout under the new policy.
    pub fn with_usable_subnets_policy(&self, policy: UsableSubnetsPolicy) -> Result<Subnet> {
        let layout = match self.layout {
            Some(_) => Some(derive(self.address, self.class, self.subnet_bits, policy)?),
            None => None,
        };
        Ok(Subnet {
            policy,
            layout,
            ..*self
        })
    }

    fn natural_bits(&self) -> Result<u8> {
        self.class
            .default_mask_bits()
            .ok_or(SubnetError::UnsubnettableClass { class: self.class })
    }

    fn resubnet(&self, subnet_bits: u8) -> Result<Subnet> {
        let layout = derive(self.address, self.class, subnet_bits, self.policy)?;
        Ok(Subnet {
            subnet_bits,
            layout: Some(layout),
            ..*self
        })
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.layout {
            Some(layout) => write!(
                f,
                "{}/{} (class {}, {} subnets of {} hosts)",
                self.address,
                layout.masked_bits,
                self.class,
                layout.total_subnets,
                layout.total_hosts
            ),
            None => write!(f, "{} (class {}, not subnettable)", self.address, self.class),
        }
    }
}

/// The single derivation routine behind every transition: resolve the
/// canonical (natural bits, borrowed bits) pair into a full layout.
fn derive(
    address: Ipv4Addr,
    class: NetworkClass,
    subnet_bits: u8,
    policy: UsableSubnetsPolicy,
) -> Result<SubnetLayout> {
    let natural = class
        .default_mask_bits()
        .ok_or(SubnetError::UnsubnettableClass { class })?;

    if subnet_bits > MAX_MASKED_BITS - natural {
        return Err(SubnetError::InvalidMaskedBits(format!(
            "borrowing {subnet_bits} bits from a class {class} network passes /{MAX_MASKED_BITS}, \
             the longest prefix that leaves two host addresses"
        )));
    }
    let masked_bits = natural + subnet_bits;

    let mask = prefix_mask(masked_bits);
    let total_subnets = 1u64 << subnet_bits;
    let usable_subnets = match policy {
        UsableSubnetsPolicy::ExcludeFirstAndLast if subnet_bits > 0 => total_subnets - 2,
        _ => total_subnets,
    };
    let total_hosts = 1u64 << (MAX_LENGTH - masked_bits);
    let usable_hosts = total_hosts - 2;

    let address_bits = u32::from(address);
    let network = address_bits & mask;
    let broadcast = network | !mask;
    log::trace!(
        "derive: /{masked_bits} network {} broadcast {}",
        Ipv4Addr::from(network),
        Ipv4Addr::from(broadcast)
    );

    Ok(SubnetLayout {
        masked_bits,
        subnet_mask: Ipv4Addr::from(mask),
        total_subnets,
        usable_subnets,
        total_hosts,
        usable_hosts,
        subnet_address: Ipv4Addr::from(network),
        broadcast_address: Ipv4Addr::from(broadcast),
        minimum_host_address: Ipv4Addr::from(network + 1),
        maximum_host_address: Ipv4Addr::from(broadcast - 1),
        network_increment: total_hosts,
    })
}

/// Mask of `len` leading ones as a u32.
fn prefix_mask(len: u8) -> u32 {
    let right_len = u32::from(MAX_LENGTH - len);
    let all_bits = u32::MAX as u64;
    ((all_bits >> right_len) << right_len) as u32
}
