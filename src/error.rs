//! Typed errors for the subnetting api.
//!
//! Every failure is a caller input error, reported synchronously to the
//! caller of the offending conversion or transition. Nothing is retried or
//! silently defaulted.

use crate::models::NetworkClass;

/// Result type for subnet calculations.
pub type Result<T> = std::result::Result<T, SubnetError>;

/// Errors produced by conversions and descriptor transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubnetError {
    /// Octet string is non-numeric or outside 0-255.
    #[error("invalid octet {0:?}")]
    InvalidOctet(String),

    /// Address string is not four valid octets separated by periods.
    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    /// Binary octet string is not exactly 8 binary digits.
    #[error("invalid binary octet {0:?}")]
    InvalidBinary(String),

    /// Subnet mask is not a contiguous run of leading ones.
    #[error("subnet mask {0:?} is not a contiguous leading-ones prefix")]
    InvalidMask(String),

    /// Requested prefix length cannot be honored for the address class.
    #[error("invalid masked bits: {0}")]
    InvalidMaskedBits(String),

    /// Class D and E networks carry no natural mask to borrow bits from.
    #[error("class {class} networks have no natural mask and cannot be subnetted")]
    UnsubnettableClass {
        /// The offending address class.
        class: NetworkClass,
    },
}
