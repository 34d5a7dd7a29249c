//! Classful IPv4 subnetting calculator.
//!
//! Given an address and any one of several equivalent subnetting
//! parameters (mask, borrowed bits, total prefix length, subnet count or
//! host count), derives the full consistent set of subnetting facts:
//! network class, subnet mask, subnet and host counts, network, broadcast
//! and usable host range addresses.
//!
//! ```
//! use classful_subnet::Subnet;
//!
//! let subnet = Subnet::new("140.179.220.200")?
//!     .with_subnet_mask("255.255.224.0")?;
//! let layout = subnet.layout.expect("class B is subnettable");
//!
//! assert_eq!(subnet.subnet_bits, 3);
//! assert_eq!(layout.total_subnets, 8);
//! assert_eq!(layout.usable_hosts, 8190);
//! assert_eq!(layout.minimum_host_address.to_string(), "140.179.192.1");
//! # Ok::<(), classful_subnet::SubnetError>(())
//! ```

pub mod arithmetic;
pub mod conversion;
mod error;
pub mod models;

pub use error::{Result, SubnetError};
pub use models::{NetworkClass, Subnet, SubnetLayout, UsableSubnetsPolicy};
