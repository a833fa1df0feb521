//! # Chain Primitives
//!
//! Numeric chain identifiers, block numbers, and the hex-encoded byte
//! newtypes used to address accounts, contracts, and cross-chain messages.

use crate::errors::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// EIP-155 style numeric chain identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Create a chain identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw numeric value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for ChainId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| ParseError::InvalidChainId(s.to_string()))
    }
}

/// Monotonic block number on a single chain.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockNumber(pub u64);

impl BlockNumber {
    /// Create a block number.
    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    /// Raw numeric value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Blocks remaining until `later`, saturating at zero.
    pub fn distance_to(&self, later: BlockNumber) -> u64 {
        later.0.saturating_sub(self.0)
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for BlockNumber {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

/// Decode a fixed-width byte array from a `0x`-prefixed hex string.
fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], ParseError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).map_err(|_| ParseError::InvalidHex(s.to_string()))?;
    let got = bytes.len();
    bytes.try_into().map_err(|_| ParseError::InvalidLength {
        expected: N,
        got,
    })
}

macro_rules! hex_newtype {
    ($(#[$doc:meta])* $name:ident, $width:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub [u8; $width]);

        impl $name {
            /// Wrap raw bytes.
            pub const fn new(bytes: [u8; $width]) -> Self {
                Self(bytes)
            }

            /// Raw bytes.
            pub const fn as_bytes(&self) -> &[u8; $width] {
                &self.0
            }

            /// All-zero value, used as a placeholder in tests and defaults.
            pub const fn zero() -> Self {
                Self([0u8; $width])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(0x{})", stringify!($name), hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode_fixed::<$width>(s).map(Self)
            }
        }

        impl From<[u8; $width]> for $name {
            fn from(bytes: [u8; $width]) -> Self {
                Self(bytes)
            }
        }
    };
}

hex_newtype!(
    /// 20-byte account address of a registeree wallet.
    WalletAddress,
    20
);

hex_newtype!(
    /// 20-byte address of a deployed registry contract.
    ContractAddress,
    20
);

hex_newtype!(
    /// 32-byte transaction hash.
    TxHash,
    32
);

hex_newtype!(
    /// 32-byte identifier of a bridged cross-chain message.
    CrossChainMessageId,
    32
);
