//! Network identity reported by an endpoint.

use serde::{Deserialize, Serialize};

/// The network (chain) an endpoint serves.
///
/// Two descriptors are equal iff their chain ids match. Chain id `0` is the
/// "no network" sentinel some transports report before they know better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    pub chain_id: u64,
}

impl Network {
    /// Sentinel reported when an endpoint cannot tell which network it is on.
    pub const UNKNOWN: Network = Network { chain_id: 0 };

    pub const fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }

    /// Returns `true` for the "no network" sentinel.
    pub fn is_unknown(&self) -> bool {
        self.chain_id == Self::UNKNOWN.chain_id
    }
}

impl From<u64> for Network {
    fn from(chain_id: u64) -> Self {
        Self::new(chain_id)
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chain {}", self.chain_id)
    }
}
