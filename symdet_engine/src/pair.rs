//! Device and net pair types produced by the symmetry search.

use std::fmt;

use contracts::*;
use serde::{Deserialize, Serialize};
use symdet_common::{DeviceId, NetId, PinId};

/// Order-free identity of a device pair, used for visited sets and seed
/// bookkeeping. A self-symmetric single has `low == high`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    low: DeviceId,
    high: DeviceId,
}

impl PairKey {
    /// Normalizes `(a, b)` so that `(a, b)` and `(b, a)` share a key.
    #[must_use]
    #[debug_ensures(ret.low <= ret.high)]
    pub fn new(a: DeviceId, b: DeviceId) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// A symmetric device pair, or a self-symmetric single when both sides
/// are the same device.
///
/// The via pins record the terminal each side was reached through; they
/// decide where the search continues. Self-symmetric singles carry none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MosPair {
    first: DeviceId,
    second: DeviceId,
    via_first: Option<PinId>,
    via_second: Option<PinId>,
}

impl MosPair {
    /// A pair reached through `via_first` and `via_second`.
    #[must_use]
    pub const fn new(first: DeviceId, second: DeviceId, via_first: PinId, via_second: PinId) -> Self {
        Self {
            first,
            second,
            via_first: Some(via_first),
            via_second: Some(via_second),
        }
    }

    /// A device that sits on the axis of symmetry by itself.
    #[must_use]
    pub const fn self_symmetric(device: DeviceId) -> Self {
        Self {
            first: device,
            second: device,
            via_first: None,
            via_second: None,
        }
    }

    /// First side.
    #[must_use]
    pub const fn first(&self) -> DeviceId {
        self.first
    }

    /// Second side.
    #[must_use]
    pub const fn second(&self) -> DeviceId {
        self.second
    }

    /// Pin through which the first side was reached.
    #[must_use]
    pub const fn via_first(&self) -> Option<PinId> {
        self.via_first
    }

    /// Pin through which the second side was reached.
    #[must_use]
    pub const fn via_second(&self) -> Option<PinId> {
        self.via_second
    }

    /// Both sides.
    #[must_use]
    pub const fn devices(&self) -> [DeviceId; 2] {
        [self.first, self.second]
    }

    /// Order-free identity.
    #[must_use]
    pub fn key(&self) -> PairKey {
        PairKey::new(self.first, self.second)
    }

    /// Returns true if both sides are the same device.
    #[must_use]
    pub fn is_self_symmetric(&self) -> bool {
        self.first == self.second
    }

    /// Returns true if `device` is either side.
    #[must_use]
    pub fn contains(&self, device: DeviceId) -> bool {
        self.first == device || self.second == device
    }
}

impl fmt::Display for MosPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_self_symmetric() {
            write!(f, "{}", self.first)
        } else {
            write!(f, "({}, {})", self.first, self.second)
        }
    }
}

/// Two nets asserted symmetric, or a self-symmetric single net.
/// Stored normalized so that `(a, b)` and `(b, a)` compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetPair {
    first: NetId,
    second: NetId,
}

impl NetPair {
    /// Normalized pair of `a` and `b`.
    #[must_use]
    #[debug_ensures(ret.first <= ret.second)]
    pub fn new(a: NetId, b: NetId) -> Self {
        Self {
            first: a.min(b),
            second: a.max(b),
        }
    }

    /// A net symmetric to itself.
    #[must_use]
    pub const fn self_symmetric(net: NetId) -> Self {
        Self {
            first: net,
            second: net,
        }
    }

    /// Smaller net id.
    #[must_use]
    pub const fn first(&self) -> NetId {
        self.first
    }

    /// Larger net id.
    #[must_use]
    pub const fn second(&self) -> NetId {
        self.second
    }

    /// Returns true if both sides are the same net.
    #[must_use]
    pub fn is_self_symmetric(&self) -> bool {
        self.first == self.second
    }
}

/// Pairs discovered from one seed, followed by any self-symmetric singles
/// folded in afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymmetryGroup {
    pairs: Vec<MosPair>,
}

impl SymmetryGroup {
    /// Group over `pairs`, in discovery order.
    #[must_use]
    pub const fn new(pairs: Vec<MosPair>) -> Self {
        Self { pairs }
    }

    /// Pairs in discovery order.
    #[must_use]
    pub fn pairs(&self) -> &[MosPair] {
        &self.pairs
    }

    /// Returns true if any pair has `device` on either side.
    #[must_use]
    pub fn contains_device(&self, device: DeviceId) -> bool {
        self.pairs.iter().any(|pair| pair.contains(device))
    }

    /// Returns true if the group already holds a pair with `key`.
    #[must_use]
    pub fn contains_key(&self, key: PairKey) -> bool {
        self.pairs.iter().any(|pair| pair.key() == key)
    }

    /// Appends a pair.
    pub fn push(&mut self, pair: MosPair) {
        self.pairs.push(pair);
    }

    /// Number of pairs, singles included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the group has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Every device in the group, first side before second.
    pub fn devices(&self) -> impl Iterator<Item = DeviceId> + '_ {
        self.pairs.iter().flat_map(MosPair::devices)
    }
}
