use std::fmt;
use std::hash::Hash;
use std::num::TryFromIntError;

use serde::{Deserialize, Serialize};

/// Declares a `u32`-backed arena index with the usual conversions.
macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            /// The underlying raw arena position.
            inner: u32,
        }

        impl $name {
            /// Creates an id from a raw arena position.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self { inner: id }
            }

            /// Returns the id as a usize for arena access.
            #[must_use]
            pub const fn as_usize(self) -> usize {
                self.inner as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.inner)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = TryFromIntError;

            #[inline]
            fn try_from(id: usize) -> Result<Self, Self::Error> {
                u32::try_from(id).map(Self::new)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(id: $name) -> Self {
                id.inner as Self
            }
        }
    };
}

arena_id!(
    /// Position of a net in the netlist's net arena.
    NetId,
    "n"
);

arena_id!(
    /// Position of a device in the netlist's device arena.
    DeviceId,
    "d"
);

arena_id!(
    /// Position of a pin in the netlist's pin arena.
    /// Pins are numbered monotonically from zero in device order.
    PinId,
    "p"
);
