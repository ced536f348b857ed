//! Error types for netlist construction.

use thiserror::Error;

use crate::DeviceKind;

/// Malformed raw input rejected while building a [`crate::Netlist`].
///
/// Every variant is fatal: the build aborts and no partial model is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetlistError {
    /// A device declares fewer terminal nets than its kind requires.
    #[error("device '{device}' ({kind}) declares {found} terminal nets, expected at least {expected}")]
    TooFewTerminals {
        /// Name of the offending device.
        device: String,
        /// Its kind.
        kind: DeviceKind,
        /// Required terminal count for the kind.
        expected: usize,
        /// Terminal count actually supplied.
        found: usize,
    },

    /// A device references a net id outside the built net set.
    #[error("device '{device}' references net {net}, but only {net_count} nets exist")]
    UnknownNet {
        /// Name of the offending device.
        device: String,
        /// The out-of-range net id.
        net: usize,
        /// Number of nets in the description.
        net_count: usize,
    },

    /// An arena position does not fit in a 32-bit id.
    #[error("{what} {position} exceeds the addressable id range")]
    CapacityExceeded {
        /// Which arena overflowed: `net`, `device` or `pin`.
        what: &'static str,
        /// The position that could not be converted.
        position: usize,
    },
}

impl NetlistError {
    /// Create a too-few-terminals error.
    pub fn too_few_terminals(
        device: impl Into<String>,
        kind: DeviceKind,
        expected: usize,
        found: usize,
    ) -> Self {
        Self::TooFewTerminals {
            device: device.into(),
            kind,
            expected,
            found,
        }
    }

    /// Create an unknown-net error.
    pub fn unknown_net(device: impl Into<String>, net: usize, net_count: usize) -> Self {
        Self::UnknownNet {
            device: device.into(),
            net,
            net_count,
        }
    }

    /// Create a capacity-exceeded error.
    pub const fn capacity_exceeded(what: &'static str, position: usize) -> Self {
        Self::CapacityExceeded { what, position }
    }
}
