use std::fmt;
use std::fmt::Formatter;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Categorizes circuit elements by the terminal layout they expose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceKind {
    /// N-channel transistor (drain, gate, source, bulk).
    Nmos,
    /// P-channel transistor (drain, gate, source, bulk).
    Pmos,
    /// Resistor (this, that, other).
    Res,
    /// Capacitor (this, that, other).
    Cap,
    /// Any other element; every terminal has role [`PinType::Other`].
    #[serde(other)]
    Other,
}

impl DeviceKind {
    /// Returns true for four-terminal transistors.
    #[must_use]
    pub const fn is_transistor(&self) -> bool {
        matches!(self, Self::Nmos | Self::Pmos)
    }

    /// Returns true for two/three-terminal passives.
    #[must_use]
    pub const fn is_passive(&self) -> bool {
        matches!(self, Self::Res | Self::Cap)
    }

    /// Positional terminal roles consumed from the raw net list.
    ///
    /// Empty for [`DeviceKind::Other`], which has no fixed arity.
    #[must_use]
    pub const fn terminal_roles(&self) -> &'static [PinType] {
        match self {
            Self::Nmos | Self::Pmos => &[
                PinType::Drain,
                PinType::Gate,
                PinType::Source,
                PinType::Bulk,
            ],
            Self::Res | Self::Cap => &[PinType::This, PinType::That, PinType::Other],
            Self::Other => &[],
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nmos => "NMOS",
            Self::Pmos => "PMOS",
            Self::Res => "RES",
            Self::Cap => "CAP",
            Self::Other => "OTHER",
        };
        write!(f, "{name}")
    }
}

/// Role of a device terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PinType {
    /// Transistor drain.
    Drain,
    /// Transistor gate.
    Gate,
    /// Transistor source.
    Source,
    /// Transistor bulk / body.
    Bulk,
    /// First passive terminal.
    This,
    /// Second passive terminal.
    That,
    /// Third passive terminal, or any terminal of a generic device.
    Other,
}

impl PinType {
    /// The terminal a symmetry search continues through after reaching a
    /// device through `self`.
    ///
    /// | reached through | continue through |
    /// | --------------- | ---------------- |
    /// | SOURCE          | DRAIN            |
    /// | DRAIN           | SOURCE           |
    /// | THIS            | THAT             |
    /// | THAT            | THIS             |
    ///
    /// Every other role ends the conduction path.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Source => Some(Self::Drain),
            Self::Drain => Some(Self::Source),
            Self::This => Some(Self::That),
            Self::That => Some(Self::This),
            Self::Gate | Self::Bulk | Self::Other => None,
        }
    }
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Drain => "DRAIN",
            Self::Gate => "GATE",
            Self::Source => "SOURCE",
            Self::Bulk => "BULK",
            Self::This => "THIS",
            Self::That => "THAT",
            Self::Other => "OTHER",
        };
        write!(f, "{name}")
    }
}

/// Transistor sub-class derived from terminal net equalities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MosType {
    /// Source and drain on the same net.
    Dummy,
    /// Gate tied to drain.
    Diode,
    /// Gate tied to source.
    Cap,
    /// None of the above.
    Diff,
}

impl fmt::Display for MosType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dummy => "DUMMY",
            Self::Diode => "DIODE",
            Self::Cap => "CAP",
            Self::Diff => "DIFF",
        };
        write!(f, "{name}")
    }
}

/// Symmetry relationship between two devices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MosPattern {
    /// No symmetry relationship.
    Invalid,
    /// Cross-coupled pair on distinct sources.
    CrossCascode,
    /// Cross-coupled pair on a shared source.
    CrossLoad,
    /// Common-gate pair on distinct sources.
    Cascode,
    /// Common-gate, common-source pair (current mirror or diode load).
    Load,
    /// Differential input pair on a shared source.
    DiffSource,
    /// Differential pair on distinct sources.
    DiffCascode,
}

impl MosPattern {
    /// Returns true for every pattern except [`MosPattern::Invalid`].
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl fmt::Display for MosPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Invalid => "INVALID",
            Self::CrossCascode => "CROSS_CASCODE",
            Self::CrossLoad => "CROSS_LOAD",
            Self::Cascode => "CASCODE",
            Self::Load => "LOAD",
            Self::DiffSource => "DIFF_SOURCE",
            Self::DiffCascode => "DIFF_CASCODE",
        };
        write!(f, "{name}")
    }
}
