//! Netlist graph definitions.
//!
//! - [`NetId`], [`DeviceId`], [`PinId`]: arena indices into a [`Netlist`].
//! - [`DeviceKind`], [`PinType`], [`MosType`], [`MosPattern`]: closed
//!   classifications of devices, terminals and device pairs.
//! - [`RawNetlist`]: the loader-facing description a [`Netlist`] is built from.
//! - [`Netlist`]: the immutable, bidirectionally indexed device graph.

mod ids;
mod kind;
mod netlist;
mod raw;

pub use ids::{DeviceId, NetId, PinId};
pub use kind::{DeviceKind, MosPattern, MosType, PinType};
pub use netlist::{Device, Net, Netlist, Pin, same_net};
pub use raw::{RawDevice, RawNet, RawNetlist, RawNetlistBuilder};
