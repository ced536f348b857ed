//! Loader-facing netlist description.
//!
//! A [`RawNetlist`] is what an external parser hands over: nets by name and
//! devices with an ordered list of net ids. Roles are assigned positionally
//! when a [`crate::Netlist`] is built from it.

use serde::{Deserialize, Serialize};

use crate::DeviceKind;

/// A flattened netlist as produced by a loader.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNetlist {
    /// Nets in id order.
    pub nets: Vec<RawNet>,
    /// Devices in id order.
    pub devices: Vec<RawDevice>,
}

/// A single raw net.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNet {
    /// Display name.
    pub name: String,
    /// Id declared by the loader; expected to equal the net's position.
    pub id: usize,
}

/// A single raw device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawDevice {
    /// Display name.
    pub name: String,
    /// Kind tag.
    pub kind: DeviceKind,
    /// Terminal nets in positional order (drain, gate, source, bulk for
    /// transistors; this, that, other for passives).
    pub nets: Vec<usize>,
    /// Declared width, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Declared length, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

impl RawDevice {
    /// Creates an unsized device.
    pub fn new(name: impl Into<String>, kind: DeviceKind, nets: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            kind,
            nets,
            width: None,
            length: None,
        }
    }

    /// Sets the declared width and length.
    pub const fn sized(&mut self, width: f64, length: f64) -> &mut Self {
        self.width = Some(width);
        self.length = Some(length);
        self
    }
}

impl RawNetlist {
    /// Starts an incremental builder.
    #[must_use]
    pub fn builder() -> RawNetlistBuilder {
        RawNetlistBuilder::default()
    }
}

/// Incremental construction of a [`RawNetlist`], mostly for tests and demos.
///
/// ```
/// use symdet_common::{DeviceKind, RawNetlist};
///
/// let mut b = RawNetlist::builder();
/// let (out, inp, tail, gnd) = (b.net("OUT"), b.net("IN"), b.net("TAIL"), b.net("GND"));
/// b.nmos("M1", [out, inp, tail, gnd]).sized(1.0, 0.18);
/// let raw = b.build();
/// assert_eq!(raw.devices[0].kind, DeviceKind::Nmos);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RawNetlistBuilder {
    /// The description under construction.
    raw: RawNetlist,
}

impl RawNetlistBuilder {
    /// Returns the id of the net called `name`, creating it if needed.
    pub fn net(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(existing) = self.raw.nets.iter().position(|n| n.name == name) {
            return existing;
        }
        let id = self.raw.nets.len();
        self.raw.nets.push(RawNet { name, id });
        id
    }

    /// Appends a device and returns it for further configuration.
    pub fn device(
        &mut self,
        name: impl Into<String>,
        kind: DeviceKind,
        nets: Vec<usize>,
    ) -> &mut RawDevice {
        self.raw.devices.push(RawDevice::new(name, kind, nets));
        let last = self.raw.devices.len() - 1;
        &mut self.raw.devices[last]
    }

    /// Appends an NMOS transistor with terminals `[drain, gate, source, bulk]`.
    pub fn nmos(&mut self, name: impl Into<String>, terminals: [usize; 4]) -> &mut RawDevice {
        self.device(name, DeviceKind::Nmos, terminals.to_vec())
    }

    /// Appends a PMOS transistor with terminals `[drain, gate, source, bulk]`.
    pub fn pmos(&mut self, name: impl Into<String>, terminals: [usize; 4]) -> &mut RawDevice {
        self.device(name, DeviceKind::Pmos, terminals.to_vec())
    }

    /// Appends a resistor with terminals `[this, that, other]`.
    pub fn res(&mut self, name: impl Into<String>, terminals: [usize; 3]) -> &mut RawDevice {
        self.device(name, DeviceKind::Res, terminals.to_vec())
    }

    /// Appends a capacitor with terminals `[this, that, other]`.
    pub fn cap(&mut self, name: impl Into<String>, terminals: [usize; 3]) -> &mut RawDevice {
        self.device(name, DeviceKind::Cap, terminals.to_vec())
    }

    /// Finishes construction.
    #[must_use]
    pub fn build(self) -> RawNetlist {
        self.raw
    }
}
