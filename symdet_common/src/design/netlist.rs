//! The device/net/pin graph.
//!
//! Nets, devices and pins live in three append-only arenas addressed by
//! [`NetId`], [`DeviceId`] and [`PinId`]. Every pin appears in exactly one
//! net's pin list and exactly one device's pin list, and both back-reference
//! it. Once built, a [`Netlist`] is read-only.
//!
//! Out-of-range ids are contract violations and panic on arena access.

use std::collections::BTreeSet;

use contracts::*;
use tracing::{debug, warn};

use crate::{
    DeviceId, DeviceKind, MosType, NetId, NetlistError, PinId, PinType, RawDevice, RawNetlist,
};

/// Compares two optional nets. An absent net never equals anything,
/// including another absent net.
#[must_use]
pub fn same_net(a: Option<NetId>, b: Option<NetId>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}

/// Converts an arena position into its id, rejecting positions past the
/// 32-bit id range.
fn arena_id<I: TryFrom<usize>>(what: &'static str, position: usize) -> Result<I, NetlistError> {
    I::try_from(position).map_err(|_| NetlistError::capacity_exceeded(what, position))
}

/// A wire connecting device terminals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Net {
    id: NetId,
    name: String,
    /// Incident pins, ascending.
    pins: Vec<PinId>,
}

impl Net {
    /// Arena id.
    #[must_use]
    pub const fn id(&self) -> NetId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pins incident on this net, in ascending id order.
    #[must_use]
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }
}

/// One terminal occurrence, binding a device to a net with a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin {
    id: PinId,
    device: DeviceId,
    net: NetId,
    role: PinType,
}

impl Pin {
    /// Arena id.
    #[must_use]
    pub const fn id(&self) -> PinId {
        self.id
    }

    /// Owning device.
    #[must_use]
    pub const fn device(&self) -> DeviceId {
        self.device
    }

    /// Incident net.
    #[must_use]
    pub const fn net(&self) -> NetId {
        self.net
    }

    /// Terminal role.
    #[must_use]
    pub const fn role(&self) -> PinType {
        self.role
    }
}

/// A circuit element with ordered terminals.
#[derive(Clone, Debug, PartialEq)]
pub struct Device {
    id: DeviceId,
    name: String,
    kind: DeviceKind,
    width: Option<f64>,
    length: Option<f64>,
    /// Owned pins in positional role order.
    pins: Vec<PinId>,
}

impl Device {
    /// Arena id.
    #[must_use]
    pub const fn id(&self) -> DeviceId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Device kind.
    #[must_use]
    pub const fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Declared width.
    #[must_use]
    pub const fn width(&self) -> Option<f64> {
        self.width
    }

    /// Declared length.
    #[must_use]
    pub const fn length(&self) -> Option<f64> {
        self.length
    }

    /// Owned pins in positional role order.
    #[must_use]
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }
}

/// Immutable device/net/pin graph built from a [`RawNetlist`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Netlist {
    nets: Vec<Net>,
    devices: Vec<Device>,
    pins: Vec<Pin>,
}

impl Netlist {
    /// Builds the graph: nets first (id = position), then devices in order,
    /// numbering pins monotonically from zero.
    ///
    /// # Errors
    ///
    /// Returns [`NetlistError`] if a device declares fewer terminal nets than
    /// its kind requires, or references a net id that does not exist.
    #[debug_ensures(ret.as_ref().ok().is_none_or(Self::is_consistent))]
    pub fn build(raw: &RawNetlist) -> Result<Self, NetlistError> {
        Self::try_build(raw)
    }

    fn try_build(raw: &RawNetlist) -> Result<Self, NetlistError> {
        let mut netlist = Self::default();

        for (position, raw_net) in raw.nets.iter().enumerate() {
            if raw_net.id != position {
                warn!(
                    "net '{}' declares id {} but sits at position {}; using position",
                    raw_net.name, raw_net.id, position
                );
            }
            netlist.nets.push(Net {
                id: arena_id("net", position)?,
                name: raw_net.name.clone(),
                pins: Vec::new(),
            });
        }

        for raw_device in &raw.devices {
            netlist.add_device(raw_device)?;
        }

        debug!(
            "built netlist: {} nets, {} devices, {} pins",
            netlist.nets.len(),
            netlist.devices.len(),
            netlist.pins.len()
        );
        Ok(netlist)
    }

    fn add_device(&mut self, raw: &RawDevice) -> Result<(), NetlistError> {
        let roles = raw.kind.terminal_roles();
        if raw.nets.len() < roles.len() {
            return Err(NetlistError::too_few_terminals(
                raw.name.as_str(),
                raw.kind,
                roles.len(),
                raw.nets.len(),
            ));
        }
        if let Some(&bad) = raw.nets.iter().find(|&&net| net >= self.nets.len()) {
            return Err(NetlistError::unknown_net(
                raw.name.as_str(),
                bad,
                self.nets.len(),
            ));
        }

        let terminals: Vec<(usize, PinType)> = if roles.is_empty() {
            raw.nets.iter().map(|&net| (net, PinType::Other)).collect()
        } else {
            if raw.nets.len() > roles.len() {
                warn!(
                    "device '{}' ({}) declares {} nets, ignoring all past the first {}",
                    raw.name,
                    raw.kind,
                    raw.nets.len(),
                    roles.len()
                );
            }
            raw.nets.iter().copied().zip(roles.iter().copied()).collect()
        };

        let device_id = arena_id("device", self.devices.len())?;
        let mut device = Device {
            id: device_id,
            name: raw.name.clone(),
            kind: raw.kind,
            width: raw.width,
            length: raw.length,
            pins: Vec::with_capacity(terminals.len()),
        };

        for (net, role) in terminals {
            let pin_id = arena_id("pin", self.pins.len())?;
            device.pins.push(pin_id);
            self.nets[net].pins.push(pin_id);
            self.pins.push(Pin {
                id: pin_id,
                device: device_id,
                net: arena_id("net", net)?,
                role,
            });
        }

        self.devices.push(device);
        Ok(())
    }

    /// Checks the bidirectional index invariant: every pin is listed by
    /// exactly one net and one device, and those are the ones it points to.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut net_refs = vec![0usize; self.pins.len()];
        let mut device_refs = vec![0usize; self.pins.len()];

        for net in &self.nets {
            for &pin in &net.pins {
                let Some(count) = net_refs.get_mut(pin.as_usize()) else {
                    return false;
                };
                *count += 1;
                if self.pins[pin.as_usize()].net != net.id {
                    return false;
                }
            }
        }
        for device in &self.devices {
            for &pin in &device.pins {
                let Some(count) = device_refs.get_mut(pin.as_usize()) else {
                    return false;
                };
                *count += 1;
                if self.pins[pin.as_usize()].device != device.id {
                    return false;
                }
            }
        }

        self.pins
            .iter()
            .enumerate()
            .all(|(i, pin)| pin.id.as_usize() == i && net_refs[i] == 1 && device_refs[i] == 1)
    }

    // ##########################

    /// All nets in id order.
    #[must_use]
    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// All devices in id order.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// All pins in id order.
    #[must_use]
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Net ids in ascending order.
    pub fn net_ids(&self) -> impl Iterator<Item = NetId> + '_ {
        self.nets.iter().map(Net::id)
    }

    /// Device ids in ascending order.
    pub fn device_ids(&self) -> impl Iterator<Item = DeviceId> + '_ {
        self.devices.iter().map(Device::id)
    }

    /// Looks up a net.
    #[must_use]
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.as_usize()]
    }

    /// Looks up a device.
    #[must_use]
    pub fn device(&self, id: DeviceId) -> &Device {
        &self.devices[id.as_usize()]
    }

    /// Looks up a pin.
    #[must_use]
    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.as_usize()]
    }

    /// Finds a net by display name.
    #[must_use]
    pub fn net_by_name(&self, name: &str) -> Option<NetId> {
        self.nets.iter().find(|n| n.name == name).map(Net::id)
    }

    /// Finds a device by display name.
    #[must_use]
    pub fn device_by_name(&self, name: &str) -> Option<DeviceId> {
        self.devices.iter().find(|d| d.name == name).map(Device::id)
    }

    /// Number of pins incident on `net`.
    #[must_use]
    pub fn pin_count(&self, net: NetId) -> usize {
        self.net(net).pins.len()
    }

    /// Returns true if `device` is an NMOS or PMOS transistor.
    #[must_use]
    pub fn is_transistor(&self, device: DeviceId) -> bool {
        self.device(device).kind.is_transistor()
    }

    /// Returns true if `device` is a resistor or capacitor.
    #[must_use]
    pub fn is_passive(&self, device: DeviceId) -> bool {
        self.device(device).kind.is_passive()
    }

    // ##########################

    /// Every device with at least one pin on `net`.
    #[must_use]
    pub fn devices_on_net(&self, net: NetId) -> BTreeSet<DeviceId> {
        self.net(net)
            .pins
            .iter()
            .map(|&pin| self.pin(pin).device)
            .collect()
    }

    /// Every device with at least one pin on `net`, except `excluded`.
    #[must_use]
    pub fn devices_on_net_excluding(&self, net: NetId, excluded: DeviceId) -> BTreeSet<DeviceId> {
        let mut devices = self.devices_on_net(net);
        devices.remove(&excluded);
        devices
    }

    /// Keeps the devices whose terminal of role `role` sits on `net`.
    pub fn filter_by_terminal_role_on_net(
        &self,
        devices: impl IntoIterator<Item = DeviceId>,
        net: NetId,
        role: PinType,
    ) -> BTreeSet<DeviceId> {
        devices
            .into_iter()
            .filter(|&device| {
                self.device(device).pins.iter().any(|&pin| {
                    let pin = self.pin(pin);
                    pin.role == role && pin.net == net
                })
            })
            .collect()
    }

    /// Keeps the transistors of class `mos_type`.
    pub fn filter_by_mos_type(
        &self,
        devices: impl IntoIterator<Item = DeviceId>,
        mos_type: MosType,
    ) -> BTreeSet<DeviceId> {
        devices
            .into_iter()
            .filter(|&device| self.mos_type(device) == Some(mos_type))
            .collect()
    }

    /// Role of the first terminal of `device` on `net`, or
    /// [`PinType::Other`] if the device does not touch the net.
    #[must_use]
    pub fn terminal_role_between(&self, device: DeviceId, net: NetId) -> PinType {
        self.pin_on_net(device, net)
            .map_or(PinType::Other, |pin| self.pin(pin).role)
    }

    /// First pin of `device` on `net`, in pin order.
    #[must_use]
    pub fn pin_on_net(&self, device: DeviceId, net: NetId) -> Option<PinId> {
        self.device(device)
            .pins
            .iter()
            .copied()
            .find(|&pin| self.pin(pin).net == net)
    }

    /// Net of the terminal of role `role`, or `None` if the device has no
    /// such terminal.
    #[must_use]
    pub fn net_of_terminal(&self, device: DeviceId, role: PinType) -> Option<NetId> {
        self.pin_of_terminal(device, role)
            .map(|pin| self.pin(pin).net)
    }

    /// Pin of the terminal of role `role`, or `None` if the device has no
    /// such terminal.
    #[must_use]
    pub fn pin_of_terminal(&self, device: DeviceId, role: PinType) -> Option<PinId> {
        self.device(device)
            .pins
            .iter()
            .copied()
            .find(|&pin| self.pin(pin).role == role)
    }

    /// Transistor sub-class, recomputed from the current terminal nets.
    /// `None` for anything that is not a transistor.
    #[must_use]
    pub fn mos_type(&self, device: DeviceId) -> Option<MosType> {
        if !self.is_transistor(device) {
            return None;
        }
        let drain = self.net_of_terminal(device, PinType::Drain);
        let gate = self.net_of_terminal(device, PinType::Gate);
        let source = self.net_of_terminal(device, PinType::Source);

        let class = if same_net(source, drain) {
            MosType::Dummy
        } else if same_net(gate, drain) {
            MosType::Diode
        } else if same_net(gate, source) {
            MosType::Cap
        } else {
            MosType::Diff
        };
        Some(class)
    }
}
