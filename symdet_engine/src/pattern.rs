//! Pairwise classification of transistors into symmetry patterns.

use symdet_common::{DeviceId, MosPattern, MosType, NetId, Netlist, PinType, same_net};

/// Terminal nets and class of one transistor, read once per classification.
#[derive(Clone, Copy, Debug)]
struct Terminals {
    drain: Option<NetId>,
    gate: Option<NetId>,
    source: Option<NetId>,
    class: MosType,
}

impl Terminals {
    fn of(netlist: &Netlist, device: DeviceId) -> Option<Self> {
        Some(Self {
            drain: netlist.net_of_terminal(device, PinType::Drain),
            gate: netlist.net_of_terminal(device, PinType::Gate),
            source: netlist.net_of_terminal(device, PinType::Source),
            class: netlist.mos_type(device)?,
        })
    }

    const fn is_diff(&self) -> bool {
        matches!(self.class, MosType::Diff)
    }

    const fn is_diode(&self) -> bool {
        matches!(self.class, MosType::Diode)
    }

    const fn is_diff_or_diode(&self) -> bool {
        matches!(self.class, MosType::Diff | MosType::Diode)
    }
}

/// Classifies device pairs of one netlist.
///
/// Every predicate compares the current terminal nets, so the result is
/// independent of argument order: `classify(a, b) == classify(b, a)`.
#[derive(Clone, Copy, Debug)]
pub struct Classifier<'n> {
    netlist: &'n Netlist,
}

impl<'n> Classifier<'n> {
    /// Classifier over `netlist`.
    #[must_use]
    pub const fn new(netlist: &'n Netlist) -> Self {
        Self { netlist }
    }

    /// The netlist being classified.
    #[must_use]
    pub const fn netlist(&self) -> &'n Netlist {
        self.netlist
    }

    /// Returns true if both devices have the same kind and declared size.
    /// This gates every pattern, and is the only test applied to passives.
    #[must_use]
    pub fn matched(&self, a: DeviceId, b: DeviceId) -> bool {
        let (a, b) = (self.netlist.device(a), self.netlist.device(b));
        a.kind() == b.kind() && a.width() == b.width() && a.length() == b.length()
    }

    /// Symmetry pattern formed by `a` and `b`. First match wins.
    #[must_use]
    pub fn classify(&self, a: DeviceId, b: DeviceId) -> MosPattern {
        if !self.matched(a, b) {
            return MosPattern::Invalid;
        }
        let (Some(ta), Some(tb)) = (
            Terminals::of(self.netlist, a),
            Terminals::of(self.netlist, b),
        ) else {
            return MosPattern::Invalid;
        };

        if cross_cascode(&ta, &tb) {
            MosPattern::CrossCascode
        } else if cross_load(&ta, &tb) {
            MosPattern::CrossLoad
        } else if cascode(&ta, &tb) {
            MosPattern::Cascode
        } else if load(&ta, &tb) {
            MosPattern::Load
        } else if diff_source(&ta, &tb) {
            MosPattern::DiffSource
        } else if diff_cascode(&ta, &tb) {
            MosPattern::DiffCascode
        } else {
            MosPattern::Invalid
        }
    }
}

fn crossed(a: &Terminals, b: &Terminals) -> bool {
    same_net(a.gate, b.drain) && same_net(a.drain, b.gate)
}

fn cross_cascode(a: &Terminals, b: &Terminals) -> bool {
    a.is_diff() && b.is_diff() && !same_net(a.source, b.source) && crossed(a, b)
}

fn cross_load(a: &Terminals, b: &Terminals) -> bool {
    a.is_diff() && b.is_diff() && same_net(a.source, b.source) && crossed(a, b)
}

fn cascode(a: &Terminals, b: &Terminals) -> bool {
    a.is_diff_or_diode()
        && b.is_diff_or_diode()
        && !same_net(a.source, b.source)
        && same_net(a.gate, b.gate)
        && !same_net(a.drain, b.drain)
}

fn load(a: &Terminals, b: &Terminals) -> bool {
    let mirrored = a.is_diff_or_diode()
        && b.is_diff_or_diode()
        && same_net(a.gate, b.gate);
    // Diode loads match regardless of their gates.
    let diodes = a.is_diode() && b.is_diode();

    (mirrored || diodes) && same_net(a.source, b.source) && !same_net(a.drain, b.drain)
}

fn diff_source(a: &Terminals, b: &Terminals) -> bool {
    a.is_diff()
        && b.is_diff()
        && same_net(a.source, b.source)
        && !same_net(a.gate, b.gate)
        && !same_net(a.drain, b.drain)
}

fn diff_cascode(a: &Terminals, b: &Terminals) -> bool {
    a.is_diff()
        && b.is_diff()
        && !same_net(a.source, b.source)
        && !same_net(a.gate, b.gate)
        && !same_net(a.drain, b.drain)
}
