//! Random circuits for property tests.

use quickcheck::{Arbitrary, Gen};
use symdet_common::{DeviceKind, Netlist, RawNetlist};

/// A small random circuit, biased towards transistors sharing few nets and
/// few sizes so that real patterns show up often.
#[derive(Clone, Debug)]
pub(crate) struct ArbitraryCircuit(pub(crate) RawNetlist);

impl ArbitraryCircuit {
    pub(crate) fn netlist(&self) -> Netlist {
        Netlist::build(&self.0).unwrap()
    }
}

impl Arbitrary for ArbitraryCircuit {
    fn arbitrary(g: &mut Gen) -> Self {
        let net_count = usize::arbitrary(g) % 6 + 2;
        let device_count = usize::arbitrary(g) % 9 + 1;
        let kinds = [
            DeviceKind::Nmos,
            DeviceKind::Nmos,
            DeviceKind::Pmos,
            DeviceKind::Pmos,
            DeviceKind::Res,
            DeviceKind::Cap,
        ];
        let widths = [1.0, 2.0];

        let mut b = RawNetlist::builder();
        let nets: Vec<usize> = (0..net_count).map(|i| b.net(format!("n{i}"))).collect();
        for i in 0..device_count {
            let kind = *g.choose(&kinds).unwrap();
            let terminals = kind
                .terminal_roles()
                .iter()
                .map(|_| *g.choose(&nets).unwrap())
                .collect();
            let width = *g.choose(&widths).unwrap();
            b.device(format!("x{i}"), kind, terminals).sized(width, 1.0);
        }
        Self(b.build())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let raw = self.0.clone();
        Box::new((0..raw.devices.len()).rev().map(move |drop| {
            let mut smaller = raw.clone();
            smaller.devices.remove(drop);
            Self(smaller)
        }))
    }
}
