#![allow(dead_code)]

use std::sync::OnceLock;

use symdet_common::{DeviceId, NetId, Netlist, RawNetlist};
use symdet_engine::{PairKey, SymmetryGroup};

pub fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    let _ = INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn device(netlist: &Netlist, name: &str) -> DeviceId {
    netlist
        .device_by_name(name)
        .unwrap_or_else(|| panic!("no device named {name}"))
}

pub fn net(netlist: &Netlist, name: &str) -> NetId {
    netlist
        .net_by_name(name)
        .unwrap_or_else(|| panic!("no net named {name}"))
}

/// Key of the pair `(a, b)`; pass the same name twice for a single.
pub fn key(netlist: &Netlist, a: &str, b: &str) -> PairKey {
    PairKey::new(device(netlist, a), device(netlist, b))
}

pub fn keys(group: &SymmetryGroup) -> Vec<PairKey> {
    group.pairs().iter().map(|pair| pair.key()).collect()
}

pub fn build(raw: RawNetlist) -> Netlist {
    Netlist::build(&raw).unwrap()
}

/// NMOS differential pair `M1`/`M2` on tail net `VTAIL`, nothing else.
pub fn diff_pair() -> Netlist {
    let mut b = RawNetlist::builder();
    let (gnd, tail) = (b.net("GND"), b.net("VTAIL"));
    let (ing1, ing2, outp, outn) = (b.net("ING1"), b.net("ING2"), b.net("OUTP"), b.net("OUTN"));
    b.nmos("M1", [outp, ing1, tail, gnd]).sized(1.0, 0.18);
    b.nmos("M2", [outn, ing2, tail, gnd]).sized(1.0, 0.18);
    build(b.build())
}

/// Cross-coupled PMOS pair `P1`/`P2` on `VDD`.
pub fn cross_coupled() -> Netlist {
    let mut b = RawNetlist::builder();
    let (a, bb, vdd) = (b.net("A"), b.net("B"), b.net("VDD"));
    b.pmos("P1", [a, bb, vdd, vdd]).sized(2.0, 0.18);
    b.pmos("P2", [bb, a, vdd, vdd]).sized(2.0, 0.18);
    build(b.build())
}

/// Cross-coupled PMOS pair over a cross-coupled NMOS pair.
pub fn latch() -> Netlist {
    let mut b = RawNetlist::builder();
    let (a, bb, vdd, gnd) = (b.net("A"), b.net("B"), b.net("VDD"), b.net("GND"));
    b.pmos("P1", [a, bb, vdd, vdd]).sized(2.0, 0.18);
    b.pmos("P2", [bb, a, vdd, vdd]).sized(2.0, 0.18);
    b.nmos("N3", [a, bb, gnd, gnd]).sized(1.0, 0.18);
    b.nmos("N4", [bb, a, gnd, gnd]).sized(1.0, 0.18);
    build(b.build())
}

/// Differential pair `M1`/`M2` with NMOS cascodes `M3`/`M4` on `VB`.
pub fn cascode() -> Netlist {
    let mut b = RawNetlist::builder();
    let (_vdd, gnd, tail) = (b.net("VDD"), b.net("GND"), b.net("VTAIL"));
    let (ing1, ing2, x1, x2) = (b.net("ING1"), b.net("ING2"), b.net("X1"), b.net("X2"));
    let (vb, outp, outn) = (b.net("VB"), b.net("OUTP"), b.net("OUTN"));
    b.nmos("M1", [x1, ing1, tail, gnd]).sized(1.0, 0.18);
    b.nmos("M2", [x2, ing2, tail, gnd]).sized(1.0, 0.18);
    b.nmos("M3", [outp, vb, x1, gnd]).sized(1.0, 0.18);
    b.nmos("M4", [outn, vb, x2, gnd]).sized(1.0, 0.18);
    build(b.build())
}

/// One transistor on four private nets.
pub fn isolated() -> Netlist {
    let mut b = RawNetlist::builder();
    let (d, g, s, bulk) = (b.net("D"), b.net("G"), b.net("S"), b.net("B"));
    b.nmos("M1", [d, g, s, bulk]);
    build(b.build())
}

/// Differential pair whose drains feed two unmatched transistors `M3`, `M4`
/// sharing a source net `Y`, which is in turn pulled down by `M5`.
pub fn unmatched_below_drains() -> Netlist {
    let mut b = RawNetlist::builder();
    let (gnd, tail) = (b.net("GND"), b.net("VTAIL"));
    let (inp, inn, outp, outn) = (b.net("INP"), b.net("INN"), b.net("OUTP"), b.net("OUTN"));
    let (g3, g4, y, g5) = (b.net("G3"), b.net("G4"), b.net("Y"), b.net("G5"));
    b.nmos("M1", [outp, inp, tail, gnd]).sized(1.0, 0.18);
    b.nmos("M2", [outn, inn, tail, gnd]).sized(1.0, 0.18);
    b.nmos("M3", [outp, g3, y, gnd]).sized(2.0, 0.18);
    b.nmos("M4", [outn, g4, y, gnd]).sized(3.0, 0.18);
    b.nmos("M5", [y, g5, gnd, gnd]).sized(5.0, 0.18);
    build(b.build())
}

/// Two-stage Miller-less OTA.
///
/// First stage `M1`/`M2` with PMOS loads `M3`/`M4` on `VBP` and tail `M5`;
/// second stage PMOS inputs `M6`/`M7` driven by the first-stage outputs,
/// NMOS loads `M8`/`M9` on `VBN`; diode references `M10` (VBN) and `M11`
/// (VBP).
pub fn two_stage_ota() -> Netlist {
    let mut b = RawNetlist::builder();
    let (gnd, tail, inp, inn) = (b.net("GND"), b.net("VTAIL"), b.net("INP"), b.net("INN"));
    let (o1, o2, vdd, vbp) = (b.net("O1"), b.net("O2"), b.net("VDD"), b.net("VBP"));
    let (outp, outn, vbn) = (b.net("OUTP"), b.net("OUTN"), b.net("VBN"));
    b.nmos("M1", [o1, inp, tail, gnd]).sized(2.0, 0.18);
    b.nmos("M2", [o2, inn, tail, gnd]).sized(2.0, 0.18);
    b.pmos("M3", [o1, vbp, vdd, vdd]).sized(2.0, 0.18);
    b.pmos("M4", [o2, vbp, vdd, vdd]).sized(2.0, 0.18);
    b.nmos("M5", [tail, vbn, gnd, gnd]).sized(8.0, 0.18);
    b.pmos("M6", [outp, o1, vdd, vdd]).sized(4.0, 0.18);
    b.pmos("M7", [outn, o2, vdd, vdd]).sized(4.0, 0.18);
    b.nmos("M8", [outp, vbn, gnd, gnd]).sized(4.0, 0.18);
    b.nmos("M9", [outn, vbn, gnd, gnd]).sized(4.0, 0.18);
    b.nmos("M10", [vbn, vbn, gnd, gnd]).sized(1.0, 0.18);
    b.pmos("M11", [vbp, vbp, vdd, vdd]).sized(1.0, 0.18);
    build(b.build())
}

/// Differential pair loaded by matched resistors `R1`/`R2`.
pub fn resistor_loads() -> Netlist {
    let mut b = RawNetlist::builder();
    let (gnd, tail, inp, inn) = (b.net("GND"), b.net("VTAIL"), b.net("INP"), b.net("INN"));
    let (outp, outn, vdd) = (b.net("OUTP"), b.net("OUTN"), b.net("VDD"));
    b.nmos("M1", [outp, inp, tail, gnd]).sized(1.0, 0.18);
    b.nmos("M2", [outn, inn, tail, gnd]).sized(1.0, 0.18);
    b.res("R1", [outp, vdd, gnd]).sized(1.0, 10.0);
    b.res("R2", [outn, vdd, gnd]).sized(1.0, 10.0);
    build(b.build())
}
