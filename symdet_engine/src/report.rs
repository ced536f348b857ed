//! Named, serializable rendering of a detection result.

use std::fmt;

use serde::{Deserialize, Serialize};
use symdet_common::{DeviceId, MosPattern, NetId, Netlist};

use crate::engine::SymmetryEngine;
use crate::pair::{MosPair, NetPair};
use crate::pattern::Classifier;

/// Detection result with devices and nets referred to by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymmetryReport {
    /// Structural groups in discovery order.
    pub groups: Vec<GroupReport>,
    /// Symmetric nets.
    pub net_pairs: Vec<NetPairReport>,
    /// Bias clusters and the groups they attach to.
    pub bias_groups: Vec<BiasGroupReport>,
}

/// One structural group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    /// Pairs and self-symmetric singles.
    pub pairs: Vec<PairReport>,
    /// Bias devices matched to this group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bias_devices: Vec<String>,
}

/// One device pair or self-symmetric single.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairReport {
    /// First side.
    pub first: String,
    /// Second side, equal to `first` for singles.
    pub second: String,
    /// Transistor pattern; absent for singles and passive pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<MosPattern>,
}

/// One symmetric net pair or self-symmetric net.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPairReport {
    /// Smaller-id net.
    pub first: String,
    /// Larger-id net, equal to `first` for self-symmetric nets.
    pub second: String,
}

/// One bias cluster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasGroupReport {
    /// Gate nets spanned.
    pub nets: Vec<String>,
    /// Member devices.
    pub devices: Vec<String>,
    /// Indices of the structural groups it biases.
    pub groups: Vec<usize>,
}

impl SymmetryReport {
    pub(crate) fn new(engine: &SymmetryEngine<'_>) -> Self {
        let netlist = engine.netlist();
        let classifier = Classifier::new(netlist);

        let groups = engine
            .groups()
            .iter()
            .enumerate()
            .map(|(index, group)| GroupReport {
                pairs: group
                    .pairs()
                    .iter()
                    .map(|pair| PairReport::new(netlist, &classifier, pair))
                    .collect(),
                bias_devices: engine
                    .bias_matches()
                    .get(&index)
                    .map(|devices| device_names(netlist, devices.iter().copied()))
                    .unwrap_or_default(),
            })
            .collect();

        let net_pairs = engine
            .net_pairs()
            .iter()
            .map(|pair| NetPairReport::new(netlist, pair))
            .collect();

        let bias_groups = engine
            .bias_groups()
            .iter()
            .map(|bias| BiasGroupReport {
                nets: bias.nets.iter().map(|&n| net_name(netlist, n)).collect(),
                devices: device_names(netlist, bias.devices.iter().copied()),
                groups: engine
                    .bias_matches()
                    .iter()
                    .filter(|(_, devices)| !devices.is_disjoint(&bias.devices))
                    .map(|(&index, _)| index)
                    .collect(),
            })
            .collect();

        Self {
            groups,
            net_pairs,
            bias_groups,
        }
    }
}

impl PairReport {
    fn new(netlist: &Netlist, classifier: &Classifier<'_>, pair: &MosPair) -> Self {
        let pattern = classifier.classify(pair.first(), pair.second());
        Self {
            first: netlist.device(pair.first()).name().to_owned(),
            second: netlist.device(pair.second()).name().to_owned(),
            pattern: pattern.is_valid().then_some(pattern),
        }
    }

    /// Returns true for self-symmetric singles.
    #[must_use]
    pub fn is_self_symmetric(&self) -> bool {
        self.first == self.second
    }
}

impl NetPairReport {
    fn new(netlist: &Netlist, pair: &NetPair) -> Self {
        Self {
            first: net_name(netlist, pair.first()),
            second: net_name(netlist, pair.second()),
        }
    }
}

fn device_names(netlist: &Netlist, devices: impl IntoIterator<Item = DeviceId>) -> Vec<String> {
    devices
        .into_iter()
        .map(|device| netlist.device(device).name().to_owned())
        .collect()
}

fn net_name(netlist: &Netlist, net: NetId) -> String {
    netlist.net(net).name().to_owned()
}

impl fmt::Display for PairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_self_symmetric() {
            return write!(f, "{} (self)", self.first);
        }
        write!(f, "{} <-> {}", self.first, self.second)?;
        if let Some(pattern) = self.pattern {
            write!(f, " {pattern}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SymmetryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, group) in self.groups.iter().enumerate() {
            writeln!(f, "group {index}")?;
            for pair in &group.pairs {
                writeln!(f, "  {pair}")?;
            }
            if !group.bias_devices.is_empty() {
                writeln!(f, "  bias: {}", group.bias_devices.join(", "))?;
            }
        }
        if !self.net_pairs.is_empty() {
            writeln!(f, "nets")?;
            for pair in &self.net_pairs {
                if pair.first == pair.second {
                    writeln!(f, "  {} (self)", pair.first)?;
                } else {
                    writeln!(f, "  {} <-> {}", pair.first, pair.second)?;
                }
            }
        }
        for (index, bias) in self.bias_groups.iter().enumerate() {
            writeln!(
                f,
                "bias {index}: {} on {}",
                bias.devices.join(", "),
                bias.nets.join(", ")
            )?;
        }
        Ok(())
    }
}
