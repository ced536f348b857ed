//! Bias-device grouping and matching.
//!
//! Devices left out of every structural group but sharing a gate net with
//! a grouped pair (current-mirror references, bias diodes) are clustered by
//! gate connectivity and attached to the groups they bias.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use symdet_common::{DeviceId, NetId, Netlist, PinType};
use tracing::debug;

use crate::pair::{MosPair, SymmetryGroup};

/// Unpaired transistors tied together through their gate nets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasGroup {
    /// Gate nets spanned by the group.
    pub nets: BTreeSet<NetId>,
    /// Member devices.
    pub devices: BTreeSet<DeviceId>,
}

/// Every pair of every group, in group order.
#[must_use]
pub fn flatten(groups: &[SymmetryGroup]) -> Vec<MosPair> {
    groups
        .iter()
        .flat_map(|group| group.pairs().iter().copied())
        .collect()
}

/// Gate net shared by both sides of `pair`, if any.
///
/// A self-symmetric transistor biases through its own gate.
#[must_use]
pub fn com_bias(netlist: &Netlist, pair: &MosPair) -> Option<NetId> {
    let (a, b) = (pair.first(), pair.second());
    if !netlist.is_transistor(a) || !netlist.is_transistor(b) {
        return None;
    }
    let gate_a = netlist.net_of_terminal(a, PinType::Gate)?;
    let gate_b = netlist.net_of_terminal(b, PinType::Gate)?;
    (gate_a == gate_b).then_some(gate_a)
}

/// Clusters unclaimed transistors reachable from the common bias nets of
/// `flat_pairs`.
///
/// Starting from each bias net, every unclaimed transistor on the net joins
/// the group and its own gate net is followed in turn.
#[must_use]
pub fn bias_groups(netlist: &Netlist, flat_pairs: &[MosPair]) -> Vec<BiasGroup> {
    let claimed: BTreeSet<DeviceId> = flat_pairs.iter().flat_map(MosPair::devices).collect();
    let mut biased = BTreeSet::new();
    let mut groups: Vec<BiasGroup> = Vec::new();

    for pair in flat_pairs {
        let Some(start) = com_bias(netlist, pair) else {
            continue;
        };
        if groups.iter().any(|group| group.nets.contains(&start)) {
            continue;
        }

        let mut group = BiasGroup::default();
        let mut queue = VecDeque::from([start]);
        while let Some(net) = queue.pop_front() {
            if !group.nets.insert(net) {
                continue;
            }
            for device in netlist.devices_on_net(net) {
                if !netlist.is_transistor(device)
                    || claimed.contains(&device)
                    || !biased.insert(device)
                {
                    continue;
                }
                group.devices.insert(device);
                queue.extend(netlist.net_of_terminal(device, PinType::Gate));
            }
        }

        if !group.devices.is_empty() {
            debug!(
                "bias group {} on {} nets with {} devices",
                groups.len(),
                group.nets.len(),
                group.devices.len()
            );
            groups.push(group);
        }
    }

    groups
}

/// Bias devices attached to each structural group, keyed by group index.
///
/// A group is matched to every bias group containing one of its pairs'
/// common bias nets. Groups with no match are absent.
#[must_use]
pub fn bias_match(
    netlist: &Netlist,
    groups: &[SymmetryGroup],
    bias_groups: &[BiasGroup],
) -> BTreeMap<usize, BTreeSet<DeviceId>> {
    let mut matches: BTreeMap<usize, BTreeSet<DeviceId>> = BTreeMap::new();

    for (index, group) in groups.iter().enumerate() {
        for net in group.pairs().iter().filter_map(|pair| com_bias(netlist, pair)) {
            for bias in bias_groups.iter().filter(|bias| bias.nets.contains(&net)) {
                matches
                    .entry(index)
                    .or_default()
                    .extend(bias.devices.iter().copied());
            }
        }
    }

    matches
}
