//! Self-symmetry completion.
//!
//! Devices on the axis of a differential pair (tail sources, common-mode
//! cascodes) have no partner to mirror. They are folded into the pair's
//! group as self-symmetric singles.

use std::collections::{BTreeSet, VecDeque};

use symdet_common::{DeviceId, MosPattern, MosType, NetId, PinType};
use tracing::debug;

use crate::pair::{MosPair, SymmetryGroup};
use crate::search::{SearchState, SymmetrySearch};

impl SymmetrySearch<'_> {
    /// `DIFF`-class transistors whose drain sits on `net`.
    #[must_use]
    pub fn drain_connected_diff(&self, net: NetId) -> BTreeSet<DeviceId> {
        let on_net = self.netlist.devices_on_net(net);
        let drained = self
            .netlist
            .filter_by_terminal_role_on_net(on_net, net, PinType::Drain);
        self.netlist.filter_by_mos_type(drained, MosType::Diff)
    }

    /// Runs [`Self::self_symmetry_search`] from every `DIFF_SOURCE` pair
    /// already in `group`.
    pub(crate) fn add_self_symmetry(&self, group: &mut SymmetryGroup, state: &SearchState) {
        let diff_pairs: Vec<MosPair> = group
            .pairs()
            .iter()
            .copied()
            .filter(|pair| {
                !pair.is_self_symmetric()
                    && self.classifier.classify(pair.first(), pair.second())
                        == MosPattern::DiffSource
            })
            .collect();

        for pair in diff_pairs {
            self.self_symmetry_search(group, &pair, state);
        }
    }

    /// Breadth-first walk down from the drains and shared source of
    /// `pair`, adding every unpaired `DIFF` transistor found by its drain
    /// and continuing from that transistor's source.
    pub(crate) fn self_symmetry_search(
        &self,
        group: &mut SymmetryGroup,
        pair: &MosPair,
        state: &SearchState,
    ) {
        let mut queue: VecDeque<NetId> = [PinType::Drain, PinType::Source]
            .into_iter()
            .flat_map(|role| {
                [
                    self.netlist.net_of_terminal(pair.first(), role),
                    self.netlist.net_of_terminal(pair.second(), role),
                ]
            })
            .flatten()
            .collect();
        let mut searched = BTreeSet::new();

        while let Some(net) = queue.pop_front() {
            if !searched.insert(net) {
                continue;
            }
            for device in self.drain_connected_diff(net) {
                if group.contains_device(device) || state.claimed_devices.contains(&device) {
                    continue;
                }
                debug!("self-symmetric {device} below {pair}");
                group.push(MosPair::self_symmetric(device));
                queue.extend(self.netlist.net_of_terminal(device, PinType::Source));
            }
        }
    }
}
