//! Seed discovery and depth-first group expansion.
//!
//! A search starts from seed pairs (differential inputs and cross-coupled
//! loads whose sources share a net) and walks outwards along the conduction
//! path: a pair reached through its sources continues through its drains,
//! and the other way around. Each seed yields one group; pairs reached from
//! a seed invalidate any pending seed with the same devices.

use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use symdet_common::{Config, DeviceId, MosPattern, MosType, Netlist, PinId, PinType};
use tracing::{debug, trace};

use crate::pair::{MosPair, NetPair, PairKey, SymmetryGroup};
use crate::pattern::Classifier;

/// Mutable state of one detection run, shared across the groups it builds.
#[derive(Clone, Debug, Default)]
pub(crate) struct SearchState {
    /// Seeds not yet searched or absorbed, in processing order.
    pub(crate) pending: IndexMap<PairKey, MosPair>,
    /// Pair keys emitted by finished groups.
    pub(crate) claimed: BTreeSet<PairKey>,
    /// Devices belonging to finished groups.
    pub(crate) claimed_devices: BTreeSet<DeviceId>,
    /// Symmetric nets, in discovery order.
    pub(crate) net_pairs: IndexSet<NetPair>,
}

impl SearchState {
    /// Marks every pair and device of a finished group as taken.
    pub(crate) fn claim(&mut self, group: &SymmetryGroup) {
        self.claimed.extend(group.pairs().iter().map(MosPair::key));
        self.claimed_devices.extend(group.devices());
    }
}

/// Groups and net pairs produced by [`SymmetrySearch::detect_groups`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Detection {
    /// One group per searched seed.
    pub groups: Vec<SymmetryGroup>,
    /// Symmetric nets collected alongside the groups.
    pub net_pairs: Vec<NetPair>,
}

/// Symmetry search over one netlist.
#[derive(Clone, Copy, Debug)]
pub struct SymmetrySearch<'n> {
    pub(crate) netlist: &'n Netlist,
    pub(crate) classifier: Classifier<'n>,
    pub(crate) config: &'n Config,
}

impl<'n> SymmetrySearch<'n> {
    /// Search over `netlist` with `config`.
    #[must_use]
    pub const fn new(netlist: &'n Netlist, config: &'n Config) -> Self {
        Self {
            netlist,
            classifier: Classifier::new(netlist),
            config,
        }
    }

    // ##########################
    // Seeds
    // ##########################

    /// Pairs of `DIFF`-class transistors whose sources share a net and
    /// whose classification is `pattern`.
    ///
    /// Nets are scanned in ascending id order and each pair is reported once,
    /// reached through its source pins.
    #[must_use]
    pub fn collect_seeds(&self, pattern: MosPattern) -> Vec<MosPair> {
        let mut seen = BTreeSet::new();
        let mut seeds = Vec::new();

        for net in self.netlist.net_ids() {
            let on_net = self.netlist.devices_on_net(net);
            let sourced = self
                .netlist
                .filter_by_terminal_role_on_net(on_net, net, PinType::Source);
            let candidates = self.netlist.filter_by_mos_type(sourced, MosType::Diff);

            for (a, b) in candidates.iter().copied().tuple_combinations() {
                if self.classifier.classify(a, b) != pattern || !seen.insert(PairKey::new(a, b)) {
                    continue;
                }
                let (Some(pa), Some(pb)) = (
                    self.netlist.pin_of_terminal(a, PinType::Source),
                    self.netlist.pin_of_terminal(b, PinType::Source),
                ) else {
                    continue;
                };
                seeds.push(MosPair::new(a, b, pa, pb));
            }
        }

        debug!("{} {pattern} seeds", seeds.len());
        seeds
    }

    // ##########################
    // Validity and termination
    // ##########################

    /// Role of the terminal `pair` was reached through, or `None` for
    /// self-symmetric singles.
    #[must_use]
    pub fn via_role(&self, pair: &MosPair) -> Option<PinType> {
        pair.via_first().map(|pin| self.netlist.pin(pin).role())
    }

    /// Ordinary continuation: two transistors reached through the same
    /// non-gate role that form a valid pattern.
    #[must_use]
    pub fn valid_expansion(&self, a: DeviceId, b: DeviceId, via_a: PinId, via_b: PinId) -> bool {
        let (role_a, role_b) = (self.netlist.pin(via_a).role(), self.netlist.pin(via_b).role());
        self.netlist.is_transistor(a)
            && self.netlist.is_transistor(b)
            && role_a == role_b
            && role_a != PinType::Gate
            && self.classifier.classify(a, b).is_valid()
    }

    /// Two-stage rule: a differential input pair driven through its gates.
    #[must_use]
    pub fn valid_gate_carry(&self, a: DeviceId, b: DeviceId, via_a: PinId, via_b: PinId) -> bool {
        self.config.gate_carry
            && self.netlist.pin(via_a).role() == PinType::Gate
            && self.netlist.pin(via_b).role() == PinType::Gate
            && self.classifier.classify(a, b) == MosPattern::DiffSource
    }

    /// Two passives of the same kind and size reached through the same role.
    #[must_use]
    pub fn valid_passive_pair(&self, a: DeviceId, b: DeviceId, via_a: PinId, via_b: PinId) -> bool {
        self.config.passive_pairs
            && self.netlist.is_passive(a)
            && self.netlist.is_passive(b)
            && self.classifier.matched(a, b)
            && self.netlist.pin(via_a).role() == self.netlist.pin(via_b).role()
    }

    /// Returns true if the search records `pair` but does not expand it.
    #[must_use]
    pub fn is_terminal(&self, pair: &MosPair) -> bool {
        if pair.is_self_symmetric() {
            return true;
        }
        let (a, b) = (pair.first(), pair.second());
        if !self.netlist.is_transistor(a) || !self.netlist.is_transistor(b) {
            return true;
        }
        let via = self.via_role(pair);
        if via == Some(PinType::Gate) {
            return true;
        }
        match self.classifier.classify(a, b) {
            MosPattern::Load | MosPattern::CrossLoad => true,
            MosPattern::DiffSource => via == Some(PinType::Drain),
            _ => false,
        }
    }

    // ##########################
    // Expansion
    // ##########################

    /// Pushes every admissible pair one step along the conduction path from
    /// `current`. Admitted pairs are removed from the pending seeds.
    ///
    /// Candidates are formed in ascending device order and pushed so that
    /// they pop in that order.
    pub(crate) fn push_next_candidates(
        &self,
        current: &MosPair,
        visited: &BTreeSet<PairKey>,
        stack: &mut Vec<MosPair>,
        state: &mut SearchState,
    ) {
        let Some(next) = self.via_role(current).and_then(PinType::next) else {
            return;
        };
        let (first, second) = (current.first(), current.second());
        let (Some(net_a), Some(net_b)) = (
            self.netlist.net_of_terminal(first, next),
            self.netlist.net_of_terminal(second, next),
        ) else {
            return;
        };

        let side_a = self.netlist.devices_on_net_excluding(net_a, first);
        let side_b = self.netlist.devices_on_net_excluding(net_b, second);

        let mut admitted = Vec::new();
        let mut formed = BTreeSet::new();
        for (&a, &b) in side_a.iter().cartesian_product(side_b.iter()) {
            if a == b {
                continue;
            }
            let key = PairKey::new(a, b);
            if visited.contains(&key) || state.claimed.contains(&key) || !formed.insert(key) {
                continue;
            }
            let (Some(via_a), Some(via_b)) = (
                self.netlist.pin_on_net(a, net_a),
                self.netlist.pin_on_net(b, net_b),
            ) else {
                continue;
            };

            if self.valid_expansion(a, b, via_a, via_b)
                || self.valid_gate_carry(a, b, via_a, via_b)
                || self.valid_passive_pair(a, b, via_a, via_b)
            {
                trace!("admit {key} from {current} via {next}");
                if state.pending.shift_remove(&key).is_some() {
                    debug!("seed {key} absorbed by {current}");
                }
                admitted.push(MosPair::new(a, b, via_a, via_b));
            } else {
                trace!("reject {key} from {current} via {next}");
            }
        }

        stack.extend(admitted.into_iter().rev());
    }

    /// Depth-first expansion of one seed into a group.
    pub(crate) fn dfs_group(&self, seed: MosPair, state: &mut SearchState) -> SymmetryGroup {
        state.pending.shift_remove(&seed.key());

        let mut group = SymmetryGroup::default();
        let mut visited = BTreeSet::new();
        let mut stack = vec![seed];

        while let Some(current) = stack.pop() {
            let key = current.key();
            if state.claimed.contains(&key) || !visited.insert(key) {
                continue;
            }
            group.push(current);
            self.add_sym_nets(&current, state);

            if !self.is_terminal(&current) {
                self.push_next_candidates(&current, &visited, &mut stack, state);
            }
        }

        group
    }

    /// Records the nets that `pair` makes symmetric: for every terminal of
    /// the first side other than the one it was reached through, the net of
    /// the same-role terminal on the second side.
    pub(crate) fn add_sym_nets(&self, pair: &MosPair, state: &mut SearchState) {
        if pair.is_self_symmetric() {
            return;
        }
        let via = self.via_role(pair);
        let (first, second) = (pair.first(), pair.second());

        for &pin in self.netlist.device(first).pins() {
            let pin = self.netlist.pin(pin);
            if Some(pin.role()) == via {
                continue;
            }
            let Some(net_b) = self.netlist.net_of_terminal(second, pin.role()) else {
                continue;
            };
            let net_a = pin.net();
            if net_a == net_b {
                state.net_pairs.insert(NetPair::self_symmetric(net_a));
            } else if self.netlist.pin_count(net_a) == self.netlist.pin_count(net_b) {
                state.net_pairs.insert(NetPair::new(net_a, net_b));
            }
        }
    }

    // ##########################
    // Top level
    // ##########################

    /// Seeds for every configured pattern, keyed for invalidation, in
    /// processing order.
    pub(crate) fn pending_seeds(&self) -> IndexMap<PairKey, MosPair> {
        let mut pending = IndexMap::new();
        for &pattern in &self.config.seed_patterns {
            for seed in self.collect_seeds(pattern) {
                pending.entry(seed.key()).or_insert(seed);
            }
        }
        pending
    }

    /// Runs seed discovery and group expansion to completion, folding in
    /// self-symmetric singles when enabled.
    #[must_use]
    pub fn detect_groups(&self) -> Detection {
        let mut state = SearchState {
            pending: self.pending_seeds(),
            ..SearchState::default()
        };
        let mut groups = Vec::new();

        while let Some((_, seed)) = state.pending.shift_remove_index(0) {
            let mut group = self.dfs_group(seed, &mut state);
            if group.is_empty() {
                continue;
            }
            if self.config.self_symmetry {
                self.add_self_symmetry(&mut group, &state);
            }
            debug!("group {} from seed {seed}: {} pairs", groups.len(), group.len());
            state.claim(&group);
            groups.push(group);
        }

        Detection {
            groups,
            net_pairs: state.net_pairs.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use symdet_common::RawNetlist;

    use super::*;

    /// Differential pair over a tail net with PMOS mirror loads.
    fn ota() -> Netlist {
        let mut b = RawNetlist::builder();
        let (vdd, gnd, tail) = (b.net("VDD"), b.net("GND"), b.net("VTAIL"));
        let (inp, inn, x, out, vbn) = (
            b.net("INP"),
            b.net("INN"),
            b.net("X"),
            b.net("OUT"),
            b.net("VBN"),
        );
        b.nmos("M1", [x, inp, tail, gnd]).sized(2.0, 0.5);
        b.nmos("M2", [out, inn, tail, gnd]).sized(2.0, 0.5);
        b.pmos("M3", [x, x, vdd, vdd]).sized(4.0, 0.5);
        b.pmos("M4", [out, x, vdd, vdd]).sized(4.0, 0.5);
        b.nmos("M5", [tail, vbn, gnd, gnd]).sized(4.0, 1.0);
        Netlist::build(&b.build()).unwrap()
    }

    fn device(netlist: &Netlist, name: &str) -> DeviceId {
        netlist.device_by_name(name).unwrap()
    }

    #[test]
    fn test_seed_uses_source_pins() {
        let netlist = ota();
        let config = Config::default();
        let search = SymmetrySearch::new(&netlist, &config);

        let seeds = search.collect_seeds(MosPattern::DiffSource);
        assert_eq!(seeds.len(), 1);
        let seed = seeds[0];
        assert_eq!(seed.key(), PairKey::new(device(&netlist, "M1"), device(&netlist, "M2")));
        assert_eq!(search.via_role(&seed), Some(PinType::Source));
        assert!(!search.is_terminal(&seed));
        assert!(search.collect_seeds(MosPattern::CrossLoad).is_empty());
    }

    #[test]
    fn test_expansion_reaches_loads_through_drains() {
        let netlist = ota();
        let config = Config::default();
        let search = SymmetrySearch::new(&netlist, &config);
        let mut state = SearchState::default();
        let mut stack = Vec::new();

        let seed = search.collect_seeds(MosPattern::DiffSource)[0];
        search.push_next_candidates(&seed, &BTreeSet::new(), &mut stack, &mut state);

        let (m3, m4) = (device(&netlist, "M3"), device(&netlist, "M4"));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].key(), PairKey::new(m3, m4));
        assert_eq!(search.via_role(&stack[0]), Some(PinType::Drain));
        assert!(search.is_terminal(&stack[0]));
    }

    #[test]
    fn test_gate_role_blocks_plain_expansion() {
        let netlist = ota();
        let config = Config::default();
        let search = SymmetrySearch::new(&netlist, &config);
        let (m1, m2) = (device(&netlist, "M1"), device(&netlist, "M2"));
        let gate = |d| netlist.pin_of_terminal(d, PinType::Gate).unwrap();

        assert!(!search.valid_expansion(m1, m2, gate(m1), gate(m2)));
        assert!(search.valid_gate_carry(m1, m2, gate(m1), gate(m2)));

        let no_carry = Config::builder().gate_carry(false).build();
        let search = SymmetrySearch::new(&netlist, &no_carry);
        assert!(!search.valid_gate_carry(m1, m2, gate(m1), gate(m2)));
    }

    #[test]
    fn test_diff_source_through_drain_is_terminal() {
        let netlist = ota();
        let config = Config::default();
        let search = SymmetrySearch::new(&netlist, &config);
        let (m1, m2) = (device(&netlist, "M1"), device(&netlist, "M2"));
        let drain = |d| netlist.pin_of_terminal(d, PinType::Drain).unwrap();

        let pair = MosPair::new(m1, m2, drain(m1), drain(m2));
        assert!(search.is_terminal(&pair));
        assert!(search.is_terminal(&MosPair::self_symmetric(m1)));
    }

    #[test]
    fn test_sym_nets_follow_roles() {
        let netlist = ota();
        let config = Config::default();
        let search = SymmetrySearch::new(&netlist, &config);
        let mut state = SearchState::default();

        let seed = search.collect_seeds(MosPattern::DiffSource)[0];
        search.add_sym_nets(&seed, &mut state);

        let net = |name| netlist.net_by_name(name).unwrap();
        assert!(state.net_pairs.contains(&NetPair::new(net("INP"), net("INN"))));
        assert!(state.net_pairs.contains(&NetPair::self_symmetric(net("GND"))));
        // X carries the mirror gates and has more pins than OUT.
        assert!(!state.net_pairs.contains(&NetPair::new(net("X"), net("OUT"))));
        assert!(!state.net_pairs.contains(&NetPair::self_symmetric(net("VTAIL"))));
    }

    #[test]
    fn test_detect_groups_claims_each_pair_once() {
        let netlist = ota();
        let config = Config::structural_only();
        let detection = SymmetrySearch::new(&netlist, &config).detect_groups();

        assert_eq!(detection.groups.len(), 1);
        let keys: Vec<PairKey> = detection.groups[0].pairs().iter().map(MosPair::key).collect();
        assert_eq!(
            keys,
            vec![
                PairKey::new(device(&netlist, "M1"), device(&netlist, "M2")),
                PairKey::new(device(&netlist, "M3"), device(&netlist, "M4")),
            ]
        );
    }
}
