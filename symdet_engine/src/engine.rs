//! The full detection pipeline.

use std::collections::{BTreeMap, BTreeSet};

use symdet_common::{Config, DeviceId, Netlist};
use tracing::info;

use crate::bias::{self, BiasGroup};
use crate::pair::{MosPair, NetPair, SymmetryGroup};
use crate::report::SymmetryReport;
use crate::search::SymmetrySearch;

/// Symmetry detected in one netlist.
///
/// Construction runs the whole pipeline: seed discovery, group expansion,
/// self-symmetry completion, flattening, bias grouping and bias matching.
/// The results are owned; the netlist is borrowed only to name them.
///
/// ```
/// use symdet_common::{Netlist, RawNetlist};
/// use symdet_engine::SymmetryEngine;
///
/// let mut b = RawNetlist::builder();
/// let (o1, o2, inp, inn, tail, gnd) =
///     (b.net("O1"), b.net("O2"), b.net("INP"), b.net("INN"), b.net("T"), b.net("GND"));
/// b.nmos("M1", [o1, inp, tail, gnd]);
/// b.nmos("M2", [o2, inn, tail, gnd]);
/// let netlist = Netlist::build(&b.build()).unwrap();
///
/// let engine = SymmetryEngine::new(&netlist);
/// assert_eq!(engine.groups().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct SymmetryEngine<'n> {
    netlist: &'n Netlist,
    config: Config,
    groups: Vec<SymmetryGroup>,
    net_pairs: Vec<NetPair>,
    flat_pairs: Vec<MosPair>,
    bias_groups: Vec<BiasGroup>,
    bias_matches: BTreeMap<usize, BTreeSet<DeviceId>>,
}

impl<'n> SymmetryEngine<'n> {
    /// Runs the default pipeline over `netlist`.
    #[must_use]
    pub fn new(netlist: &'n Netlist) -> Self {
        Self::with_config(netlist, Config::default())
    }

    /// Runs the pipeline over `netlist` as configured.
    #[must_use]
    pub fn with_config(netlist: &'n Netlist, config: Config) -> Self {
        let detection = SymmetrySearch::new(netlist, &config).detect_groups();
        let flat_pairs = bias::flatten(&detection.groups);

        let (bias_groups, bias_matches) = if config.bias_matching {
            let bias_groups = bias::bias_groups(netlist, &flat_pairs);
            let matches = bias::bias_match(netlist, &detection.groups, &bias_groups);
            (bias_groups, matches)
        } else {
            (Vec::new(), BTreeMap::new())
        };

        info!(
            "{} symmetry groups, {} pairs, {} net pairs, {} bias groups",
            detection.groups.len(),
            flat_pairs.len(),
            detection.net_pairs.len(),
            bias_groups.len()
        );

        Self {
            netlist,
            config,
            groups: detection.groups,
            net_pairs: detection.net_pairs,
            flat_pairs,
            bias_groups,
            bias_matches,
        }
    }

    /// The analysed netlist.
    #[must_use]
    pub const fn netlist(&self) -> &'n Netlist {
        self.netlist
    }

    /// Configuration the pipeline ran with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Structural groups, one per searched seed.
    #[must_use]
    pub fn groups(&self) -> &[SymmetryGroup] {
        &self.groups
    }

    /// Symmetric nets.
    #[must_use]
    pub fn net_pairs(&self) -> &[NetPair] {
        &self.net_pairs
    }

    /// Every pair of every group, in group order.
    #[must_use]
    pub fn flat_pairs(&self) -> &[MosPair] {
        &self.flat_pairs
    }

    /// Unpaired bias clusters.
    #[must_use]
    pub fn bias_groups(&self) -> &[BiasGroup] {
        &self.bias_groups
    }

    /// Bias devices attached to each structural group, keyed by group index.
    #[must_use]
    pub const fn bias_matches(&self) -> &BTreeMap<usize, BTreeSet<DeviceId>> {
        &self.bias_matches
    }

    /// Named, serializable view of the result.
    #[must_use]
    pub fn report(&self) -> SymmetryReport {
        SymmetryReport::new(self)
    }
}

#[cfg(test)]
mod property_tests {
    use std::collections::BTreeSet;

    use quickcheck::quickcheck;

    use super::*;
    use crate::pattern::Classifier;
    use crate::test_support::ArbitraryCircuit;

    quickcheck! {
        fn prop_runs_are_deterministic(circuit: ArbitraryCircuit) -> bool {
            let netlist = circuit.netlist();
            SymmetryEngine::new(&netlist).report() == SymmetryEngine::new(&netlist).report()
        }

        fn prop_no_pair_is_emitted_twice(circuit: ArbitraryCircuit) -> bool {
            let netlist = circuit.netlist();
            let engine = SymmetryEngine::new(&netlist);
            let mut seen = BTreeSet::new();
            let unique = engine.flat_pairs().iter().all(|pair| seen.insert(pair.key()));
            unique
        }

        fn prop_bias_devices_are_unpaired(circuit: ArbitraryCircuit) -> bool {
            let netlist = circuit.netlist();
            let engine = SymmetryEngine::new(&netlist);
            let paired: BTreeSet<DeviceId> =
                engine.flat_pairs().iter().flat_map(MosPair::devices).collect();
            let disjoint = engine
                .bias_groups()
                .iter()
                .all(|group| group.devices.is_disjoint(&paired));
            disjoint
        }

        fn prop_emitted_pairs_are_admissible(circuit: ArbitraryCircuit) -> bool {
            let netlist = circuit.netlist();
            let engine = SymmetryEngine::new(&netlist);
            let classifier = Classifier::new(&netlist);
            let admissible = engine
                .flat_pairs()
                .iter()
                .filter(|pair| !pair.is_self_symmetric())
                .all(|pair| {
                    let (a, b) = (pair.first(), pair.second());
                    let same_role = match (pair.via_first(), pair.via_second()) {
                        (Some(pa), Some(pb)) => netlist.pin(pa).role() == netlist.pin(pb).role(),
                        _ => false,
                    };
                    let shape = if netlist.is_transistor(a) && netlist.is_transistor(b) {
                        classifier.classify(a, b).is_valid()
                    } else {
                        netlist.is_passive(a) && netlist.is_passive(b) && classifier.matched(a, b)
                    };
                    a != b && same_role && shape
                });
            admissible
        }
    }
}
