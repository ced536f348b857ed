//! Symmetry detection over analog netlists.
//!
//! [`SymmetryEngine`] finds device pairs that must be placed mirror
//! symmetric, the nets they make symmetric, and the unpaired bias devices
//! serving each group. [`Classifier`] is the pairwise pattern test the
//! search is built on.

pub mod bias;
mod engine;
mod pair;
mod pattern;
mod report;
mod search;
mod self_sym;

#[cfg(test)]
mod test_support;

pub use bias::BiasGroup;
pub use engine::SymmetryEngine;
pub use pair::{MosPair, NetPair, PairKey, SymmetryGroup};
pub use pattern::Classifier;
pub use report::{BiasGroupReport, GroupReport, NetPairReport, PairReport, SymmetryReport};
pub use search::{Detection, SymmetrySearch};
