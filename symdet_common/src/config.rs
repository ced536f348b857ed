//! Configuration for the symmetry search.
//!
//! The default configuration runs the full pipeline: seed discovery on
//! `DIFF_SOURCE` and `CROSS_LOAD` pairs, depth-first expansion with the
//! two-stage gate rule and passive pairs, self-symmetry completion, and bias
//! grouping/matching.
//!
//! ```
//! use symdet_common::{Config, MosPattern};
//!
//! let cfg = Config::builder()
//!     .seed_patterns(vec![MosPattern::DiffSource])
//!     .self_symmetry(false)
//!     .build();
//! assert!(cfg.bias_matching);
//! ```

use serde::{Deserialize, Serialize};

use crate::MosPattern;

/// Global search configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Patterns scanned by seed discovery, in processing order.
    pub seed_patterns: Vec<MosPattern>,
    /// Whether gate-reached `DIFF_SOURCE` pairs (second-stage inputs) are admitted.
    pub gate_carry: bool,
    /// Whether same-kind, same-size passive pairs are admitted as terminal pairs.
    pub passive_pairs: bool,
    /// Whether axis devices are folded into groups as self-symmetric singles.
    pub self_symmetry: bool,
    /// Whether unclaimed bias devices are grouped and matched to groups.
    pub bias_matching: bool,
}

impl Config {
    /// Start building a configuration from the defaults.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Structural pair and net detection only; no self-symmetry or bias stages.
    #[must_use]
    pub fn structural_only() -> Self {
        Self::builder()
            .self_symmetry(false)
            .bias_matching(false)
            .build()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_patterns: vec![MosPattern::DiffSource, MosPattern::CrossLoad],
            gate_carry: true,
            passive_pairs: true,
            self_symmetry: true,
            bias_matching: true,
        }
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    /// Configuration under construction.
    config: Config,
}

impl ConfigBuilder {
    /// Set the seed patterns.
    #[must_use]
    pub fn seed_patterns(mut self, patterns: Vec<MosPattern>) -> Self {
        self.config.seed_patterns = patterns;
        self
    }

    /// Enable or disable the two-stage gate rule.
    #[must_use]
    pub const fn gate_carry(mut self, enabled: bool) -> Self {
        self.config.gate_carry = enabled;
        self
    }

    /// Enable or disable passive pairs.
    #[must_use]
    pub const fn passive_pairs(mut self, enabled: bool) -> Self {
        self.config.passive_pairs = enabled;
        self
    }

    /// Enable or disable self-symmetry completion.
    #[must_use]
    pub const fn self_symmetry(mut self, enabled: bool) -> Self {
        self.config.self_symmetry = enabled;
        self
    }

    /// Enable or disable bias grouping and matching.
    #[must_use]
    pub const fn bias_matching(mut self, enabled: bool) -> Self {
        self.config.bias_matching = enabled;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
