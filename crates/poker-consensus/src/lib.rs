//! Consensus analytics for planning-poker rooms.
//!
//! Pure derivations over a vote snapshot: per-option histograms,
//! descriptive statistics, a tiered consensus classification, and a
//! human-readable recommendation. Everything here is deterministic and
//! side-effect free so the same snapshot always produces the same output.

pub mod engine;
pub mod scales;
pub mod statistics;

mod recommendation;

pub use engine::{analyze, ConsensusInfo, ConsensusLevel, GroupedOption, VoteAnalysis};
pub use scales::{by_name, ScaleOption, VotingScale, ALL, DEFAULT, SENTINEL_VALUE};
pub use statistics::Statistics;
