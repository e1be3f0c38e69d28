//! Consensus classification over a vote snapshot.
//!
//! `analyze` partitions a snapshot into sentinel and estimate votes, builds
//! the per-option histogram, computes descriptive statistics, and runs the
//! tiered classification. The thresholds are behavior-compatibility
//! constants, not tunables.

use std::collections::HashMap;

use poker_protocol::VoteEntry;
use serde::Serialize;
use tracing::debug;

use crate::recommendation;
use crate::scales::VotingScale;
use crate::statistics::{describe, Statistics};

/// Plurality share that counts as a meaningful winner.
const MEANINGFUL_WINNER_PCT: f64 = 40.0;
/// Plurality share that upgrades a tight-range base to Excellent.
const DOMINANT_WINNER_PCT: f64 = 70.0;
/// Sentinel share at which voting should pause.
const SENTINEL_PAUSE_PCT: f64 = 50.0;
/// Share of votes the core option set must cover.
const CORE_COVERAGE_PCT: usize = 70;
/// Reported percentage never drops below this outside the explicit
/// zero branches.
const FLOOR_PCT: u8 = 10;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Qualitative consensus grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusLevel {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ConsensusLevel {
    /// UI color token for this grade.
    pub fn color(self) -> &'static str {
        match self {
            Self::Excellent => "green",
            Self::Good => "lime",
            Self::Fair => "amber",
            Self::Poor => "red",
        }
    }

    fn downgraded(self, tiers: u8) -> Self {
        let mut level = self;
        for _ in 0..tiers {
            level = match level {
                Self::Excellent => Self::Good,
                Self::Good => Self::Fair,
                Self::Fair | Self::Poor => Self::Poor,
            };
        }
        level
    }
}

impl std::fmt::Display for ConsensusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        };
        f.write_str(label)
    }
}

/// Consensus grade plus the numbers behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusInfo {
    pub level: ConsensusLevel,
    /// Penalized agreement score, 0–100.
    pub consensus_pct: u8,
    /// Raw share of the plurality option, 0–100. Reported for display,
    /// independent of penalties.
    pub mode_pct: u8,
    pub recommendation: String,
    pub color: &'static str,
}

/// One bar of the vote histogram. Every scale option appears, zero counts
/// included, ordered by ascending rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedOption {
    pub value: &'static str,
    pub rate: u32,
    pub count: usize,
}

/// Full derived analytics for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteAnalysis {
    pub grouped: Vec<GroupedOption>,
    pub statistics: Statistics,
    pub consensus: ConsensusInfo,
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

struct Tally {
    /// Cast votes per option, in scale order (sentinel first).
    counts: Vec<usize>,
    /// Voters present in the room, including those who have not voted.
    present: usize,
    /// Sentinel votes.
    sentinel: usize,
    /// Rates of the estimate votes, one entry per vote.
    rates: Vec<u32>,
    /// Ordinal option positions of the estimate votes.
    positions: Vec<usize>,
}

fn tally(votes: &HashMap<String, VoteEntry>, scale: &VotingScale) -> Tally {
    let mut counts = vec![0usize; scale.options.len()];
    let mut present = 0;
    let mut sentinel = 0;
    let mut rates = Vec::new();
    let mut positions = Vec::new();

    for entry in votes.values() {
        present += 1;
        if entry.vote.is_empty() {
            continue;
        }
        match scale.position_of(&entry.vote) {
            Some(pos) => {
                counts[pos] += 1;
                let rate = scale.options[pos].rate;
                if rate == 0 {
                    sentinel += 1;
                } else {
                    rates.push(rate);
                    positions.push(pos);
                }
            }
            None => {
                debug!(vote = %entry.vote, scale = %scale.name, "vote is not on the active scale, ignored");
            }
        }
    }

    Tally {
        counts,
        present,
        sentinel,
        rates,
        positions,
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Analyze one vote snapshot against the active scale.
///
/// Pure: identical input always produces identical output.
pub fn analyze(votes: &HashMap<String, VoteEntry>, scale: &VotingScale) -> VoteAnalysis {
    let tally = tally(votes, scale);

    let grouped = scale
        .options
        .iter()
        .zip(&tally.counts)
        .map(|(opt, &count)| GroupedOption {
            value: opt.value,
            rate: opt.rate,
            count,
        })
        .collect();

    let statistics = describe(&tally.rates);
    let consensus = classify(&tally, scale);

    VoteAnalysis {
        grouped,
        statistics,
        consensus,
    }
}

fn info(level: ConsensusLevel, consensus_pct: u8, mode_pct: u8, recommendation: String) -> ConsensusInfo {
    ConsensusInfo {
        level,
        consensus_pct,
        mode_pct,
        recommendation,
        color: level.color(),
    }
}

fn classify(tally: &Tally, scale: &VotingScale) -> ConsensusInfo {
    let estimate_total = tally.rates.len();
    let cast_total = estimate_total + tally.sentinel;
    let mode_pct = plurality_share(&tally.counts, cast_total);

    // Zero estimates: either a full coffee-break consensus or nothing to
    // grade yet.
    if estimate_total == 0 {
        return if tally.sentinel > 0 && tally.sentinel == tally.present {
            info(
                ConsensusLevel::Excellent,
                100,
                mode_pct,
                "Everyone ordered coffee. Take the break before estimating further.".into(),
            )
        } else {
            info(
                ConsensusLevel::Poor,
                0,
                mode_pct,
                "No estimates cast yet. Waiting on the room.".into(),
            )
        };
    }

    // A sentinel majority is a pause signal regardless of estimate spread.
    let sentinel_share = 100.0 * tally.sentinel as f64 / cast_total as f64;
    if sentinel_share >= SENTINEL_PAUSE_PCT {
        return info(
            ConsensusLevel::Good,
            sentinel_share.round() as u8,
            mode_pct,
            "Half the room or more wants a pause. Take a break before continuing.".into(),
        );
    }

    // A pair of voters either agrees or it doesn't; no intermediate grade.
    if estimate_total == 2 {
        return if tally.rates[0] == tally.rates[1] {
            info(
                ConsensusLevel::Excellent,
                100,
                mode_pct,
                "Both voters agree. Lock the estimate in.".into(),
            )
        } else {
            info(
                ConsensusLevel::Poor,
                0,
                mode_pct,
                "The two voters disagree. Talk it through and revote.".into(),
            )
        };
    }

    let (min_pos, max_pos) = tally
        .positions
        .iter()
        .fold((usize::MAX, 0), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    let pos_range = max_pos - min_pos;
    if pos_range == 0 {
        return info(
            ConsensusLevel::Excellent,
            100,
            mode_pct,
            "The team is unanimous on a single card. Lock the estimate in.".into(),
        );
    }

    let top_count = tally
        .counts
        .iter()
        .enumerate()
        .filter(|&(i, _)| scale.options[i].rate > 0)
        .map(|(_, &count)| count)
        .max()
        .unwrap_or(0);
    let top_share = 100.0 * top_count as f64 / estimate_total as f64;
    let (base_level, base_pct) = base_cell(top_share, pos_range);

    let core_bucket = RatioBucket::for_ratio(core_spread_ratio(tally, scale));
    let team_bucket = RatioBucket::for_ratio(spread_ratio(&tally.rates));
    let tiers = core_bucket
        .downgrade_tiers()
        .max(team_bucket.downgrade_tiers());
    let level = base_level.downgraded(tiers);

    let penalized = i32::from(base_pct)
        - i32::from(core_bucket.core_penalty())
        - i32::from(team_bucket.team_penalty());
    let consensus_pct = penalized.max(i32::from(FLOOR_PCT)) as u8;

    let camps = recommendation::camp_count(estimate_counts(tally, scale), estimate_total);
    let sentinel_footnote = tally.sentinel > 0;
    let recommendation = recommendation::compose(level, pos_range, camps, sentinel_footnote);

    info(level, consensus_pct, mode_pct, recommendation)
}

/// Raw share of the plurality option among all cast votes, sentinel
/// included.
fn plurality_share(counts: &[usize], cast_total: usize) -> u8 {
    if cast_total == 0 {
        return 0;
    }
    let top = counts.iter().copied().max().unwrap_or(0);
    (100.0 * top as f64 / cast_total as f64).round() as u8
}

/// `(count, rate)` per estimate option that received votes.
fn estimate_counts(tally: &Tally, scale: &VotingScale) -> Vec<(usize, u32)> {
    tally
        .counts
        .iter()
        .enumerate()
        .filter(|&(i, &count)| count > 0 && scale.options[i].rate > 0)
        .map(|(i, &count)| (count, scale.options[i].rate))
        .collect()
}

// ---------------------------------------------------------------------------
// Base decision table
// ---------------------------------------------------------------------------

fn base_cell(top_share: f64, pos_range: usize) -> (ConsensusLevel, u8) {
    let winner = top_share >= MEANINGFUL_WINNER_PCT;
    match (winner, pos_range) {
        (true, 0..=2) if top_share >= DOMINANT_WINNER_PCT => (ConsensusLevel::Excellent, 90),
        (true, 0..=2) => (ConsensusLevel::Good, 75),
        (true, 3..=4) => (ConsensusLevel::Fair, 55),
        (true, _) => (ConsensusLevel::Poor, 35),
        (false, 0..=2) => (ConsensusLevel::Fair, 50),
        (false, 3..=4) => (ConsensusLevel::Poor, 30),
        (false, _) => (ConsensusLevel::Poor, 15),
    }
}

// ---------------------------------------------------------------------------
// Spread penalties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RatioBucket {
    Tiny,
    Small,
    Moderate,
    Large,
    Huge,
}

impl RatioBucket {
    fn for_ratio(ratio: f64) -> Self {
        if ratio <= 1.5 {
            Self::Tiny
        } else if ratio <= 3.0 {
            Self::Small
        } else if ratio <= 6.0 {
            Self::Moderate
        } else if ratio <= 15.0 {
            Self::Large
        } else {
            Self::Huge
        }
    }

    fn core_penalty(self) -> u8 {
        match self {
            Self::Tiny => 0,
            Self::Small => 2,
            Self::Moderate => 8,
            Self::Large => 15,
            Self::Huge => 25,
        }
    }

    fn team_penalty(self) -> u8 {
        match self {
            Self::Tiny | Self::Small => 0,
            Self::Moderate => 5,
            Self::Large => 15,
            Self::Huge => 25,
        }
    }

    fn downgrade_tiers(self) -> u8 {
        match self {
            Self::Large => 1,
            Self::Huge => 2,
            _ => 0,
        }
    }
}

/// Max/min rate ratio over a set of rates. Rates are positive by
/// construction; an empty or zero input maps to the harshest bucket.
fn spread_ratio(rates: &[u32]) -> f64 {
    let (min, max) = rates
        .iter()
        .fold((u32::MAX, 0), |(lo, hi), &r| (lo.min(r), hi.max(r)));
    if min == 0 || min == u32::MAX {
        return f64::INFINITY;
    }
    f64::from(max) / f64::from(min)
}

/// Spread ratio over the smallest count-ordered option set covering at
/// least 70 % of the estimate votes. When that set stops at two options
/// and a third has more than one supporter, the third joins.
fn core_spread_ratio(tally: &Tally, scale: &VotingScale) -> f64 {
    let mut voted = estimate_counts(tally, scale);
    voted.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let total = tally.rates.len();
    let mut covered = 0;
    let mut core = Vec::new();
    for (i, &(count, rate)) in voted.iter().enumerate() {
        covered += count;
        core.push(rate);
        if covered * 100 >= total * CORE_COVERAGE_PCT {
            if core.len() == 2 {
                if let Some(&(next_count, next_rate)) = voted.get(i + 1) {
                    if next_count > 1 {
                        core.push(next_rate);
                    }
                }
            }
            break;
        }
    }
    spread_ratio(&core)
}
