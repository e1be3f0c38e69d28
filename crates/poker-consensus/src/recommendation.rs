//! Recommendation text for the general classification path.
//!
//! One deterministic template per bucket: pattern descriptor, spread
//! qualifier, suggested action, and an optional sentinel footnote. The
//! numeric classification in `engine` is the contract; this wording is
//! cosmetic.

use crate::engine::ConsensusLevel;

/// Number of qualifying vote camps.
///
/// `voted` holds `(count, rate)` per estimate option that received votes;
/// `team` is the number of estimate voters. A group of two always
/// qualifies; larger teams also let sizeable single-option shares qualify
/// (≥ 20 % above four voters, ≥ 15 % above seven).
pub(crate) fn camp_count(voted: Vec<(usize, u32)>, team: usize) -> usize {
    voted
        .iter()
        .filter(|&&(count, _)| {
            count >= 2
                || (team > 7 && count * 100 >= team * 15)
                || (team > 4 && count * 100 >= team * 20)
        })
        .count()
}

/// Assemble the recommendation: pattern → spread → action → footnote.
pub(crate) fn compose(
    level: ConsensusLevel,
    pos_range: usize,
    camps: usize,
    sentinel_present: bool,
) -> String {
    let pattern = match camps {
        1 => "The votes cluster around a single value",
        2 => "The votes split into two camps",
        3 => "The votes split into three camps",
        _ => "The votes are scattered across the scale",
    };

    let spread = match pos_range {
        0..=2 => "a narrow spread",
        3..=4 => "a moderate spread",
        _ => "a wide spread",
    };

    let action = match level {
        ConsensusLevel::Excellent => "Lock the estimate in.",
        ConsensusLevel::Good => "A quick confirmation round should close it out.",
        ConsensusLevel::Fair => "Have the outliers explain their reasoning, then revote.",
        ConsensusLevel::Poor => {
            "Discuss the story before voting again; it may need to be split."
        }
    };

    let mut text = format!("{pattern} over {spread}. {action}");
    if sentinel_present {
        text.push_str(" Some voters are asking for a break (☕).");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_always_qualify_as_camps() {
        assert_eq!(camp_count(vec![(2, 5), (1, 8)], 3), 1);
        assert_eq!(camp_count(vec![(2, 3), (2, 8)], 4), 2);
    }

    #[test]
    fn single_votes_never_qualify_in_small_teams() {
        assert_eq!(camp_count(vec![(1, 3), (1, 5), (1, 8)], 3), 0);
    }

    #[test]
    fn twenty_percent_share_qualifies_above_four_voters() {
        // Five voters on five different cards: each single vote is 20 %.
        let voted = vec![(1, 1), (1, 2), (1, 3), (1, 5), (1, 8)];
        assert_eq!(camp_count(voted, 5), 5);
    }

    #[test]
    fn fifteen_percent_threshold_kicks_in_above_seven() {
        // One vote in eight is 12.5 %: below both thresholds.
        assert_eq!(camp_count(vec![(1, 5)], 8), 0);
        // Two votes in twelve is 16.7 %: clears the 15 % bar for teams
        // above seven.
        assert_eq!(camp_count(vec![(2, 5)], 12), 1);
    }

    #[test]
    fn compose_orders_pattern_spread_action() {
        let text = compose(ConsensusLevel::Good, 1, 1, false);
        assert!(text.starts_with("The votes cluster around a single value"));
        assert!(text.contains("a narrow spread"));
        assert!(text.ends_with("A quick confirmation round should close it out."));
    }

    #[test]
    fn compose_appends_sentinel_footnote() {
        let with = compose(ConsensusLevel::Fair, 3, 2, true);
        let without = compose(ConsensusLevel::Fair, 3, 2, false);
        assert!(with.contains("break"));
        assert!(!without.contains("break"));
        assert!(with.starts_with(&without));
    }

    #[test]
    fn four_or_more_camps_read_as_scattered() {
        let text = compose(ConsensusLevel::Poor, 6, 4, false);
        assert!(text.starts_with("The votes are scattered"));
        assert!(text.contains("a wide spread"));
    }
}
