//! The voting scale registry.
//!
//! Named, ordered sets of selectable vote values. The set of names is
//! closed and shared with the server. Every scale starts with the rate-0
//! coffee sentinel; `rate` increases strictly through the rest of the
//! option list and is used only for statistics and sort order, never for
//! display.

use poker_common::ConsensusError;
use serde::Serialize;

/// Display value of the "pass / coffee break" sentinel present on every
/// scale. Excluded from numeric statistics, counted separately.
pub const SENTINEL_VALUE: &str = "☕";

/// One selectable card on a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScaleOption {
    /// Numeric weight for statistics and ordering. 0 is reserved for the
    /// sentinel.
    pub rate: u32,
    /// The value displayed on the card and sent over the wire.
    pub value: &'static str,
    /// Icon asset shown on the card.
    pub icon: &'static str,
}

/// A named, ordered voting scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VotingScale {
    pub name: &'static str,
    pub identifier: &'static str,
    pub options: &'static [ScaleOption],
}

impl VotingScale {
    /// The rate-0 sentinel option.
    pub fn sentinel(&self) -> &'static ScaleOption {
        &self.options[0]
    }

    /// The estimate options (everything except the sentinel).
    pub fn estimates(&self) -> &'static [ScaleOption] {
        &self.options[1..]
    }

    /// Ordinal position of a display value in the option list.
    pub fn position_of(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|opt| opt.value == value)
    }

    /// Numeric rate of a display value.
    pub fn rate_of(&self, value: &str) -> Option<u32> {
        self.options
            .iter()
            .find(|opt| opt.value == value)
            .map(|opt| opt.rate)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub static STANDARD: VotingScale = VotingScale {
    name: "Standard",
    identifier: "standard",
    options: &[
        ScaleOption { rate: 0, value: SENTINEL_VALUE, icon: "assets/icons/coffee.png" },
        ScaleOption { rate: 1, value: "1", icon: "assets/icons/standard/1.png" },
        ScaleOption { rate: 2, value: "2", icon: "assets/icons/standard/2.png" },
        ScaleOption { rate: 3, value: "3", icon: "assets/icons/standard/3.png" },
        ScaleOption { rate: 5, value: "5", icon: "assets/icons/standard/4.png" },
        ScaleOption { rate: 8, value: "8", icon: "assets/icons/standard/5.png" },
        ScaleOption { rate: 13, value: "13", icon: "assets/icons/standard/6.png" },
        ScaleOption { rate: 20, value: "20", icon: "assets/icons/standard/7.png" },
        ScaleOption { rate: 40, value: "40", icon: "assets/icons/standard/8.png" },
        ScaleOption { rate: 100, value: "100", icon: "assets/icons/standard/9.png" },
    ],
};

pub static FIBONACCI: VotingScale = VotingScale {
    name: "Fibonacci",
    identifier: "fibonacci",
    options: &[
        ScaleOption { rate: 0, value: SENTINEL_VALUE, icon: "assets/icons/coffee.png" },
        ScaleOption { rate: 1, value: "1", icon: "assets/icons/fibonacci/1.png" },
        ScaleOption { rate: 2, value: "2", icon: "assets/icons/fibonacci/2.png" },
        ScaleOption { rate: 3, value: "3", icon: "assets/icons/fibonacci/3.png" },
        ScaleOption { rate: 5, value: "5", icon: "assets/icons/fibonacci/4.png" },
        ScaleOption { rate: 8, value: "8", icon: "assets/icons/fibonacci/5.png" },
        ScaleOption { rate: 13, value: "13", icon: "assets/icons/fibonacci/6.png" },
        ScaleOption { rate: 21, value: "21", icon: "assets/icons/fibonacci/7.png" },
        ScaleOption { rate: 34, value: "34", icon: "assets/icons/fibonacci/8.png" },
        ScaleOption { rate: 55, value: "55", icon: "assets/icons/fibonacci/9.png" },
    ],
};

pub static EXPONENTIAL: VotingScale = VotingScale {
    name: "Exponential",
    identifier: "exponential",
    options: &[
        ScaleOption { rate: 0, value: SENTINEL_VALUE, icon: "assets/icons/coffee.png" },
        ScaleOption { rate: 1, value: "1", icon: "assets/icons/exponential/1.png" },
        ScaleOption { rate: 2, value: "2", icon: "assets/icons/exponential/2.png" },
        ScaleOption { rate: 4, value: "4", icon: "assets/icons/exponential/3.png" },
        ScaleOption { rate: 8, value: "8", icon: "assets/icons/exponential/4.png" },
        ScaleOption { rate: 16, value: "16", icon: "assets/icons/exponential/5.png" },
        ScaleOption { rate: 32, value: "32", icon: "assets/icons/exponential/6.png" },
        ScaleOption { rate: 64, value: "64", icon: "assets/icons/exponential/7.png" },
        ScaleOption { rate: 128, value: "128", icon: "assets/icons/exponential/8.png" },
        ScaleOption { rate: 256, value: "256", icon: "assets/icons/exponential/9.png" },
    ],
};

pub static LINEAR: VotingScale = VotingScale {
    name: "Linear",
    identifier: "linear",
    options: &[
        ScaleOption { rate: 0, value: SENTINEL_VALUE, icon: "assets/icons/coffee.png" },
        ScaleOption { rate: 1, value: "1", icon: "assets/icons/linear/1.png" },
        ScaleOption { rate: 2, value: "2", icon: "assets/icons/linear/2.png" },
        ScaleOption { rate: 3, value: "3", icon: "assets/icons/linear/3.png" },
        ScaleOption { rate: 4, value: "4", icon: "assets/icons/linear/4.png" },
        ScaleOption { rate: 5, value: "5", icon: "assets/icons/linear/5.png" },
        ScaleOption { rate: 6, value: "6", icon: "assets/icons/linear/6.png" },
        ScaleOption { rate: 7, value: "7", icon: "assets/icons/linear/7.png" },
        ScaleOption { rate: 8, value: "8", icon: "assets/icons/linear/8.png" },
        ScaleOption { rate: 9, value: "9", icon: "assets/icons/linear/9.png" },
    ],
};

pub static TSHIRTS: VotingScale = VotingScale {
    name: "T-Shirt Sizes",
    identifier: "t-shirts",
    options: &[
        ScaleOption { rate: 0, value: SENTINEL_VALUE, icon: "assets/icons/coffee.png" },
        ScaleOption { rate: 1, value: "XS", icon: "assets/icons/t-shirts/1.png" },
        ScaleOption { rate: 2, value: "S", icon: "assets/icons/t-shirts/2.png" },
        ScaleOption { rate: 3, value: "M", icon: "assets/icons/t-shirts/3.png" },
        ScaleOption { rate: 4, value: "L", icon: "assets/icons/t-shirts/4.png" },
        ScaleOption { rate: 5, value: "XL", icon: "assets/icons/t-shirts/5.png" },
        ScaleOption { rate: 6, value: "XXL", icon: "assets/icons/t-shirts/6.png" },
        ScaleOption { rate: 7, value: "XXXL", icon: "assets/icons/t-shirts/7.png" },
        ScaleOption { rate: 8, value: "XXXXL", icon: "assets/icons/t-shirts/8.png" },
        ScaleOption { rate: 9, value: "XXXXXL", icon: "assets/icons/t-shirts/9.png" },
    ],
};

/// Every registered scale. Static, never mutated.
pub static ALL: &[&VotingScale] = &[&STANDARD, &FIBONACCI, &EXPONENTIAL, &LINEAR, &TSHIRTS];

/// Scale used before the first settings frame arrives and after a reset.
pub static DEFAULT: &VotingScale = &STANDARD;

/// Look a scale up by its room-visible name.
pub fn by_name(name: &str) -> Result<&'static VotingScale, ConsensusError> {
    ALL.iter()
        .find(|scale| scale.name == name)
        .copied()
        .ok_or_else(|| ConsensusError::UnknownScale(name.to_string()))
}
