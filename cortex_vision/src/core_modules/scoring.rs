//! Maps a leftover ratio onto a cleanup label.

use crate::constants::scoring::{EXCELLENT_BELOW, MODERATE_BELOW};
use std::fmt;

/// How thoroughly the cortex was cleaned up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupScore {
    /// Ratio below 0.2.
    Excellent,
    /// Ratio in [0.2, 0.5).
    Moderate,
    /// Ratio of 0.5 or more.
    Significant,
}

impl CleanupScore {
    /// Scores a leftover ratio. Ratios are expected in `[0, 1]`.
    pub fn from_ratio(ratio: f64) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&ratio),
            "leftover ratio {ratio} outside [0, 1]"
        );
        if ratio < EXCELLENT_BELOW {
            CleanupScore::Excellent
        } else if ratio < MODERATE_BELOW {
            CleanupScore::Moderate
        } else {
            CleanupScore::Significant
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CleanupScore::Excellent => "Excellent",
            CleanupScore::Moderate => "Moderate",
            CleanupScore::Significant => "Significant",
        }
    }
}

impl fmt::Display for CleanupScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(CleanupScore::from_ratio(0.0), CleanupScore::Excellent);
        assert_eq!(CleanupScore::from_ratio(0.199_999_9), CleanupScore::Excellent);
        assert_eq!(CleanupScore::from_ratio(0.2), CleanupScore::Moderate);
        assert_eq!(CleanupScore::from_ratio(0.499_999_9), CleanupScore::Moderate);
        assert_eq!(CleanupScore::from_ratio(0.5), CleanupScore::Significant);
        assert_eq!(CleanupScore::from_ratio(1.0), CleanupScore::Significant);
    }

    #[test]
    fn stale_thresholds_are_not_used() {
        // 0.03 and 0.06 would be Moderate/Significant under the 0.02/0.05 scheme.
        assert_eq!(CleanupScore::from_ratio(0.03), CleanupScore::Excellent);
        assert_eq!(CleanupScore::from_ratio(0.06), CleanupScore::Excellent);
    }

    #[test]
    fn labels() {
        assert_eq!(CleanupScore::Excellent.to_string(), "Excellent");
        assert_eq!(CleanupScore::Moderate.to_string(), "Moderate");
        assert_eq!(CleanupScore::Significant.to_string(), "Significant");
    }
}
