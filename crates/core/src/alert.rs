//! Alert outcome classification.

use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;

/// Which alert, if any, a detection record warrants.
///
/// Recomputed on every routing call and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertOutcome {
    /// Anomalous, confidence at or above the threshold.
    HighConfidenceAnomaly,
    /// Anomalous, confidence below the threshold. Sent urgency-marked.
    LowConfidenceAnomaly,
    /// Normal, confidence below the threshold. Sent as an informational notice.
    LowConfidenceNormal,
    /// Normal, confidence at or above the threshold. No notification.
    Suppressed,
}

impl AlertOutcome {
    /// Pure decision table. A confidence equal to the threshold is *not* low confidence.
    pub fn classify(is_anomalous: bool, confidence: Confidence, threshold: Confidence) -> Self {
        match (is_anomalous, confidence.is_below(&threshold)) {
            (true, true) => Self::LowConfidenceAnomaly,
            (true, false) => Self::HighConfidenceAnomaly,
            (false, true) => Self::LowConfidenceNormal,
            (false, false) => Self::Suppressed,
        }
    }

    pub fn requires_notification(&self) -> bool {
        !matches!(self, Self::Suppressed)
    }

    pub fn is_low_confidence(&self) -> bool {
        matches!(self, Self::LowConfidenceAnomaly | Self::LowConfidenceNormal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighConfidenceAnomaly => "HighConfidenceAnomaly",
            Self::LowConfidenceAnomaly => "LowConfidenceAnomaly",
            Self::LowConfidenceNormal => "LowConfidenceNormal",
            Self::Suppressed => "Suppressed",
        }
    }
}

impl core::fmt::Display for AlertOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn c(text: &str) -> Confidence {
        Confidence::parse(text).unwrap()
    }

    #[test]
    fn decision_table() {
        let t = c("0.50");
        assert_eq!(AlertOutcome::classify(true, c("0.40"), t), AlertOutcome::LowConfidenceAnomaly);
        assert_eq!(AlertOutcome::classify(true, c("0.90"), t), AlertOutcome::HighConfidenceAnomaly);
        assert_eq!(AlertOutcome::classify(false, c("0.40"), t), AlertOutcome::LowConfidenceNormal);
        assert_eq!(AlertOutcome::classify(false, c("0.90"), t), AlertOutcome::Suppressed);
    }

    #[test]
    fn threshold_itself_is_not_low_confidence() {
        let t = c("0.5");
        assert_eq!(AlertOutcome::classify(true, c("0.500"), t), AlertOutcome::HighConfidenceAnomaly);
        assert_eq!(AlertOutcome::classify(false, c("0.50"), t), AlertOutcome::Suppressed);
    }

    #[test]
    fn only_suppressed_skips_notification() {
        assert!(!AlertOutcome::Suppressed.requires_notification());
        assert!(AlertOutcome::LowConfidenceNormal.requires_notification());
        assert!(AlertOutcome::LowConfidenceAnomaly.is_low_confidence());
        assert!(!AlertOutcome::HighConfidenceAnomaly.is_low_confidence());
    }

    fn confidence() -> impl Strategy<Value = Confidence> {
        (0i64..=10_000).prop_map(|n| Confidence::new(Decimal::new(n, 4)).unwrap())
    }

    proptest! {
        #[test]
        fn outcome_matches_table(a in any::<bool>(), conf in confidence(), threshold in confidence()) {
            let low = conf.value() < threshold.value();
            let expected = match (a, low) {
                (true, true) => AlertOutcome::LowConfidenceAnomaly,
                (true, false) => AlertOutcome::HighConfidenceAnomaly,
                (false, true) => AlertOutcome::LowConfidenceNormal,
                (false, false) => AlertOutcome::Suppressed,
            };
            prop_assert_eq!(AlertOutcome::classify(a, conf, threshold), expected);
            // Same inputs, same answer.
            prop_assert_eq!(AlertOutcome::classify(a, conf, threshold), AlertOutcome::classify(a, conf, threshold));
        }

        #[test]
        fn at_threshold_never_low(a in any::<bool>(), threshold in confidence()) {
            prop_assert!(!AlertOutcome::classify(a, threshold, threshold).is_low_confidence());
        }
    }
}
