use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status and classification
// ---------------------------------------------------------------------------

/// Qualitative health of a single KPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiStatus {
    Good,
    Warning,
    Critical,
    /// The KPI could not be assessed. Never a synonym for `Critical`.
    Unavailable,
}

impl std::fmt::Display for KpiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Unavailable => "unavailable",
        };
        write!(f, "{}", s)
    }
}

/// Which way a KPI improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Three cut points separating good / warning / critical.
///
/// For `HigherIsBetter` the points descend (`good ≥ warning ≥ critical`);
/// for `LowerIsBetter` they ascend. A value on a cut point takes the better
/// band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub good: Decimal,
    pub warning: Decimal,
    pub critical: Decimal,
}

impl Thresholds {
    pub const fn new(good: Decimal, warning: Decimal, critical: Decimal) -> Self {
        Self {
            good,
            warning,
            critical,
        }
    }

    /// Classify a finite value. Anything short of the warning cut is critical;
    /// the critical cut marks the severe end of that band for consumers.
    pub fn classify(&self, value: Decimal, direction: Direction) -> KpiStatus {
        match direction {
            Direction::HigherIsBetter => {
                if value >= self.good {
                    KpiStatus::Good
                } else if value >= self.warning {
                    KpiStatus::Warning
                } else {
                    KpiStatus::Critical
                }
            }
            Direction::LowerIsBetter => {
                if value <= self.good {
                    KpiStatus::Good
                } else if value <= self.warning {
                    KpiStatus::Warning
                } else {
                    KpiStatus::Critical
                }
            }
        }
    }

    /// Check the cut points are ordered consistently with `direction`.
    pub fn check_order(&self, direction: Direction) -> Result<(), String> {
        let ordered = match direction {
            Direction::HigherIsBetter => {
                self.good >= self.warning && self.warning >= self.critical
            }
            Direction::LowerIsBetter => {
                self.good <= self.warning && self.warning <= self.critical
            }
        };
        if ordered {
            Ok(())
        } else {
            Err(format!(
                "cut points good={}, warning={}, critical={} are not ordered for {:?}",
                self.good, self.warning, self.critical, direction
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Unavailability
// ---------------------------------------------------------------------------

/// Why a KPI could not be assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// A required field is absent or not a finite number.
    MissingField,
    /// A required denominator is exactly zero.
    DivisionByZero,
    /// The result is implausibly large or overflowed decimal arithmetic.
    OutOfRangeValue,
    /// The base of the ratio is negative, so the ratio has no meaning.
    NegativeBase,
    /// A prior period is needed but only one snapshot was supplied.
    InsufficientHistory,
}

/// A KPI computation that could not produce an assessable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unavailable {
    pub reason: UnavailableReason,
    pub detail: String,
}

impl Unavailable {
    pub fn missing(fields: &[String]) -> Self {
        Self {
            reason: UnavailableReason::MissingField,
            detail: format!("Missing or non-numeric input: {}", fields.join(", ")),
        }
    }

    pub fn division_by_zero(denominator: &str) -> Self {
        Self {
            reason: UnavailableReason::DivisionByZero,
            detail: format!("{denominator} is zero; the ratio cannot be assessed"),
        }
    }

    pub fn negative_base(base: &str) -> Self {
        Self {
            reason: UnavailableReason::NegativeBase,
            detail: format!("{base} is negative; the ratio is not meaningful"),
        }
    }

    pub fn out_of_range(detail: impl Into<String>) -> Self {
        Self {
            reason: UnavailableReason::OutOfRangeValue,
            detail: detail.into(),
        }
    }

    pub fn insufficient_history() -> Self {
        Self {
            reason: UnavailableReason::InsufficientHistory,
            detail: "A prior period is required to compute growth".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CURRENT: Thresholds = Thresholds::new(dec!(2.0), dec!(1.0), dec!(0.5));
    const LEVERAGE: Thresholds = Thresholds::new(dec!(1.0), dec!(2.0), dec!(3.0));

    #[test]
    fn test_higher_is_better_bands() {
        let d = Direction::HigherIsBetter;
        assert_eq!(CURRENT.classify(dec!(2.5), d), KpiStatus::Good);
        assert_eq!(CURRENT.classify(dec!(2.0), d), KpiStatus::Good);
        assert_eq!(CURRENT.classify(dec!(1.2), d), KpiStatus::Warning);
        assert_eq!(CURRENT.classify(dec!(0.99), d), KpiStatus::Critical);
        assert_eq!(CURRENT.classify(dec!(0.1), d), KpiStatus::Critical);
    }

    #[test]
    fn test_lower_is_better_bands() {
        let d = Direction::LowerIsBetter;
        assert_eq!(LEVERAGE.classify(dec!(0.4), d), KpiStatus::Good);
        assert_eq!(LEVERAGE.classify(dec!(1.0), d), KpiStatus::Good);
        assert_eq!(LEVERAGE.classify(dec!(1.5), d), KpiStatus::Warning);
        assert_eq!(LEVERAGE.classify(dec!(2.01), d), KpiStatus::Critical);
    }

    #[test]
    fn test_check_order() {
        assert!(CURRENT.check_order(Direction::HigherIsBetter).is_ok());
        assert!(CURRENT.check_order(Direction::LowerIsBetter).is_err());
        assert!(LEVERAGE.check_order(Direction::LowerIsBetter).is_ok());
        assert!(LEVERAGE.check_order(Direction::HigherIsBetter).is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&KpiStatus::Unavailable).unwrap();
        assert_eq!(json, "\"unavailable\"");
        assert_eq!(KpiStatus::Warning.to_string(), "warning");
    }

    #[test]
    fn test_unavailable_detail_names_fields() {
        let u = Unavailable::missing(&["cash".into(), "current_liabilities".into()]);
        assert_eq!(u.reason, UnavailableReason::MissingField);
        assert!(u.detail.contains("cash, current_liabilities"));
    }
}
