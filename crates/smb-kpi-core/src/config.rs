use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::format::{FormatOptions, MAX_DECIMALS};
use crate::kpi::{definition, KpiDefinition, KpiId, Thresholds};
use crate::types::Rate;
use crate::{KpiError, KpiResult};

/// Engine configuration. Every field has a default, so an empty JSON or YAML
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiConfig {
    /// Replacement threshold tables, keyed by KPI id.
    pub threshold_overrides: BTreeMap<KpiId, Thresholds>,
    /// Absolute magnitude above which a computed value is implausible.
    pub plausibility_limit: Decimal,
    /// Relative change below which a trend counts as stable.
    pub stable_band: Rate,
    /// Tolerated accounting-identity gap, as a fraction of total assets.
    pub identity_tolerance: Rate,
    pub format: FormatOptions,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            threshold_overrides: BTreeMap::new(),
            plausibility_limit: dec!(1_000_000),
            stable_band: dec!(0.01),
            identity_tolerance: dec!(0.01),
            format: FormatOptions::default(),
        }
    }
}

impl KpiConfig {
    /// Threshold table in effect for a KPI.
    pub fn thresholds_for(&self, def: &KpiDefinition) -> Thresholds {
        self.threshold_overrides
            .get(&def.id)
            .copied()
            .unwrap_or(def.thresholds)
    }

    /// Reject configurations that would classify inconsistently.
    pub fn validate(&self) -> KpiResult<()> {
        for (id, thresholds) in &self.threshold_overrides {
            let def = definition(*id).ok_or_else(|| KpiError::InvalidConfig {
                field: format!("threshold_overrides.{id}"),
                reason: "Unknown KPI.".into(),
            })?;
            thresholds
                .check_order(def.direction)
                .map_err(|reason| KpiError::InvalidConfig {
                    field: format!("threshold_overrides.{id}"),
                    reason,
                })?;
        }
        if self.plausibility_limit <= Decimal::ZERO {
            return Err(KpiError::InvalidConfig {
                field: "plausibility_limit".into(),
                reason: "Plausibility limit must be positive.".into(),
            });
        }
        if self.stable_band < Decimal::ZERO || self.stable_band >= Decimal::ONE {
            return Err(KpiError::InvalidConfig {
                field: "stable_band".into(),
                reason: "Stable band must be in [0, 1).".into(),
            });
        }
        if self.identity_tolerance < Decimal::ZERO {
            return Err(KpiError::InvalidConfig {
                field: "identity_tolerance".into(),
                reason: "Identity tolerance cannot be negative.".into(),
            });
        }
        let precisions = [
            ("format.percent_decimals", Some(self.format.percent_decimals)),
            ("format.multiple_decimals", Some(self.format.multiple_decimals)),
            ("format.currency_decimals", self.format.currency_decimals),
        ];
        for (field, value) in precisions {
            if value.is_some_and(|v| v > MAX_DECIMALS) {
                return Err(KpiError::InvalidConfig {
                    field: field.into(),
                    reason: format!("At most {MAX_DECIMALS} decimals are supported."),
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> KpiResult<Self> {
        let config: KpiConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
