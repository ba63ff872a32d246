//! Fee model: gross monthly rate to net monthly rate
//!
//! Convention carried over from the product being modeled: the administration
//! cost is pegged to the reference rate ("100% of CDI"), so the fund's gross
//! return already arrives net of that base and nothing is subtracted for it
//! here. The performance fee is the only explicit deduction, charged on the
//! excess of the gross return over the reference rate.

use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};

/// Fee parameters for a simulation run. Both fractions live in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Administration benchmark as a fraction of the reference rate
    /// (1.0 = "100% of CDI"). Validated but not deducted, per the convention
    /// above.
    pub administration_fee_fraction: f64,

    /// Fraction of the excess over the reference rate charged as performance
    /// fee (0.30 = "30% over CDI").
    pub performance_fee_fraction: f64,
}

impl FeeConfig {
    pub fn new(administration_fee_fraction: f64, performance_fee_fraction: f64) -> Self {
        Self {
            administration_fee_fraction,
            performance_fee_fraction,
        }
    }

    /// Check that both fractions are within [0, 1].
    pub fn validate(&self) -> Result<()> {
        for value in [self.administration_fee_fraction, self.performance_fee_fraction] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(SimulationError::InvalidFeeFraction { value });
            }
        }
        Ok(())
    }

    /// Net monthly rate after the performance fee.
    ///
    /// `fee = performance_fee_fraction * max(0, gross - reference)`; when the
    /// gross rate does not beat the reference there is no fee and the gross
    /// rate passes through unchanged.
    pub fn net_rate(&self, gross_rate: f64, reference_rate: f64) -> Result<f64> {
        self.validate()?;
        let excess = (gross_rate - reference_rate).max(0.0);
        Ok(gross_rate - excess * self.performance_fee_fraction)
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        // 100% of CDI, no performance fee
        Self {
            administration_fee_fraction: 1.0,
            performance_fee_fraction: 0.0,
        }
    }
}
