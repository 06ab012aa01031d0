//! Summary statistics shown in the four stat cards.

use std::fmt;

use crate::model::EvaluationResult;

/// Text shown when a statistic has no defined value.
pub const UNDEFINED: &str = "n/a";

/// Scalar reductions over one evaluation result.
///
/// Values are kept unrounded; the `*_text` methods produce the card text.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    /// Maximum of `load` (MW). `None` for an empty series.
    pub peak_load_mw: Option<f64>,
    /// `(sum(solar) + sum(wind)) / sum(load)` as a percentage.
    /// `None` when total load is zero.
    pub renewable_purity_pct: Option<f64>,
    /// Mean of `|net_grid|` (MW). `None` for an empty series.
    pub mean_grid_imbalance_mw: Option<f64>,
    /// Sign changes in `actions`, halved and floored.
    pub battery_cycles: usize,
}

impl SummaryStats {
    /// Computes all four statistics from a result.
    pub fn from_result(result: &EvaluationResult) -> Self {
        let peak_load_mw = result.load.iter().copied().reduce(f64::max);

        let total_load: f64 = result.load.iter().sum();
        let total_renewable: f64 =
            result.solar.iter().sum::<f64>() + result.wind.iter().sum::<f64>();
        let renewable_purity_pct = if total_load != 0.0 {
            Some(100.0 * total_renewable / total_load)
        } else {
            None
        };

        let mean_grid_imbalance_mw = if result.net_grid.is_empty() {
            None
        } else {
            let abs_sum: f64 = result.net_grid.iter().map(|v| v.abs()).sum();
            Some(abs_sum / result.net_grid.len() as f64)
        };

        Self {
            peak_load_mw,
            renewable_purity_pct,
            mean_grid_imbalance_mw,
            battery_cycles: battery_cycles(&result.actions),
        }
    }

    /// Peak load rounded to a whole MW, e.g. `"1235 MW"`.
    pub fn peak_load_text(&self) -> String {
        self.peak_load_mw
            .map_or_else(|| UNDEFINED.to_string(), |v| format!("{:.0} MW", v.round()))
    }

    /// Renewable share with one decimal, e.g. `"42.7%"`.
    pub fn renewable_purity_text(&self) -> String {
        self.renewable_purity_pct
            .map_or_else(|| UNDEFINED.to_string(), |v| format!("{v:.1}%"))
    }

    /// Mean absolute grid exchange with one decimal, e.g. `"4.0 MW"`.
    pub fn grid_imbalance_text(&self) -> String {
        self.mean_grid_imbalance_mw
            .map_or_else(|| UNDEFINED.to_string(), |v| format!("{v:.1} MW"))
    }

    /// Battery cycle count as plain text.
    pub fn battery_cycles_text(&self) -> String {
        self.battery_cycles.to_string()
    }
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Evaluation Summary ---")?;
        writeln!(f, "Peak load:           {}", self.peak_load_text())?;
        writeln!(f, "Renewable purity:    {}", self.renewable_purity_text())?;
        writeln!(f, "Grid imbalance:      {}", self.grid_imbalance_text())?;
        write!(f, "Battery cycles:      {}", self.battery_cycles_text())
    }
}

/// Counts full battery cycles from the action series.
///
/// A sign change is an adjacent pair with a strictly negative product; zero
/// actions never count. One cycle is two sign changes.
pub fn battery_cycles(actions: &[f64]) -> usize {
    let sign_changes = actions.windows(2).filter(|w| w[0] * w[1] < 0.0).count();
    sign_changes / 2
}
