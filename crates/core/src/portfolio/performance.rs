//! Profit/loss math and its display tone.

use serde::{Deserialize, Serialize};

/// Green or red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueTone {
    Gain,
    Loss,
}

impl ValueTone {
    /// Non-negative values are gains.
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            ValueTone::Gain
        } else {
            ValueTone::Loss
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ValueTone::Gain => "text-success-thick",
            ValueTone::Loss => "text-danger-thick",
        }
    }
}

/// P/L percentage, defined as 0 when nothing was invested.
pub fn pl_percent(invested: f64, current: f64) -> f64 {
    if invested == 0.0 {
        0.0
    } else {
        (current - invested) / invested * 100.0
    }
}

/// Invested vs. current value with derived P/L.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total_invested: f64,
    pub total_current: f64,
    pub net_pl: f64,
    pub net_pl_percent: f64,
}

impl PerformanceSummary {
    pub fn from_totals(total_invested: f64, total_current: f64) -> Self {
        Self {
            total_invested,
            total_current,
            net_pl: total_current - total_invested,
            net_pl_percent: pl_percent(total_invested, total_current),
        }
    }

    pub fn current_value_tone(&self) -> ValueTone {
        if self.total_current >= self.total_invested {
            ValueTone::Gain
        } else {
            ValueTone::Loss
        }
    }

    pub fn net_pl_tone(&self) -> ValueTone {
        ValueTone::of(self.net_pl)
    }

    pub fn net_pl_percent_tone(&self) -> ValueTone {
        ValueTone::of(self.net_pl_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_percent_gain() {
        let summary = PerformanceSummary::from_totals(150_000.0, 165_000.0);
        assert_eq!(summary.net_pl, 15_000.0);
        assert!((summary.net_pl_percent - 10.0).abs() < 1e-9);
        assert_eq!(summary.net_pl_tone(), ValueTone::Gain);
        assert_eq!(summary.current_value_tone().css_class(), "text-success-thick");
    }

    #[test]
    fn loss_is_red_everywhere() {
        let summary = PerformanceSummary::from_totals(200_000.0, 180_000.0);
        assert_eq!(summary.net_pl, -20_000.0);
        assert_eq!(summary.net_pl_percent, -10.0);
        assert_eq!(summary.current_value_tone(), ValueTone::Loss);
        assert_eq!(summary.net_pl_percent_tone().css_class(), "text-danger-thick");
    }

    #[test]
    fn nothing_invested_means_zero_percent() {
        let summary = PerformanceSummary::from_totals(0.0, 0.0);
        assert_eq!(summary.net_pl_percent, 0.0);
        assert_eq!(summary.net_pl_percent_tone(), ValueTone::Gain);
        assert_eq!(pl_percent(0.0, 500.0), 0.0);
    }
}
