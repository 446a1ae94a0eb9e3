//! Impact and efficiency scoring
//!
//! All values are `Option<f64>`: `None` plays the role of a missing number
//! and propagates the way a NaN would through a column mean.

use crate::candidate::AuctionOutcome;
use serde::{Deserialize, Serialize};

/// Efficiency percentile below which a player is predicted unsold.
pub const UNSOLD_PERCENTILE: f64 = 0.25;

/// 1 crore.
const CRORE: f64 = 1e7;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactStats {
    pub runs_per_match: Option<f64>,
    pub batting_average: Option<f64>,
    pub strike_rate: Option<f64>,
    pub wickets_per_match: Option<f64>,
    pub overs_per_match: Option<f64>,
    pub economy: Option<f64>,
}

fn present(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// Min-max scale to [0, 1].
///
/// - every value missing → all 0.0
/// - every present value equal → all 0.5 (missing included)
/// - otherwise missing stays missing
pub fn minmax_normalize(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    let mut any = false;
    for v in values.iter().copied().filter_map(present) {
        any = true;
        lo = lo.min(v);
        hi = hi.max(v);
    }

    if !any {
        return vec![Some(0.0); values.len()];
    }
    if lo == hi {
        return vec![Some(0.5); values.len()];
    }
    let span = hi - lo;
    values
        .iter()
        .map(|v| present(*v).map(|x| (x - lo) / span))
        .collect()
}

fn mean_present(parts: &[Option<f64>]) -> Option<f64> {
    let (sum, n) = parts
        .iter()
        .filter_map(|p| *p)
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn column<F>(stats: &[ImpactStats], f: F) -> Vec<Option<f64>>
where
    F: Fn(&ImpactStats) -> Option<f64>,
{
    minmax_normalize(&stats.iter().map(f).collect::<Vec<_>>())
}

/// Batting impact + bowling impact per player, normalised across the batch.
pub fn impact_scores(stats: &[ImpactStats]) -> Vec<Option<f64>> {
    let runs = column(stats, |s| s.runs_per_match);
    let avg = column(stats, |s| s.batting_average);
    let sr = column(stats, |s| s.strike_rate);
    let wpm = column(stats, |s| s.wickets_per_match);
    let opm = column(stats, |s| s.overs_per_match);
    let econ = column(stats, |s| s.economy);

    (0..stats.len())
        .map(|i| {
            let batting = mean_present(&[runs[i], avg[i], sr[i]]);
            let bowling = mean_present(&[wpm[i], opm[i], econ[i].map(|e| 1.0 - e)]);
            Some(batting? + bowling?)
        })
        .collect()
}

/// Impact per crore of predicted price. Zero price gives `None`.
pub fn efficiency_scores(impacts: &[Option<f64>], prices: &[f64]) -> Vec<Option<f64>> {
    impacts
        .iter()
        .zip(prices.iter())
        .map(|(impact, price)| {
            let crore = price / CRORE;
            let impact = (*impact)?;
            if crore == 0.0 || !crore.is_finite() {
                return None;
            }
            present(Some(impact / crore))
        })
        .collect()
}

/// Efficiency cut-off fitted on historically sold players.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UnsoldThreshold {
    threshold: Option<f64>,
}

impl UnsoldThreshold {
    /// Linear-interpolated `quantile` of the present efficiencies.
    pub fn fit(efficiencies: &[Option<f64>], quantile: f64) -> Self {
        let mut sorted: Vec<f64> = efficiencies.iter().copied().filter_map(present).collect();
        if sorted.is_empty() {
            return Self { threshold: None };
        }
        sorted.sort_by(f64::total_cmp);

        let q = quantile.clamp(0.0, 1.0);
        let pos = q * (sorted.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let frac = pos - lo as f64;
        let threshold = sorted[lo] + (sorted[hi] - sorted[lo]) * frac;

        log::debug!(
            "unsold threshold fitted on {} players at q={}: {:.4}",
            sorted.len(),
            q,
            threshold
        );
        Self {
            threshold: Some(threshold),
        }
    }

    pub fn from_value(threshold: f64) -> Self {
        Self {
            threshold: present(Some(threshold)),
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.threshold
    }

    /// Missing efficiency counts as 0. Without a threshold everyone is sold.
    pub fn classify(&self, efficiency: Option<f64>) -> AuctionOutcome {
        match self.threshold {
            Some(t) if efficiency.unwrap_or(0.0) < t => AuctionOutcome::Unsold,
            _ => AuctionOutcome::Sold,
        }
    }
}
