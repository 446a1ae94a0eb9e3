//! Auction price and sold/unsold prediction
//!
//! Prices come from two log-space regressors averaged 50/50 and floored at
//! the player's declared base price. Efficiency (impact per crore) then
//! decides whether a player is predicted to go unsold: anything below the
//! lower quartile of historically sold players is flagged.

pub mod efficiency;

pub use efficiency::{
    efficiency_scores, impact_scores, minmax_normalize, ImpactStats, UnsoldThreshold,
    UNSOLD_PERCENTILE,
};

use crate::candidate::AuctionOutcome;
use crate::error::{Result, SelectionError};
use crate::scoring::LinearScorer;
use serde::{Deserialize, Serialize};

/// Regressor predicting `ln(1 + price)` from a feature vector.
pub trait LogPriceModel {
    fn predict_log_price(&self, features: &[f64]) -> f64;
}

impl LogPriceModel for LinearScorer {
    fn predict_log_price(&self, features: &[f64]) -> f64 {
        self.predict(features)
    }
}

impl<F> LogPriceModel for F
where
    F: Fn(&[f64]) -> f64,
{
    fn predict_log_price(&self, features: &[f64]) -> f64 {
        self(features)
    }
}

/// Two independently trained models blended evenly in price space.
#[derive(Debug, Clone)]
pub struct EnsemblePricer<A, B> {
    pub primary: A,
    pub secondary: B,
}

impl<A: LogPriceModel, B: LogPriceModel> EnsemblePricer<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }

    /// Predicted price, never below `base_price` (missing base = 0).
    pub fn price(&self, features: &[f64], base_price: Option<f64>) -> f64 {
        let a = self.primary.predict_log_price(features).exp_m1();
        let b = self.secondary.predict_log_price(features).exp_m1();
        let blended = 0.5 * a + 0.5 * b;
        let floor = base_price.filter(|p| p.is_finite()).unwrap_or(0.0);

        if blended.is_finite() {
            blended.max(floor)
        } else {
            floor
        }
    }
}

/// One player's pricing inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    pub features: Vec<f64>,
    #[serde(default)]
    pub base_price: Option<f64>,
    pub impact: ImpactStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub price: f64,
    pub impact: Option<f64>,
    pub efficiency: Option<f64>,
    pub outcome: AuctionOutcome,
}

/// Price every player, score efficiency across the whole batch and classify
/// against `threshold`.
///
/// Normalisation is batch-relative, so the same player can get a different
/// efficiency in a different batch.
pub fn value_players<A, B>(
    pricer: &EnsemblePricer<A, B>,
    inputs: &[PricingInput],
    threshold: &UnsoldThreshold,
) -> Vec<Valuation>
where
    A: LogPriceModel,
    B: LogPriceModel,
{
    let prices: Vec<f64> = inputs
        .iter()
        .map(|i| pricer.price(&i.features, i.base_price))
        .collect();
    let stats: Vec<ImpactStats> = inputs.iter().map(|i| i.impact.clone()).collect();
    let impacts = impact_scores(&stats);
    let effs = efficiency_scores(&impacts, &prices);

    let valuations: Vec<Valuation> = prices
        .into_iter()
        .zip(impacts)
        .zip(effs)
        .map(|((price, impact), efficiency)| Valuation {
            price,
            impact,
            efficiency,
            outcome: threshold.classify(efficiency),
        })
        .collect();

    let unsold = valuations
        .iter()
        .filter(|v| v.outcome == AuctionOutcome::Unsold)
        .count();
    log::info!("valued {} players, {} predicted unsold", valuations.len(), unsold);
    valuations
}

/// Training seasons for a retrain: the two most recent seasons strictly
/// before the latest one (one if only one exists).
pub fn select_training_seasons(seasons: &[u16]) -> Result<Vec<u16>> {
    let mut years: Vec<u16> = seasons.to_vec();
    years.sort_unstable();
    years.dedup();

    let Some(&latest) = years.last() else {
        return Err(SelectionError::invalid("no seasons to train on"));
    };
    let past: Vec<u16> = years.into_iter().filter(|y| *y < latest).collect();
    if past.is_empty() {
        return Err(SelectionError::invalid(format!(
            "no completed season before {} to train on",
            latest
        )));
    }

    let start = past.len().saturating_sub(2);
    Ok(past[start..].to_vec())
}
