//! Player scoring collaborators
//!
//! The selectors only ever see a finished `score` per candidate. This module
//! holds the providers that produce it: a hand-tuned rule set, a linear
//! regressor restored from a model snapshot, and the venue table that turns a
//! ground name into a pitch context.

pub mod linear;
pub mod rules;
pub mod venue;

pub use linear::LinearScorer;
pub use rules::RuleBasedScorer;
pub use venue::{VenueBook, VenueEntry, VenueLookup};

use crate::candidate::{CandidateKey, Nationality, RawRow, Role};
use crate::error::SelectionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 경기장 성향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PitchContext {
    Batting,
    Bowling,
    #[default]
    Balanced,
}

impl PitchContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            PitchContext::Batting => "batting",
            PitchContext::Bowling => "bowling",
            PitchContext::Balanced => "balanced",
        }
    }
}

impl fmt::Display for PitchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PitchContext {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batting" | "bat" => Ok(PitchContext::Batting),
            "bowling" | "bowl" => Ok(PitchContext::Bowling),
            "balanced" | "neutral" => Ok(PitchContext::Balanced),
            other => Err(SelectionError::invalid(format!("unknown pitch type '{}'", other))),
        }
    }
}

/// Toss outcome for the side being picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TossDecision {
    Bat,
    Bowl,
    #[default]
    Unknown,
}

impl FromStr for TossDecision {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bat" | "batting" => Ok(TossDecision::Bat),
            "bowl" | "bowling" | "field" => Ok(TossDecision::Bowl),
            "" | "unknown" => Ok(TossDecision::Unknown),
            other => Err(SelectionError::invalid(format!("unknown toss decision '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchContext {
    pub pitch: PitchContext,
    pub toss: TossDecision,
}

impl MatchContext {
    pub fn new(pitch: PitchContext, toss: TossDecision) -> Self {
        Self { pitch, toss }
    }
}

/// Per-player career numbers a scorer reads.
///
/// Every numeric field is optional; providers treat a missing value as 0
/// except bowling economy, which has its own sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    #[serde(default)]
    pub season: Option<u16>,
    #[serde(default)]
    pub team: Option<String>,
    pub nationality: Nationality,
    pub role: Role,
    #[serde(default)]
    pub keeper: bool,
    #[serde(default)]
    pub captaincy_exp: Option<f64>,

    #[serde(default)]
    pub batting_avg: Option<f64>,
    #[serde(default)]
    pub strike_rate: Option<f64>,
    #[serde(default)]
    pub runs: Option<f64>,
    #[serde(default)]
    pub innings: Option<f64>,

    #[serde(default)]
    pub bowling_wickets: Option<f64>,
    #[serde(default)]
    pub bowling_innings: Option<f64>,
    #[serde(default)]
    pub bowling_economy: Option<f64>,

    /// Extra named features for trained scorers.
    #[serde(default)]
    pub extra: BTreeMap<String, f64>,
}

impl PlayerStats {
    pub fn new(name: impl Into<String>, nationality: Nationality, role: Role) -> Self {
        Self {
            name: name.into(),
            season: None,
            team: None,
            nationality,
            role,
            keeper: false,
            captaincy_exp: None,
            batting_avg: None,
            strike_rate: None,
            runs: None,
            innings: None,
            bowling_wickets: None,
            bowling_innings: None,
            bowling_economy: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> CandidateKey {
        CandidateKey {
            name: self.name.clone(),
            season: self.season,
        }
    }

    /// Named feature lookup used by [`LinearScorer`]. Non-finite values are
    /// reported as absent.
    pub fn feature(&self, name: &str) -> Option<f64> {
        let value = match name {
            "avg" | "batting_avg" => self.batting_avg,
            "sr" | "strike_rate" => self.strike_rate,
            "runs" => self.runs,
            "inns" | "innings" => self.innings,
            "b_wkts" | "bowling_wickets" => self.bowling_wickets,
            "b_inns" | "bowling_innings" => self.bowling_innings,
            "b_econ" | "bowling_economy" => self.bowling_economy,
            "captaincy_exp" => self.captaincy_exp,
            "keeper" => Some(if self.keeper { 1.0 } else { 0.0 }),
            other => self.extra.get(other).copied(),
        };
        value.filter(|v| v.is_finite())
    }

    /// Candidate row carrying `score`, ready for [`crate::CandidatePool::build`].
    pub fn to_row(&self, score: f64) -> RawRow {
        RawRow {
            name: self.name.clone(),
            season: self.season,
            team: self.team.clone(),
            nationality: self.nationality,
            role: self.role,
            keeper: self.keeper,
            score: Some(score),
            cost: None,
            outcome: Default::default(),
        }
    }
}

/// Produces the per-candidate score the selectors rank by.
///
/// Implementations must be deterministic and must never return NaN or an
/// infinity.
pub trait ScoringProvider {
    fn score(&self, stats: &PlayerStats, ctx: &MatchContext) -> f64;
}

impl<T: ScoringProvider + ?Sized> ScoringProvider for &T {
    fn score(&self, stats: &PlayerStats, ctx: &MatchContext) -> f64 {
        (**self).score(stats, ctx)
    }
}

impl<T: ScoringProvider + ?Sized> ScoringProvider for Box<T> {
    fn score(&self, stats: &PlayerStats, ctx: &MatchContext) -> f64 {
        (**self).score(stats, ctx)
    }
}

/// Score every player under one match context.
pub fn score_rows<P>(provider: &P, stats: &[PlayerStats], ctx: &MatchContext) -> Vec<RawRow>
where
    P: ScoringProvider + ?Sized,
{
    let rows: Vec<RawRow> = stats.iter().map(|s| s.to_row(finite_or_zero(provider.score(s, ctx)))).collect();
    log::debug!(
        "scored {} players (pitch {}, toss {:?})",
        rows.len(),
        ctx.pitch,
        ctx.toss
    );
    rows
}

#[inline]
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
