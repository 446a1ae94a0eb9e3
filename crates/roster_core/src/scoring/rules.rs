//! Rule-based player score
//!
//! batting = 0.5·avg + 0.2·sr + 0.3·runs/inns
//! bowling = 25·wkts/inns + 5·max(0, 8 − econ)
//!
//! Both are blended by role weight, then scaled by pitch, toss and a couple of
//! flat bonuses.

use super::{finite_or_zero, MatchContext, PitchContext, PlayerStats, ScoringProvider, TossDecision};
use crate::candidate::Role;
use serde::{Deserialize, Serialize};

/// Economy used when a player has no bowling record; large enough that the
/// economy term contributes nothing.
pub const MISSING_ECONOMY: f64 = 999.0;

/// Tunable multipliers. Defaults reproduce the production table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleBasedScorer {
    /// 타자 가중치 (bat, bowl) (기본: 1.2, 0.6)
    pub batter_weights: (f64, f64),
    /// 투수 가중치 (bat, bowl) (기본: 0.6, 1.2)
    pub bowler_weights: (f64, f64),
    /// 유리한 피치에서의 전문가 배율 (기본: 1.2)
    pub pitch_specialist: f64,
    /// 불리한 피치에서의 전문가 배율 (기본: 0.9)
    pub pitch_offside: f64,
    /// 배팅 피치 올라운더 배율 (기본: 1.05)
    pub batting_pitch_other: f64,
    /// 볼링 피치 올라운더 배율 (기본: 1.10)
    pub bowling_pitch_other: f64,
    /// 토스 시너지 (기본: 1.05)
    pub toss_synergy: f64,
    /// 주장 경험 보너스 (기본: 1.02)
    pub captaincy_bonus: f64,
    /// 키퍼 보너스 (기본: 1.03)
    pub keeper_bonus: f64,
}

impl Default for RuleBasedScorer {
    fn default() -> Self {
        Self {
            batter_weights: (1.2, 0.6),
            bowler_weights: (0.6, 1.2),
            pitch_specialist: 1.2,
            pitch_offside: 0.9,
            batting_pitch_other: 1.05,
            bowling_pitch_other: 1.10,
            toss_synergy: 1.05,
            captaincy_bonus: 1.02,
            keeper_bonus: 1.03,
        }
    }
}

impl RuleBasedScorer {
    pub fn batting_raw(stats: &PlayerStats) -> f64 {
        let avg = num(stats.batting_avg);
        let sr = num(stats.strike_rate);
        let runs = num(stats.runs);
        let inns = num(stats.innings);
        let runs_per_inns = if inns > 0.0 { runs / inns } else { 0.0 };

        0.5 * avg + 0.2 * sr + 0.3 * runs_per_inns
    }

    pub fn bowling_raw(stats: &PlayerStats) -> f64 {
        let wkts = num(stats.bowling_wickets);
        let inns = num(stats.bowling_innings);
        let econ = stats
            .bowling_economy
            .filter(|e| e.is_finite())
            .unwrap_or(MISSING_ECONOMY);
        let wkts_per_inns = if inns > 0.0 { wkts / inns } else { 0.0 };

        wkts_per_inns * 25.0 + (8.0 - econ).max(0.0) * 5.0
    }

    fn role_weights(&self, role: Role) -> (f64, f64) {
        match role {
            Role::Batter => self.batter_weights,
            Role::Bowler => self.bowler_weights,
            Role::Allrounder => (1.0, 1.0),
        }
    }

    fn pitch_factor(&self, role: Role, pitch: PitchContext) -> f64 {
        match (pitch, role) {
            (PitchContext::Balanced, _) => 1.0,
            (PitchContext::Batting, Role::Batter) | (PitchContext::Bowling, Role::Bowler) => {
                self.pitch_specialist
            }
            (PitchContext::Batting, Role::Bowler) | (PitchContext::Bowling, Role::Batter) => {
                self.pitch_offside
            }
            (PitchContext::Batting, Role::Allrounder) => self.batting_pitch_other,
            (PitchContext::Bowling, Role::Allrounder) => self.bowling_pitch_other,
        }
    }
}

impl ScoringProvider for RuleBasedScorer {
    fn score(&self, stats: &PlayerStats, ctx: &MatchContext) -> f64 {
        let (bat_w, bowl_w) = self.role_weights(stats.role);
        let mut score = bat_w * Self::batting_raw(stats) + bowl_w * Self::bowling_raw(stats);

        score *= self.pitch_factor(stats.role, ctx.pitch);

        match (ctx.toss, stats.role) {
            (TossDecision::Bat, Role::Batter) | (TossDecision::Bowl, Role::Bowler) => {
                score *= self.toss_synergy;
            }
            _ => {}
        }

        if num(stats.captaincy_exp) > 0.0 {
            score *= self.captaincy_bonus;
        }
        if stats.keeper {
            score *= self.keeper_bonus;
        }

        finite_or_zero(score)
    }
}

#[inline]
fn num(value: Option<f64>) -> f64 {
    value.map(finite_or_zero).unwrap_or(0.0)
}
