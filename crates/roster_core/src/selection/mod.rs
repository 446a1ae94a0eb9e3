//! Roster selection engine
//!
//! - [`BudgetedGreedySelector`]: squad assembly under a purse and quotas
//! - [`ConstraintRepairSelector`]: fixed-size line-up with repair passes
//! - [`SwapEngine`]: roster/bench exchange primitive used by the repair passes
//!
//! Both selectors are pure functions of (pool, parameters): no I/O, no
//! shared state, identical inputs give identical rosters.

pub mod budgeted;
pub mod diagnostics;
pub mod params;
pub mod repair;
pub mod swap;

#[cfg(test)]
mod tests;

pub use budgeted::BudgetedGreedySelector;
pub use diagnostics::{Phase, Selection, SelectionEvent, UnmetConstraint};
pub use params::{AllrounderRule, Band, LineupParams, RoleQuota, SquadParams};
pub use repair::ConstraintRepairSelector;
pub use swap::SwapEngine;

use crate::candidate::CandidatePool;
use crate::error::Result;
use crate::scoring::PitchContext;

/// Budgeted squad assembly.
pub fn select_squad(
    pool: &CandidatePool,
    purse: f64,
    squad_size: usize,
    max_overseas: usize,
    min_overseas: usize,
    role_minimums: Vec<RoleQuota>,
) -> Result<Selection> {
    BudgetedGreedySelector::new(SquadParams {
        purse,
        squad_size,
        min_overseas,
        max_overseas,
        role_minimums,
    })?
    .select(pool)
}

/// Line-up assembly at the default size and iteration cap.
pub fn select_starting_lineup(
    pool: &CandidatePool,
    overseas_cap: usize,
    bowler_band: Band,
    allrounder_rule: AllrounderRule,
    pitch: PitchContext,
) -> Result<Selection> {
    ConstraintRepairSelector::new(LineupParams {
        overseas_cap,
        bowler_band,
        allrounder_rule,
        ..LineupParams::default()
    })?
    .select(pool, pitch)
}
