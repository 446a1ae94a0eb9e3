//! Selector parameters
//!
//! Defaults reproduce the auction (squad) and T20 line-up presets.

use serde::{Deserialize, Serialize};

use crate::candidate::Role;
use crate::error::{Result, SelectionError};

/// Minimum domestic count for one role. Position in the list is fill priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleQuota {
    pub role: Role,
    pub minimum: usize,
}

impl RoleQuota {
    pub fn new(role: Role, minimum: usize) -> Self {
        Self { role, minimum }
    }
}

impl From<(Role, usize)> for RoleQuota {
    fn from((role, minimum): (Role, usize)) -> Self {
        Self { role, minimum }
    }
}

/// Budgeted squad assembly parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadParams {
    /// Monetary cap, same unit as candidate cost (기본: 100.0)
    pub purse: f64,
    /// Target squad size (기본: 9)
    pub squad_size: usize,
    /// Overseas floor (기본: 1)
    pub min_overseas: usize,
    /// Overseas ceiling (기본: 3)
    pub max_overseas: usize,
    /// Ordered role minimums (기본: Batter 3, Bowler 3, Allrounder 2)
    pub role_minimums: Vec<RoleQuota>,
}

impl Default for SquadParams {
    fn default() -> Self {
        Self {
            purse: 100.0,
            squad_size: 9,
            min_overseas: 1,
            max_overseas: 3,
            role_minimums: vec![
                RoleQuota::new(Role::Batter, 3),
                RoleQuota::new(Role::Bowler, 3),
                RoleQuota::new(Role::Allrounder, 2),
            ],
        }
    }
}

impl SquadParams {
    pub fn validate(&self) -> Result<()> {
        if !self.purse.is_finite() || self.purse < 0.0 {
            return Err(SelectionError::invalid(format!(
                "purse must be finite and >= 0, got {}",
                self.purse
            )));
        }
        if self.squad_size == 0 {
            return Err(SelectionError::invalid("squad_size must be >= 1"));
        }
        if self.min_overseas > self.max_overseas {
            return Err(SelectionError::invalid(format!(
                "min_overseas ({}) > max_overseas ({})",
                self.min_overseas, self.max_overseas
            )));
        }
        if self.max_overseas > self.squad_size {
            return Err(SelectionError::invalid(format!(
                "max_overseas ({}) > squad_size ({})",
                self.max_overseas, self.squad_size
            )));
        }
        for (i, quota) in self.role_minimums.iter().enumerate() {
            if self.role_minimums[..i].iter().any(|q| q.role == quota.role) {
                return Err(SelectionError::invalid(format!(
                    "role {} listed more than once in role_minimums",
                    quota.role
                )));
            }
        }
        Ok(())
    }
}

/// Inclusive [min, max] range a count must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub min: usize,
    pub max: usize,
}

impl Band {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: usize) -> bool {
        value >= self.min && value <= self.max
    }
}

/// When the bowler count sits exactly at the band minimum, require at least
/// `min_allrounders` allrounders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllrounderRule {
    pub min_allrounders: usize,
}

/// Fixed-size line-up parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineupParams {
    /// Line-up size (기본: 11)
    pub size: usize,
    /// Overseas ceiling (기본: 4)
    pub overseas_cap: usize,
    /// Specialist bowler band (기본: 4..=6)
    pub bowler_band: Band,
    /// Allrounder minimum at the band floor (기본: 2)
    pub allrounder_rule: AllrounderRule,
    /// Swap budget per repair pass (기본: 20)
    pub iteration_cap: usize,
}

impl Default for LineupParams {
    fn default() -> Self {
        Self {
            size: 11,
            overseas_cap: 4,
            bowler_band: Band::new(4, 6),
            allrounder_rule: AllrounderRule { min_allrounders: 2 },
            iteration_cap: 20,
        }
    }
}

impl LineupParams {
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(SelectionError::invalid("line-up size must be >= 1"));
        }
        if self.bowler_band.min > self.bowler_band.max {
            return Err(SelectionError::invalid(format!(
                "bowler band min ({}) > max ({})",
                self.bowler_band.min, self.bowler_band.max
            )));
        }
        if self.bowler_band.min > self.size {
            return Err(SelectionError::invalid(format!(
                "bowler band min ({}) exceeds line-up size ({})",
                self.bowler_band.min, self.size
            )));
        }
        if self.bowler_band.min + self.allrounder_rule.min_allrounders > self.size {
            return Err(SelectionError::invalid(format!(
                "{} bowlers plus {} allrounders cannot fit in {} slots",
                self.bowler_band.min, self.allrounder_rule.min_allrounders, self.size
            )));
        }
        if self.iteration_cap == 0 {
            return Err(SelectionError::invalid("iteration_cap must be >= 1"));
        }
        Ok(())
    }
}
