//! BudgetedGreedySelector: phased greedy squad assembly under a purse
//!
//! Three phases, all gated by `spent + cost <= purse` and the squad size:
//! 1. overseas floor, best overseas first
//! 2. role fill, domestic only, in the declared quota order
//! 3. filler, best remaining domestic
//!
//! Nothing is ever removed once picked. Shortfalls are reported as unmet
//! constraints on the returned selection.

use crate::candidate::{Candidate, CandidateId, CandidatePool, Nationality, Requirement, Role};
use crate::error::{Result, SelectionError};
use crate::roster::Roster;

use super::diagnostics::{Phase, Selection, SelectionEvent, UnmetConstraint};
use super::params::SquadParams;

#[derive(Debug, Clone)]
pub struct BudgetedGreedySelector {
    params: SquadParams,
}

/// Running state of one budgeted selection.
struct Ledger {
    picked: Vec<CandidateId>,
    taken: Vec<bool>,
    spent: f64,
    overseas: usize,
    events: Vec<SelectionEvent>,
}

impl Ledger {
    fn new(pool_len: usize) -> Self {
        Self {
            picked: Vec::new(),
            taken: vec![false; pool_len],
            spent: 0.0,
            overseas: 0,
            events: Vec::new(),
        }
    }

    #[inline]
    fn affordable(&self, candidate: &Candidate, purse: f64) -> bool {
        self.spent + candidate.cost_or_zero() <= purse
    }

    fn add(&mut self, candidate: &Candidate, phase: Phase) {
        self.picked.push(candidate.id);
        self.taken[candidate.id.index()] = true;
        self.spent += candidate.cost_or_zero();
        if candidate.is_overseas() {
            self.overseas += 1;
        }
        self.events.push(SelectionEvent::Added {
            id: candidate.id,
            phase,
        });
        log::debug!(
            "{:?}: picked {} (score {:.3}, cost {:.3}, spent {:.3})",
            phase,
            candidate.name,
            candidate.score,
            candidate.cost_or_zero(),
            self.spent
        );
    }
}

impl BudgetedGreedySelector {
    pub fn new(params: SquadParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SquadParams {
        &self.params
    }

    pub fn select(&self, pool: &CandidatePool) -> Result<Selection> {
        if pool.requirement() != Requirement::ScoreAndCost {
            return Err(SelectionError::invalid(
                "budgeted selection needs a pool built with Requirement::ScoreAndCost",
            ));
        }

        let p = &self.params;
        let mut ledger = Ledger::new(pool.len());

        // Phase 1: overseas floor
        for candidate in pool.ranked_where(|c| c.is_overseas()) {
            if ledger.overseas >= p.min_overseas
                || ledger.overseas >= p.max_overseas
                || ledger.picked.len() >= p.squad_size
            {
                break;
            }
            if ledger.affordable(candidate, p.purse) {
                ledger.add(candidate, Phase::OverseasFloor);
            }
        }

        // Phase 2: role fill, declared order is priority order
        for quota in &p.role_minimums {
            if ledger.picked.len() >= p.squad_size {
                break;
            }
            let role = quota.role;
            let mut have = domestic_role_count(pool, &ledger.picked, role);
            for candidate in
                pool.ranked_where(move |c| c.nationality == Nationality::Domestic && c.role == role)
            {
                if have >= quota.minimum || ledger.picked.len() >= p.squad_size {
                    break;
                }
                if !ledger.taken[candidate.id.index()] && ledger.affordable(candidate, p.purse) {
                    ledger.add(candidate, Phase::RoleFill);
                    have += 1;
                }
            }
        }

        // Phase 3: domestic filler
        for candidate in pool.ranked_where(|c| c.nationality == Nationality::Domestic) {
            if ledger.picked.len() >= p.squad_size {
                break;
            }
            if !ledger.taken[candidate.id.index()] && ledger.affordable(candidate, p.purse) {
                ledger.add(candidate, Phase::Filler);
            }
        }

        let roster = Roster::assemble_budgeted(pool, &ledger.picked, p.purse, ledger.spent);
        let unmet = self.unmet(pool, &ledger, &roster);

        log::info!(
            "squad selected: {}/{} players, spent {:.3} of {:.3}, overseas {}",
            roster.len(),
            p.squad_size,
            roster.total_cost(),
            p.purse,
            roster.counts().overseas
        );
        for u in &unmet {
            log::warn!("squad constraint unmet: {}", u);
        }

        Ok(Selection {
            roster,
            impact: None,
            unmet,
            events: ledger.events,
        })
    }

    fn unmet(&self, pool: &CandidatePool, ledger: &Ledger, roster: &Roster) -> Vec<UnmetConstraint> {
        let p = &self.params;
        let mut unmet = Vec::new();

        if roster.len() < p.squad_size {
            unmet.push(UnmetConstraint::SquadSize {
                required: p.squad_size,
                achieved: roster.len(),
            });
        }
        let overseas = roster.counts().overseas;
        if overseas < p.min_overseas {
            unmet.push(UnmetConstraint::OverseasFloor {
                required: p.min_overseas,
                achieved: overseas,
            });
        }
        for quota in &p.role_minimums {
            let achieved = domestic_role_count(pool, &ledger.picked, quota.role);
            if achieved < quota.minimum {
                unmet.push(UnmetConstraint::RoleMinimum {
                    role: quota.role,
                    required: quota.minimum,
                    achieved,
                });
            }
        }
        unmet
    }
}

fn domestic_role_count(pool: &CandidatePool, picked: &[CandidateId], role: Role) -> usize {
    picked
        .iter()
        .map(|id| &pool[*id])
        .filter(|c| c.nationality == Nationality::Domestic && c.role == role)
        .count()
}
