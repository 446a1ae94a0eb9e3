//! Roster: the immutable output of a selection call

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::candidate::{Candidate, CandidateId, CandidateKey, CandidatePool, Role};

/// Aggregate counts over a set of candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterCounts {
    pub overseas: usize,
    pub domestic: usize,
    pub batters: usize,
    pub bowlers: usize,
    pub allrounders: usize,
    pub keepers: usize,
}

impl RosterCounts {
    /// Count from scratch; never carried incrementally.
    pub fn tally<'a, I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = &'a Candidate>,
    {
        let mut counts = RosterCounts::default();
        for c in candidates {
            if c.is_overseas() {
                counts.overseas += 1;
            } else {
                counts.domestic += 1;
            }
            match c.role {
                Role::Batter => counts.batters += 1,
                Role::Bowler => counts.bowlers += 1,
                Role::Allrounder => counts.allrounders += 1,
            }
            if c.keeper {
                counts.keepers += 1;
            }
        }
        counts
    }

    pub fn role(&self, role: Role) -> usize {
        match role {
            Role::Batter => self.batters,
            Role::Bowler => self.bowlers,
            Role::Allrounder => self.allrounders,
        }
    }

    pub fn total(&self) -> usize {
        self.overseas + self.domestic
    }
}

/// Ordered, duplicate-free, size-bounded selection result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Candidate>,
    counts: RosterCounts,
    total_cost: f64,
    remaining_budget: Option<f64>,
}

impl Roster {
    pub fn empty(purse: Option<f64>) -> Self {
        Self {
            players: Vec::new(),
            counts: RosterCounts::default(),
            total_cost: 0.0,
            remaining_budget: purse,
        }
    }

    /// Copy the selected candidates out of the pool, ordered by descending
    /// score (ties by arena order). Unbudgeted.
    pub(crate) fn assemble(pool: &CandidatePool, ids: &[CandidateId]) -> Self {
        let players = ranked_players(pool, ids);
        let total_cost: f64 = ids.iter().map(|id| pool[*id].cost_or_zero()).sum();

        Self {
            counts: RosterCounts::tally(&players),
            players,
            total_cost,
            remaining_budget: None,
        }
    }

    /// Like [`Roster::assemble`], but reports `spent` as the total.
    ///
    /// `spent` must be the running sum the purse check accumulated in pick
    /// order. Re-summing in display order can round differently and land a
    /// few ulps above the purse.
    pub(crate) fn assemble_budgeted(
        pool: &CandidatePool,
        ids: &[CandidateId],
        purse: f64,
        spent: f64,
    ) -> Self {
        let players = ranked_players(pool, ids);

        Self {
            counts: RosterCounts::tally(&players),
            players,
            total_cost: spent,
            remaining_budget: Some(purse - spent),
        }
    }

    pub fn players(&self) -> &[Candidate] {
        &self.players
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn counts(&self) -> RosterCounts {
        self.counts
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Purse minus spend; `None` for unbudgeted rosters.
    pub fn remaining_budget(&self) -> Option<f64> {
        self.remaining_budget
    }

    pub fn ids(&self) -> Vec<CandidateId> {
        self.players.iter().map(|c| c.id).collect()
    }

    pub fn contains(&self, key: &CandidateKey) -> bool {
        self.players
            .iter()
            .any(|c| c.name == key.name && c.season == key.season)
    }

    pub fn names(&self) -> Vec<&str> {
        self.players.iter().map(|c| c.name.as_str()).collect()
    }
}

fn ranked_players(pool: &CandidatePool, ids: &[CandidateId]) -> Vec<Candidate> {
    let mut players: Vec<Candidate> = ids.iter().map(|id| pool[*id].clone()).collect();
    players.sort_by(rank_order);
    players
}

/// Descending score, then ascending arena id.
pub(crate) fn rank_order(a: &Candidate, b: &Candidate) -> Ordering {
    b.score.total_cmp(&a.score).then(a.id.cmp(&b.id))
}
