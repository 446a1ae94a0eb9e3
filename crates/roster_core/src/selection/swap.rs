//! SwapEngine: one-for-one exchanges between roster and bench
//!
//! Membership is a flag per arena slot, so "is this candidate on the roster"
//! is O(1) and a swap touches one roster position and two flags. Aggregate
//! counts are re-tallied from the roster after every swap.

use crate::candidate::{Candidate, CandidateId, CandidatePool};
use crate::error::{Result, SelectionError};
use crate::roster::{rank_order, RosterCounts};

#[derive(Debug, Clone)]
pub struct SwapEngine<'p> {
    pool: &'p CandidatePool,
    on_roster: Vec<bool>,
    roster: Vec<CandidateId>,
    counts: RosterCounts,
}

impl<'p> SwapEngine<'p> {
    /// Start from a seeded roster; everything else in the pool is bench.
    pub fn new(pool: &'p CandidatePool, seeded: Vec<CandidateId>) -> Result<Self> {
        let mut on_roster = vec![false; pool.len()];
        for id in &seeded {
            match on_roster.get_mut(id.index()) {
                Some(flag) if !*flag => *flag = true,
                Some(_) => {
                    return Err(SelectionError::invariant(format!(
                        "candidate {} seeded twice",
                        id
                    )))
                }
                None => {
                    return Err(SelectionError::invariant(format!(
                        "candidate {} is not in the pool",
                        id
                    )))
                }
            }
        }

        let counts = RosterCounts::tally(seeded.iter().map(|id| &pool[*id]));
        Ok(Self {
            pool,
            on_roster,
            roster: seeded,
            counts,
        })
    }

    pub fn roster(&self) -> &[CandidateId] {
        &self.roster
    }

    pub fn counts(&self) -> RosterCounts {
        self.counts
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    #[inline]
    pub fn on_roster(&self, id: CandidateId) -> bool {
        self.on_roster.get(id.index()).copied().unwrap_or(false)
    }

    #[inline]
    pub fn on_bench(&self, id: CandidateId) -> bool {
        id.index() < self.on_roster.len() && !self.on_roster[id.index()]
    }

    /// Bench candidates, best first.
    pub fn bench_ranked(&self) -> impl Iterator<Item = &'p Candidate> + '_ {
        let pool = self.pool;
        pool.ranked()
            .iter()
            .filter(move |id| !self.on_roster[id.index()])
            .map(move |id| &pool[*id])
    }

    /// Roster candidates, weakest first (reverse of pool ranking).
    pub fn roster_weakest_first(&self) -> Vec<&'p Candidate> {
        let pool = self.pool;
        let mut players: Vec<&Candidate> = self.roster.iter().map(|id| &pool[*id]).collect();
        players.sort_by(|a, b| rank_order(b, a));
        players
    }

    /// Overseas count the roster would have after swapping `out` for `incoming`.
    pub fn overseas_after(&self, out: &Candidate, incoming: &Candidate) -> usize {
        self.counts.overseas + usize::from(incoming.is_overseas()) - usize::from(out.is_overseas())
    }

    /// Replace `out` (on the roster) with `incoming` (on the bench).
    ///
    /// Roster size is unchanged and the roster stays duplicate-free. Fails
    /// with `InvariantViolation`, leaving the state untouched, when either
    /// candidate is on the wrong side.
    pub fn swap(&mut self, out: CandidateId, incoming: CandidateId) -> Result<RosterCounts> {
        if !self.on_roster(out) {
            return Err(SelectionError::invariant(format!(
                "outgoing candidate {} is not on the roster",
                out
            )));
        }
        if !self.on_bench(incoming) {
            return Err(SelectionError::invariant(format!(
                "incoming candidate {} is not on the bench",
                incoming
            )));
        }

        let slot = self
            .roster
            .iter()
            .position(|id| *id == out)
            .ok_or_else(|| SelectionError::invariant(format!("roster lost track of {}", out)))?;

        self.roster[slot] = incoming;
        self.on_roster[out.index()] = false;
        self.on_roster[incoming.index()] = true;

        let pool = self.pool;
        self.counts = RosterCounts::tally(self.roster.iter().map(|id| &pool[*id]));

        log::debug!(
            "swap: {} out, {} in (overseas {}, bowlers {}, allrounders {}, keepers {})",
            pool[out].name,
            pool[incoming].name,
            self.counts.overseas,
            self.counts.bowlers,
            self.counts.allrounders,
            self.counts.keepers
        );

        Ok(self.counts)
    }

    pub fn into_roster(self) -> Vec<CandidateId> {
        self.roster
    }
}
