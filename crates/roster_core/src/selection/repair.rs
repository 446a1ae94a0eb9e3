//! ConstraintRepairSelector: fixed-size line-up with role-band repair
//!
//! Seed fill (keeper first, then best-by-score under the overseas cap),
//! followed by bounded repair passes:
//!
//! | Pass             | Trigger                              | Swap                                  |
//! |------------------|--------------------------------------|---------------------------------------|
//! | Bowler band (lo) | bowlers < band.min                   | best bench bowler ↔ weakest non-bowler, non-keeper |
//! | Bowler band (hi) | bowlers > band.max                   | weakest non-keeper bowler ↔ best bench non-bowler |
//! | Allrounder min   | bowlers == band.min, AR < rule.min   | best bench AR ↔ weakest pure batter    |
//! | Keeper guarantee | no keeper on roster, pool has one    | best keeper ↔ weakest non-keeper       |
//!
//! Every swap must keep the overseas count within the cap. Each pass stops
//! when satisfied, when no valid swap exists, or after `iteration_cap` swaps.

use crate::candidate::{Candidate, CandidateId, CandidatePool, Role};
use crate::error::Result;
use crate::roster::{Roster, RosterCounts};
use crate::scoring::PitchContext;

use super::diagnostics::{Phase, Selection, SelectionEvent, UnmetConstraint};
use super::params::LineupParams;
use super::swap::SwapEngine;

#[derive(Debug, Clone)]
pub struct ConstraintRepairSelector {
    params: LineupParams,
}

impl ConstraintRepairSelector {
    pub fn new(params: LineupParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &LineupParams {
        &self.params
    }

    pub fn select(&self, pool: &CandidatePool, pitch: PitchContext) -> Result<Selection> {
        let keeper_required = pool.has_keeper();
        let mut events = Vec::new();

        let seeded = self.seed(pool, &mut events);
        let mut engine = SwapEngine::new(pool, seeded)?;

        self.repair_bowler_band(&mut engine, &mut events)?;
        self.repair_allrounders(&mut engine, &mut events)?;
        if keeper_required {
            self.guarantee_keeper(pool, &mut engine, &mut events)?;
        }

        let impact = pick_impact(&engine, pitch).cloned();
        let counts = engine.counts();
        let roster = Roster::assemble(pool, engine.roster());
        let unmet = self.unmet(&counts, roster.len(), keeper_required);

        log::info!(
            "line-up selected: {}/{} players, bowlers {}, allrounders {}, keepers {}, overseas {}, impact {}",
            roster.len(),
            self.params.size,
            counts.bowlers,
            counts.allrounders,
            counts.keepers,
            counts.overseas,
            impact.as_ref().map(|c| c.name.as_str()).unwrap_or("-")
        );
        for u in &unmet {
            log::warn!("line-up constraint unmet: {}", u);
        }

        Ok(Selection {
            roster,
            impact,
            unmet,
            events,
        })
    }

    /// Keeper first, then best by score, skipping overseas once the cap is hit.
    fn seed(&self, pool: &CandidatePool, events: &mut Vec<SelectionEvent>) -> Vec<CandidateId> {
        let cap = self.params.overseas_cap;
        let mut seeded: Vec<CandidateId> = Vec::with_capacity(self.params.size);
        let mut taken = vec![false; pool.len()];
        let mut overseas = 0usize;

        // Best keeper that fits under the cap.
        if let Some(keeper) = pool
            .ranked_where(|c| c.keeper)
            .find(|c| !c.is_overseas() || cap > 0)
        {
            seeded.push(keeper.id);
            taken[keeper.id.index()] = true;
            overseas += usize::from(keeper.is_overseas());
            events.push(SelectionEvent::Added {
                id: keeper.id,
                phase: Phase::Seed,
            });
        }

        for id in pool.ranked() {
            if seeded.len() >= self.params.size {
                break;
            }
            let candidate = &pool[*id];
            if taken[id.index()] || (candidate.is_overseas() && overseas >= cap) {
                continue;
            }
            seeded.push(*id);
            taken[id.index()] = true;
            overseas += usize::from(candidate.is_overseas());
            events.push(SelectionEvent::Added {
                id: *id,
                phase: Phase::Seed,
            });
        }

        log::debug!("seed: {} players, overseas {}", seeded.len(), overseas);
        seeded
    }

    fn repair_bowler_band(
        &self,
        engine: &mut SwapEngine<'_>,
        events: &mut Vec<SelectionEvent>,
    ) -> Result<()> {
        let band = self.params.bowler_band;
        let cap = self.params.overseas_cap;

        for _ in 0..self.params.iteration_cap {
            let bowlers = engine.counts().bowlers;

            let swap = if bowlers < band.min {
                let Some(incoming) = engine.bench_ranked().find(|c| c.is_bowler()) else {
                    break;
                };
                engine
                    .roster_weakest_first()
                    .into_iter()
                    .filter(|c| !c.is_bowler() && !c.keeper)
                    .find(|out| engine.overseas_after(out, incoming) <= cap)
                    .map(|out| (out.id, incoming.id))
            } else if bowlers > band.max {
                let Some(out) = engine
                    .roster_weakest_first()
                    .into_iter()
                    .find(|c| c.is_bowler() && !c.keeper)
                else {
                    break;
                };
                engine
                    .bench_ranked()
                    .filter(|c| !c.is_bowler())
                    .find(|incoming| engine.overseas_after(out, incoming) <= cap)
                    .map(|incoming| (out.id, incoming.id))
            } else {
                break;
            };

            match swap {
                Some((out, incoming)) => apply(engine, events, out, incoming, Phase::BowlerBand)?,
                None => break,
            }
        }
        Ok(())
    }

    fn repair_allrounders(
        &self,
        engine: &mut SwapEngine<'_>,
        events: &mut Vec<SelectionEvent>,
    ) -> Result<()> {
        let band_min = self.params.bowler_band.min;
        let required = self.params.allrounder_rule.min_allrounders;
        let cap = self.params.overseas_cap;

        if engine.counts().bowlers != band_min {
            return Ok(());
        }

        for _ in 0..self.params.iteration_cap {
            if engine.counts().allrounders >= required {
                break;
            }
            let Some(incoming) = engine.bench_ranked().find(|c| c.is_allrounder()) else {
                break;
            };
            let swap = engine
                .roster_weakest_first()
                .into_iter()
                .filter(|c| c.is_pure_batter())
                .find(|out| engine.overseas_after(out, incoming) <= cap)
                .map(|out| (out.id, incoming.id));

            match swap {
                Some((out, incoming)) => {
                    apply(engine, events, out, incoming, Phase::AllrounderMinimum)?
                }
                None => break,
            }
        }
        Ok(())
    }

    /// Soft: leaves the line-up keeper-less if no swap fits the cap.
    fn guarantee_keeper(
        &self,
        pool: &CandidatePool,
        engine: &mut SwapEngine<'_>,
        events: &mut Vec<SelectionEvent>,
    ) -> Result<()> {
        if engine.counts().keepers > 0 {
            return Ok(());
        }
        let Some(keeper) = pool.best_keeper() else {
            return Ok(());
        };
        let cap = self.params.overseas_cap;

        let swap = engine
            .roster_weakest_first()
            .into_iter()
            .filter(|c| !c.keeper)
            .find(|out| engine.overseas_after(out, keeper) <= cap)
            .map(|out| out.id);

        match swap {
            Some(out) => apply(engine, events, out, keeper.id, Phase::KeeperGuarantee)?,
            None => log::warn!(
                "keeper {} cannot enter the line-up without breaching the overseas cap",
                keeper.name
            ),
        }
        Ok(())
    }

    fn unmet(&self, counts: &RosterCounts, len: usize, keeper_required: bool) -> Vec<UnmetConstraint> {
        let p = &self.params;
        let mut unmet = Vec::new();

        if len < p.size {
            unmet.push(UnmetConstraint::SquadSize {
                required: p.size,
                achieved: len,
            });
        }
        if !p.bowler_band.contains(counts.bowlers) {
            unmet.push(UnmetConstraint::BowlerBand {
                min: p.bowler_band.min,
                max: p.bowler_band.max,
                achieved: counts.bowlers,
            });
        }
        if counts.bowlers == p.bowler_band.min
            && counts.allrounders < p.allrounder_rule.min_allrounders
        {
            unmet.push(UnmetConstraint::AllrounderMinimum {
                required: p.allrounder_rule.min_allrounders,
                achieved: counts.allrounders,
            });
        }
        if keeper_required && counts.keepers == 0 {
            unmet.push(UnmetConstraint::KeeperMissing);
        }
        unmet
    }
}

fn apply(
    engine: &mut SwapEngine<'_>,
    events: &mut Vec<SelectionEvent>,
    out: CandidateId,
    incoming: CandidateId,
    phase: Phase,
) -> Result<()> {
    engine.swap(out, incoming)?;
    events.push(SelectionEvent::Swapped {
        out,
        incoming,
        phase,
    });
    Ok(())
}

/// Best bench candidate for the pitch, falling back to the best bench
/// candidate of any role.
fn pick_impact<'p>(engine: &SwapEngine<'p>, pitch: PitchContext) -> Option<&'p Candidate> {
    let preferred: [Role; 2] = match pitch {
        PitchContext::Bowling => [Role::Bowler, Role::Allrounder],
        PitchContext::Batting | PitchContext::Balanced => [Role::Batter, Role::Allrounder],
    };

    engine
        .bench_ranked()
        .find(|c| preferred.contains(&c.role))
        .or_else(|| engine.bench_ranked().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Eligibility, Nationality, RawRow, Requirement};
    use crate::selection::params::Band;

    fn row(name: &str, nat: Nationality, role: Role, score: f64) -> RawRow {
        RawRow::new(name, nat, role).with_score(score)
    }

    fn build(rows: Vec<RawRow>) -> CandidatePool {
        CandidatePool::build(rows, &Eligibility::any(), Requirement::Score)
            .unwrap()
            .0
    }

    fn small_params() -> LineupParams {
        LineupParams {
            size: 4,
            overseas_cap: 1,
            bowler_band: Band::new(1, 2),
            allrounder_rule: crate::selection::params::AllrounderRule { min_allrounders: 1 },
            iteration_cap: 10,
        }
    }

    #[test]
    fn test_seed_puts_keeper_first_even_if_weak() {
        let pool = build(vec![
            row("a", Nationality::Domestic, Role::Batter, 9.0),
            row("b", Nationality::Domestic, Role::Bowler, 8.0),
            row("c", Nationality::Domestic, Role::Allrounder, 7.0),
            row("d", Nationality::Domestic, Role::Batter, 6.0),
            row("wk", Nationality::Domestic, Role::Batter, 1.0).keeper(),
        ]);
        let sel = ConstraintRepairSelector::new(small_params())
            .unwrap()
            .select(&pool, PitchContext::Balanced)
            .unwrap();

        assert_eq!(sel.events[0], SelectionEvent::Added { id: CandidateId(4), phase: Phase::Seed });
        assert!(sel.roster.names().contains(&"wk"));
        assert_eq!(sel.impact.as_ref().map(|c| c.name.as_str()), Some("d"));
        assert!(sel.is_complete());
    }

    #[test]
    fn test_brings_in_bowler_when_below_band() {
        let pool = build(vec![
            row("bat1", Nationality::Domestic, Role::Batter, 9.0),
            row("bat2", Nationality::Domestic, Role::Batter, 8.0),
            row("ar1", Nationality::Domestic, Role::Allrounder, 7.0),
            row("bat3", Nationality::Domestic, Role::Batter, 6.0),
            row("bowl1", Nationality::Domestic, Role::Bowler, 2.0),
        ]);
        let sel = ConstraintRepairSelector::new(small_params())
            .unwrap()
            .select(&pool, PitchContext::Balanced)
            .unwrap();

        assert_eq!(sel.roster.counts().bowlers, 1);
        assert!(!sel.roster.names().contains(&"bat3"));
        assert_eq!(sel.events_in(Phase::BowlerBand).count(), 1);
    }

    #[test]
    fn test_drops_excess_bowlers() {
        let pool = build(vec![
            row("bowl1", Nationality::Domestic, Role::Bowler, 9.0),
            row("bowl2", Nationality::Domestic, Role::Bowler, 8.0),
            row("bowl3", Nationality::Domestic, Role::Bowler, 7.0),
            row("ar1", Nationality::Domestic, Role::Allrounder, 6.0),
            row("bat1", Nationality::Domestic, Role::Batter, 1.0),
        ]);
        let sel = ConstraintRepairSelector::new(small_params())
            .unwrap()
            .select(&pool, PitchContext::Bowling)
            .unwrap();

        assert_eq!(sel.roster.counts().bowlers, 2);
        assert!(sel.roster.names().contains(&"bat1"));
        assert_eq!(sel.impact.as_ref().map(|c| c.name.as_str()), Some("bowl3"));
    }

    #[test]
    fn test_bowler_swap_respects_overseas_cap() {
        let pool = build(vec![
            row("o_bat", Nationality::Overseas, Role::Batter, 9.0),
            row("d_bat1", Nationality::Domestic, Role::Batter, 8.0),
            row("d_bat2", Nationality::Domestic, Role::Batter, 7.0),
            row("d_ar", Nationality::Domestic, Role::Allrounder, 6.0),
            row("o_bowl", Nationality::Overseas, Role::Bowler, 5.0),
        ]);
        let sel = ConstraintRepairSelector::new(small_params())
            .unwrap()
            .select(&pool, PitchContext::Balanced)
            .unwrap();

        // Only swapping out the overseas batter keeps the cap.
        assert!(sel.roster.names().contains(&"o_bowl"));
        assert!(!sel.roster.names().contains(&"o_bat"));
        assert_eq!(sel.roster.counts().overseas, 1);
    }

    #[test]
    fn test_empty_pool() {
        let pool = build(Vec::new());
        let sel = ConstraintRepairSelector::new(LineupParams::default())
            .unwrap()
            .select(&pool, PitchContext::Batting)
            .unwrap();
        assert!(sel.roster.is_empty());
        assert!(sel.impact.is_none());
        assert!(!sel.unmet.contains(&UnmetConstraint::KeeperMissing));
    }

    #[test]
    fn test_impact_falls_back_to_any_role() {
        let pool = build(vec![
            row("a", Nationality::Domestic, Role::Batter, 9.0),
            row("b", Nationality::Domestic, Role::Bowler, 8.0),
            row("c", Nationality::Domestic, Role::Allrounder, 7.0),
            row("d", Nationality::Domestic, Role::Batter, 6.0),
            row("e", Nationality::Domestic, Role::Batter, 5.0),
        ]);
        let sel = ConstraintRepairSelector::new(small_params())
            .unwrap()
            .select(&pool, PitchContext::Bowling)
            .unwrap();
        assert_eq!(sel.impact.as_ref().map(|c| c.name.as_str()), Some("e"));
    }

    fn keeperless_batters(keeper: RawRow) -> CandidatePool {
        build(vec![
            row("a", Nationality::Domestic, Role::Batter, 9.0),
            row("b", Nationality::Domestic, Role::Bowler, 8.0),
            row("c", Nationality::Domestic, Role::Allrounder, 7.0),
            row("d", Nationality::Domestic, Role::Batter, 6.0),
            keeper,
        ])
    }

    #[test]
    fn test_overseas_keeper_blocked_by_zero_cap() {
        let pool = keeperless_batters(row("wk", Nationality::Overseas, Role::Batter, 1.0).keeper());
        let params = LineupParams {
            overseas_cap: 0,
            ..small_params()
        };
        let sel = ConstraintRepairSelector::new(params)
            .unwrap()
            .select(&pool, PitchContext::Balanced)
            .unwrap();

        assert_eq!(sel.roster.names(), vec!["a", "b", "c", "d"]);
        assert_eq!(sel.roster.counts().keepers, 0);
        assert_eq!(sel.roster.counts().overseas, 0);
        assert_eq!(sel.unmet, vec![UnmetConstraint::KeeperMissing]);
        assert_eq!(sel.events_in(Phase::KeeperGuarantee).count(), 0);
    }

    #[test]
    fn test_keeper_guarantee_swaps_out_weakest() {
        let pool = keeperless_batters(row("wk", Nationality::Domestic, Role::Batter, 1.0).keeper());
        let selector = ConstraintRepairSelector::new(small_params()).unwrap();
        let seeded = vec![CandidateId(0), CandidateId(1), CandidateId(2), CandidateId(3)];
        let mut engine = SwapEngine::new(&pool, seeded).unwrap();
        let mut events = Vec::new();

        selector.guarantee_keeper(&pool, &mut engine, &mut events).unwrap();

        assert_eq!(
            events,
            vec![SelectionEvent::Swapped {
                out: CandidateId(3),
                incoming: CandidateId(4),
                phase: Phase::KeeperGuarantee,
            }]
        );
        assert!(engine.on_roster(CandidateId(4)));
        assert!(engine.on_bench(CandidateId(3)));
        assert_eq!(engine.counts().keepers, 1);
        assert_eq!(engine.len(), 4);

        // Already has a keeper: nothing more to do.
        selector.guarantee_keeper(&pool, &mut engine, &mut events).unwrap();
        assert_eq!(events.len(), 1);
    }
}
