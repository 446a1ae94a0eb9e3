//! Scenario tests for both selectors

use super::*;
use crate::candidate::{CandidateId, Eligibility, Nationality, RawRow, Requirement, Role};
use std::collections::HashSet;

fn priced(name: &str, nat: Nationality, role: Role, score: f64, cost: f64) -> RawRow {
    RawRow::new(name, nat, role)
        .with_score(score)
        .with_cost(cost)
        .with_season(2025)
}

fn scored(name: &str, nat: Nationality, role: Role, score: f64) -> RawRow {
    RawRow::new(name, nat, role).with_score(score)
}

fn auction_pool(overseas_cost: f64) -> CandidatePool {
    let mut rows = Vec::new();
    for i in 0..5 {
        rows.push(priced(
            &format!("overseas_{}", i),
            Nationality::Overseas,
            Role::ALL[i % 3],
            50.0 - i as f64,
            overseas_cost,
        ));
    }
    let domestic_roles = [
        Role::Batter,
        Role::Batter,
        Role::Batter,
        Role::Batter,
        Role::Bowler,
        Role::Bowler,
        Role::Bowler,
        Role::Allrounder,
        Role::Allrounder,
        Role::Allrounder,
    ];
    for (i, role) in domestic_roles.iter().enumerate() {
        rows.push(priced(
            &format!("domestic_{}", i),
            Nationality::Domestic,
            *role,
            80.0 - i as f64,
            5.0,
        ));
    }
    CandidatePool::build(rows, &Eligibility::for_season(2025), Requirement::ScoreAndCost)
        .unwrap()
        .0
}

fn default_roles() -> Vec<RoleQuota> {
    vec![
        RoleQuota::new(Role::Batter, 3),
        RoleQuota::new(Role::Bowler, 3),
        RoleQuota::new(Role::Allrounder, 2),
    ]
}

fn assert_no_duplicates(selection: &Selection) {
    let ids: HashSet<CandidateId> = selection.roster.iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), selection.roster.len(), "duplicate in roster");
}

#[test]
fn scenario_a_overseas_floor_filled_before_roles() {
    let pool = auction_pool(10.0);
    let sel = select_squad(&pool, 100.0, 9, 3, 1, default_roles()).unwrap();

    assert_eq!(sel.roster.len(), 9);
    assert!(sel.roster.counts().overseas >= 1);
    assert!(sel.roster.total_cost() <= 100.0);
    assert_no_duplicates(&sel);

    let first = &sel.events[0];
    assert_eq!(first.phase(), Phase::OverseasFloor);
    if let SelectionEvent::Added { id, .. } = first {
        assert!(pool[*id].is_overseas());
    }

    let first_role_fill = sel
        .events
        .iter()
        .position(|e| e.phase() == Phase::RoleFill)
        .unwrap();
    let last_overseas = sel
        .events
        .iter()
        .rposition(|e| e.phase() == Phase::OverseasFloor)
        .unwrap();
    assert!(last_overseas < first_role_fill);
    assert!(sel.is_complete());
}

#[test]
fn scenario_b_allrounder_repair_at_bowler_floor() {
    let mut rows = vec![scored("wk", Nationality::Domestic, Role::Batter, 50.0).keeper()];
    for i in 0..4 {
        rows.push(scored(&format!("bowl_{}", i), Nationality::Domestic, Role::Bowler, 90.0 - i as f64));
    }
    rows.push(scored("ar_0", Nationality::Domestic, Role::Allrounder, 86.0));
    for i in 0..5 {
        rows.push(scored(&format!("bat_{}", i), Nationality::Domestic, Role::Batter, 85.0 - i as f64));
    }
    rows.push(scored("ar_bench", Nationality::Overseas, Role::Allrounder, 40.0));
    rows.push(scored("bat_bench", Nationality::Domestic, Role::Batter, 30.0));

    let (pool, _) = CandidatePool::build(rows, &Eligibility::any(), Requirement::Score).unwrap();
    let sel = select_starting_lineup(
        &pool,
        4,
        Band::new(4, 6),
        AllrounderRule { min_allrounders: 2 },
        PitchContext::Balanced,
    )
    .unwrap();

    let counts = sel.roster.counts();
    assert_eq!(sel.roster.len(), 11);
    assert!(counts.allrounders >= 2);
    assert_eq!(counts.bowlers, 4);
    assert_eq!(counts.keepers, 1);
    assert!(sel.roster.names().contains(&"ar_bench"));
    assert!(!sel.roster.names().contains(&"bat_4"));
    assert_eq!(sel.events_in(Phase::AllrounderMinimum).count(), 1);
    assert_eq!(sel.impact.as_ref().map(|c| c.name.as_str()), Some("bat_4"));
    assert!(sel.is_complete());
}

#[test]
fn scenario_c_no_keepers_is_a_noop() {
    let mut rows = Vec::new();
    for i in 0..6 {
        rows.push(scored(&format!("bowl_{}", i), Nationality::Domestic, Role::Bowler, 60.0 - i as f64));
    }
    for i in 0..7 {
        rows.push(scored(&format!("bat_{}", i), Nationality::Domestic, Role::Batter, 50.0 - i as f64));
    }
    let (pool, _) = CandidatePool::build(rows, &Eligibility::any(), Requirement::Score).unwrap();

    let sel = ConstraintRepairSelector::new(LineupParams::default())
        .unwrap()
        .select(&pool, PitchContext::Batting)
        .unwrap();

    assert_eq!(sel.roster.counts().keepers, 0);
    assert_eq!(sel.events_in(Phase::KeeperGuarantee).count(), 0);
    assert!(!sel.unmet.contains(&UnmetConstraint::KeeperMissing));
}

#[test]
fn scenario_d_zero_overseas_cap() {
    let mut rows = Vec::new();
    for i in 0..5 {
        rows.push(scored(&format!("star_{}", i), Nationality::Overseas, Role::ALL[i % 3], 100.0 + i as f64));
    }
    rows.push(scored("o_keeper", Nationality::Overseas, Role::Batter, 99.0).keeper());
    rows.push(scored("d_keeper", Nationality::Domestic, Role::Batter, 20.0).keeper());
    for i in 0..5 {
        rows.push(scored(&format!("bowl_{}", i), Nationality::Domestic, Role::Bowler, 60.0 - i as f64));
    }
    for i in 0..4 {
        rows.push(scored(&format!("ar_{}", i), Nationality::Domestic, Role::Allrounder, 55.0 - i as f64));
    }
    for i in 0..4 {
        rows.push(scored(&format!("bat_{}", i), Nationality::Domestic, Role::Batter, 50.0 - i as f64));
    }
    let (pool, _) = CandidatePool::build(rows, &Eligibility::any(), Requirement::Score).unwrap();

    let sel = select_starting_lineup(
        &pool,
        0,
        Band::new(4, 6),
        AllrounderRule { min_allrounders: 2 },
        PitchContext::Bowling,
    )
    .unwrap();

    assert_eq!(sel.roster.len(), 11);
    assert!(sel.roster.iter().all(|c| c.nationality == Nationality::Domestic));
    assert!(sel.roster.names().contains(&"d_keeper"));
    assert_no_duplicates(&sel);
}

#[test]
fn scenario_e_unaffordable_overseas_is_soft() {
    let pool = auction_pool(500.0);
    let sel = select_squad(&pool, 100.0, 9, 3, 1, default_roles()).unwrap();

    assert_eq!(sel.roster.counts().overseas, 0);
    assert_eq!(sel.roster.len(), 9);
    assert!(sel.unmet.contains(&UnmetConstraint::OverseasFloor {
        required: 1,
        achieved: 0
    }));
    assert_eq!(sel.events_in(Phase::OverseasFloor).count(), 0);
}

#[test]
fn test_selection_is_deterministic() {
    let pool = auction_pool(10.0);
    let a = select_squad(&pool, 60.0, 9, 3, 1, default_roles()).unwrap();
    let b = select_squad(&pool, 60.0, 9, 3, 1, default_roles()).unwrap();
    assert_eq!(a, b);

    let rows: Vec<RawRow> = (0..20)
        .map(|i| {
            let role = Role::ALL[i % 3];
            let nat = if i % 4 == 0 { Nationality::Overseas } else { Nationality::Domestic };
            // Many ties on purpose.
            scored(&format!("p{}", i), nat, role, (i % 5) as f64)
        })
        .collect();
    let (pool, _) = CandidatePool::build(rows, &Eligibility::any(), Requirement::Score).unwrap();
    let selector = ConstraintRepairSelector::new(LineupParams::default()).unwrap();
    let first = selector.select(&pool, PitchContext::Balanced).unwrap();
    let second = selector.select(&pool, PitchContext::Balanced).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_contradictory_parameters_fail_fast() {
    let pool = auction_pool(10.0);
    assert!(select_squad(&pool, 100.0, 9, 1, 3, default_roles()).is_err());
    assert!(select_squad(&pool, 100.0, 0, 0, 0, default_roles()).is_err());
    assert!(select_starting_lineup(
        &pool,
        4,
        Band::new(6, 4),
        AllrounderRule { min_allrounders: 2 },
        PitchContext::Balanced
    )
    .is_err());
}

#[cfg(all(test, feature = "proptest"))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn rows_strategy() -> impl Strategy<Value = Vec<(bool, usize, bool, u8, u8)>> {
        prop::collection::vec((any::<bool>(), 0usize..3, any::<bool>(), 0u8..100, 0u8..30), 0..40)
    }

    fn to_rows(shape: &[(bool, usize, bool, u8, u8)]) -> Vec<RawRow> {
        shape.iter()
            .enumerate()
            .map(|(i, (overseas, role, keeper, score, cost))| {
                let nat = if *overseas { Nationality::Overseas } else { Nationality::Domestic };
                let mut row = priced(&format!("p{}", i), nat, Role::ALL[*role], *score as f64, *cost as f64);
                row.keeper = *keeper;
                row
            })
            .collect()
    }

    proptest! {
        /// Property: budgeted rosters respect size, purse, overseas ceiling and uniqueness
        #[test]
        fn prop_budgeted_bounds(
            shape in rows_strategy(),
            purse in 0u16..300,
            size in 1usize..15,
            max_o in 0usize..5,
        ) {
            let max_o = max_o.min(size);
            let (pool, _) = CandidatePool::build(to_rows(&shape), &Eligibility::any(), Requirement::ScoreAndCost)
                .unwrap();
            let sel = select_squad(&pool, purse as f64, size, max_o, max_o.min(1), default_roles()).unwrap();

            prop_assert!(sel.roster.len() <= size);
            prop_assert!(sel.roster.total_cost() <= purse as f64);
            prop_assert!(sel.roster.counts().overseas <= max_o);
            let ids: HashSet<CandidateId> = sel.roster.iter().map(|c| c.id).collect();
            prop_assert_eq!(ids.len(), sel.roster.len());

            let again = select_squad(&pool, purse as f64, size, max_o, max_o.min(1), default_roles()).unwrap();
            prop_assert_eq!(sel, again);
        }

        /// Property: line-ups respect size, overseas cap and uniqueness
        #[test]
        fn prop_lineup_bounds(shape in rows_strategy(), cap in 0usize..5) {
            let (pool, _) = CandidatePool::build(to_rows(&shape), &Eligibility::any(), Requirement::Score)
                .unwrap();
            let sel = select_starting_lineup(
                &pool,
                cap,
                Band::new(4, 6),
                AllrounderRule { min_allrounders: 2 },
                PitchContext::Balanced,
            )
            .unwrap();

            prop_assert!(sel.roster.len() <= 11);
            prop_assert!(sel.roster.counts().overseas <= cap);
            let ids: HashSet<CandidateId> = sel.roster.iter().map(|c| c.id).collect();
            prop_assert_eq!(ids.len(), sel.roster.len());
            if let Some(impact) = &sel.impact {
                prop_assert!(!ids.contains(&impact.id));
            }
        }
    }
}
