//! CandidatePool: validated, immutable snapshot of scored candidates
//!
//! Rows are admitted into an arena in insertion order; `CandidateId` is the
//! arena index. The descending-score ranking is computed once at build time
//! with ties broken by arena index, so every selector over the same pool
//! walks candidates in the same order.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::ops::Index;

use super::types::{AuctionOutcome, Candidate, CandidateId, CandidateKey, RawRow};
use crate::error::{Result, SelectionError};

/// Numeric fields a row must carry to be admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    /// Line-up selection: score only.
    Score,
    /// Budgeted selection: score and cost.
    ScoreAndCost,
}

/// Row-level eligibility predicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Eligibility {
    /// Only rows from this season (None = any season).
    pub season: Option<u16>,
    /// Only rows for this team code, case-insensitive (None = any team).
    pub team: Option<String>,
    /// Only rows predicted SOLD.
    pub require_sold_prediction: bool,
}

impl Eligibility {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn for_season(season: u16) -> Self {
        Self {
            season: Some(season),
            team: None,
            require_sold_prediction: true,
        }
    }

    pub fn for_team(team: impl Into<String>) -> Self {
        Self {
            season: None,
            team: Some(team.into()),
            require_sold_prediction: false,
        }
    }

    pub fn admits(&self, row: &RawRow) -> bool {
        if let Some(season) = self.season {
            if row.season != Some(season) {
                return false;
            }
        }
        if let Some(team) = &self.team {
            match &row.team {
                Some(row_team) if row_team.trim().eq_ignore_ascii_case(team.trim()) => {}
                _ => return false,
            }
        }
        if self.require_sold_prediction && row.outcome != AuctionOutcome::Sold {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionReason {
    Ineligible,
    MissingScore,
    MissingCost,
    NegativeCost,
}

/// A row that was left out of the pool, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    pub key: CandidateKey,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolReport {
    pub considered: usize,
    pub admitted: usize,
    pub exclusions: Vec<Exclusion>,
}

impl PoolReport {
    pub fn excluded_for(&self, reason: ExclusionReason) -> usize {
        self.exclusions.iter().filter(|e| e.reason == reason).count()
    }
}

#[derive(Debug, Clone)]
pub struct CandidatePool {
    candidates: Vec<Candidate>,
    index: FxHashMap<CandidateKey, CandidateId>,
    ranked: Vec<CandidateId>,
    requirement: Requirement,
}

impl CandidatePool {
    /// Build a pool from raw rows.
    ///
    /// Individual rows without a usable score (or cost, for
    /// `Requirement::ScoreAndCost`) are excluded and listed in the report.
    /// Fails with `InvalidInput` when no row carries the required field at
    /// all, or when two admitted rows share a `(name, season)` identity.
    pub fn build<I>(
        rows: I,
        eligibility: &Eligibility,
        requirement: Requirement,
    ) -> Result<(Self, PoolReport)>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let rows: Vec<RawRow> = rows.into_iter().collect();

        if !rows.is_empty() {
            if rows.iter().all(|r| r.score.is_none()) {
                return Err(SelectionError::invalid("no row carries a score"));
            }
            if requirement == Requirement::ScoreAndCost && rows.iter().all(|r| r.cost.is_none()) {
                return Err(SelectionError::invalid(
                    "budgeted selection requires costs, but no row carries one",
                ));
            }
        }

        let mut report = PoolReport {
            considered: rows.len(),
            ..PoolReport::default()
        };
        let mut candidates: Vec<Candidate> = Vec::with_capacity(rows.len());
        let mut index: FxHashMap<CandidateKey, CandidateId> = FxHashMap::default();

        for row in rows {
            let key = row.key();

            if !eligibility.admits(&row) {
                report.exclusions.push(Exclusion {
                    key,
                    reason: ExclusionReason::Ineligible,
                });
                continue;
            }

            let score = match row.score {
                Some(s) if s.is_finite() => s,
                _ => {
                    report.exclusions.push(Exclusion {
                        key,
                        reason: ExclusionReason::MissingScore,
                    });
                    continue;
                }
            };

            let cost = match (requirement, row.cost) {
                (Requirement::Score, cost) => cost.filter(|c| c.is_finite() && *c >= 0.0),
                (Requirement::ScoreAndCost, Some(c)) if c.is_finite() && c >= 0.0 => Some(c),
                (Requirement::ScoreAndCost, Some(c)) if c.is_finite() => {
                    report.exclusions.push(Exclusion {
                        key,
                        reason: ExclusionReason::NegativeCost,
                    });
                    continue;
                }
                (Requirement::ScoreAndCost, _) => {
                    report.exclusions.push(Exclusion {
                        key,
                        reason: ExclusionReason::MissingCost,
                    });
                    continue;
                }
            };

            if index.contains_key(&key) {
                return Err(SelectionError::invalid(format!(
                    "duplicate candidate identity: {}",
                    key
                )));
            }

            let id = CandidateId(candidates.len() as u32);
            index.insert(key, id);
            candidates.push(Candidate {
                id,
                name: row.name,
                season: row.season,
                team: row.team,
                nationality: row.nationality,
                role: row.role,
                keeper: row.keeper,
                score,
                cost,
            });
        }

        report.admitted = candidates.len();

        let mut ranked: Vec<CandidateId> = candidates.iter().map(|c| c.id).collect();
        // Stable sort: equal scores keep arena (insertion) order.
        ranked.sort_by(|a, b| {
            candidates[b.index()]
                .score
                .total_cmp(&candidates[a.index()].score)
        });

        log::debug!(
            "candidate pool built: {} considered, {} admitted, {} excluded",
            report.considered,
            report.admitted,
            report.exclusions.len()
        );

        Ok((
            Self {
                candidates,
                index,
                ranked,
                requirement,
            },
            report,
        ))
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.get(id.index())
    }

    pub fn find(&self, key: &CandidateKey) -> Option<CandidateId> {
        self.index.get(key).copied()
    }

    /// Candidates in arena (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    /// Ids by descending score, ties by insertion order.
    pub fn ranked(&self) -> &[CandidateId] {
        &self.ranked
    }

    /// Ranked candidates matching `predicate`.
    pub fn ranked_where<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Candidate> + 'a
    where
        P: Fn(&Candidate) -> bool + 'a,
    {
        self.ranked
            .iter()
            .map(move |id| &self.candidates[id.index()])
            .filter(move |c| predicate(*c))
    }

    /// Filtered view in insertion order.
    pub fn filter<P>(&self, predicate: P) -> Vec<&Candidate>
    where
        P: Fn(&Candidate) -> bool,
    {
        self.candidates.iter().filter(|c| predicate(*c)).collect()
    }

    pub fn has_keeper(&self) -> bool {
        self.candidates.iter().any(|c| c.keeper)
    }

    /// Highest-ranked keeper, if any.
    pub fn best_keeper(&self) -> Option<&Candidate> {
        self.ranked_where(|c| c.keeper).next()
    }
}

impl Index<CandidateId> for CandidatePool {
    type Output = Candidate;

    fn index(&self, id: CandidateId) -> &Candidate {
        &self.candidates[id.index()]
    }
}
