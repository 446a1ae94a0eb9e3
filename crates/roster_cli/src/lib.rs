//! roster_cli
//!
//! CSV → CandidatePool → selector → JSON report.
//! 모든 파일 I/O는 이 크레이트에서만 수행한다.

pub mod filter;
pub mod input;

pub use filter::{apply_squad_filter, merge_season_override, rows_for_team};
pub use input::{load_player_stats, load_scored_rows, ParseStats};

use anyhow::{Context, Result};
use roster_core::scoring::{score_rows, VenueLookup};
use roster_core::{
    BudgetedGreedySelector, Candidate, CandidatePool, ConstraintRepairSelector, Eligibility,
    MatchContext, PoolReport, RawRow, Requirement, RosterCounts, RuleBasedScorer,
    ScoringProvider, Selection, SelectionConfig, SnapshotStore, TossDecision, UnmetConstraint,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct SquadRequest {
    pub csv: PathBuf,
    pub config: Option<PathBuf>,
    pub purse: Option<f64>,
    pub season: Option<u16>,
}

#[derive(Debug, Clone, Default)]
pub struct LineupRequest {
    /// Pre-scored rows
    pub csv: Option<PathBuf>,
    /// Raw career stats, scored here for the venue and toss
    pub stats: Option<PathBuf>,
    /// Current-season stats overriding `stats`
    pub current_season: Option<PathBuf>,
    pub team: String,
    pub venue: Option<String>,
    pub toss: TossDecision,
    pub squad_csv: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// Directory holding a trained model snapshot
    pub model_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub players: usize,
    pub counts: RosterCounts,
    pub total_cost: f64,
    pub remaining_budget: Option<f64>,
}

/// Printed as JSON on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport {
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<VenueLookup>,
    pub roster: Vec<Candidate>,
    pub summary: Summary,
    pub unmet: Vec<UnmetConstraint>,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<Candidate>,
    pub warnings: Vec<String>,
    pub input: ParseStats,
    pub pool: PoolReport,
}

impl SelectionReport {
    fn new(mode: &'static str, selection: Selection, input: ParseStats, pool: PoolReport) -> Self {
        let complete = selection.is_complete();
        let Selection {
            roster,
            impact,
            unmet,
            ..
        } = selection;

        Self {
            mode,
            team: None,
            venue: None,
            summary: Summary {
                players: roster.len(),
                counts: roster.counts(),
                total_cost: roster.total_cost(),
                remaining_budget: roster.remaining_budget(),
            },
            roster: roster.players().to_vec(),
            complete,
            unmet,
            impact,
            warnings: Vec::new(),
            input,
            pool,
        }
    }
}

fn load_config(path: Option<&Path>, fallback: fn() -> SelectionConfig) -> Result<SelectionConfig> {
    match path {
        Some(p) => SelectionConfig::load(p)
            .with_context(|| format!("Failed to load config: {}", p.display())),
        None => Ok(fallback()),
    }
}

/// Budgeted squad from a scored + priced CSV.
pub fn run_squad(req: &SquadRequest) -> Result<SelectionReport> {
    let mut config = load_config(req.config.as_deref(), SelectionConfig::auction)?;
    if let Some(purse) = req.purse {
        config.squad.purse = purse;
    }
    if let Some(season) = req.season {
        config.eligibility.season = Some(season);
    }

    let (mut rows, stats) = load_scored_rows(&req.csv)?;
    mark_listed_keepers(&config, &mut rows);
    let (pool, pool_report) =
        CandidatePool::build(rows, &config.eligibility, Requirement::ScoreAndCost)
            .context("Failed to build candidate pool")?;

    let selection = BudgetedGreedySelector::new(config.squad)
        .context("Invalid squad parameters")?
        .select(&pool)
        .context("Squad selection failed")?;

    Ok(SelectionReport::new("squad", selection, stats, pool_report))
}

/// Starting line-up for one team.
pub fn run_lineup(req: &LineupRequest) -> Result<SelectionReport> {
    let config = load_config(req.config.as_deref(), SelectionConfig::t20_lineup)?;
    let venue = config.venue_book().lookup(req.venue.as_deref().unwrap_or_default());
    let ctx = MatchContext::new(venue.pitch, req.toss);
    let mut warnings = Vec::new();

    let (mut rows, stats) = match (&req.csv, &req.stats) {
        (Some(csv), _) => load_scored_rows(csv)?,
        (None, Some(stats_path)) => {
            let (players, parse) = load_player_stats(stats_path)?;
            let mut players = match &req.current_season {
                Some(current) => {
                    let merged = merge_season_override(players, current);
                    warnings.extend(merged.reason().map(str::to_string));
                    merged.into_value()
                }
                None => players,
            };
            for p in &mut players {
                p.keeper |= config.is_listed_keeper(&p.name);
            }
            let scorer = pick_scorer(req.model_dir.as_deref(), &mut warnings);
            (score_rows(scorer.as_ref(), &players, &ctx), parse)
        }
        (None, None) => anyhow::bail!("either a scored CSV or a stats CSV is required"),
    };

    mark_listed_keepers(&config, &mut rows);
    let mut rows = rows_for_team(rows, &req.team);
    if let Some(squad_csv) = &req.squad_csv {
        let filtered = apply_squad_filter(rows, squad_csv, &req.team);
        warnings.extend(filtered.reason().map(str::to_string));
        rows = filtered.into_value();
    }
    if rows.is_empty() {
        log::warn!("no players found for team {}", req.team);
        warnings.push(format!("no players found for team {}", req.team));
    }

    let eligibility = Eligibility {
        team: Some(req.team.clone()),
        ..config.eligibility.clone()
    };
    let (pool, pool_report) = CandidatePool::build(rows, &eligibility, Requirement::Score)
        .context("Failed to build candidate pool")?;

    let selection = ConstraintRepairSelector::new(config.lineup)
        .context("Invalid line-up parameters")?
        .select(&pool, ctx.pitch)
        .context("Line-up selection failed")?;

    let mut report = SelectionReport::new("lineup", selection, stats, pool_report);
    report.team = Some(req.team.clone());
    report.venue = Some(venue);
    report.warnings = warnings;
    Ok(report)
}

/// Keeper flag from the column, or from the configured keeper list.
fn mark_listed_keepers(config: &SelectionConfig, rows: &mut [RawRow]) {
    for row in rows.iter_mut() {
        row.keeper |= config.is_listed_keeper(&row.name);
    }
}

/// Trained scorer from the snapshot if one is usable, rule-based otherwise.
fn pick_scorer(model_dir: Option<&Path>, warnings: &mut Vec<String>) -> Box<dyn ScoringProvider> {
    let Some(dir) = model_dir else {
        return Box::new(RuleBasedScorer::default());
    };

    let snapshot = match SnapshotStore::new(dir).load() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::warn!("model snapshot unavailable: {}", e);
            warnings.push(format!("model snapshot unavailable ({}); using rule-based scoring", e));
            return Box::new(RuleBasedScorer::default());
        }
    };

    let trained = snapshot.format_trained_at();
    match snapshot.scorer {
        Some(scorer) => {
            log::info!("using trained scorer from {} (trained {})", dir.display(), trained);
            Box::new(scorer)
        }
        None => {
            warnings.push(format!(
                "snapshot in {} has no scorer; using rule-based scoring",
                dir.display()
            ));
            Box::new(RuleBasedScorer::default())
        }
    }
}
