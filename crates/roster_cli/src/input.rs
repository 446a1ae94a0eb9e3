//! CSV loaders
//!
//! Columns are found by header name (case-insensitive, a few accepted
//! spellings each), so column order does not matter. Rows that fail to parse
//! are counted and skipped; a missing required column fails the whole file.

use anyhow::{bail, Context, Result};
use csv::StringRecord;
use roster_core::{AuctionOutcome, Nationality, PlayerStats, RawRow, Role};
use serde::Serialize;
use std::path::Path;

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
}

/// Header name → column index
pub(crate) struct Columns {
    headers: Vec<String>,
}

impl Columns {
    pub(crate) fn new(headers: &StringRecord) -> Self {
        Self {
            headers: headers
                .iter()
                .map(|h| h.trim().trim_start_matches('\u{feff}').to_ascii_lowercase())
                .collect(),
        }
    }

    /// First header matching any of `names`.
    pub(crate) fn find(&self, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|n| self.headers.iter().position(|h| h == &n.to_ascii_lowercase()))
    }

    fn require(&self, names: &[&str], path: &Path) -> Result<usize> {
        match self.find(names) {
            Some(i) => Ok(i),
            None => bail!("{} has no '{}' column", path.display(), names[0]),
        }
    }
}

/// Trimmed cell, `None` when blank or absent.
pub(crate) fn cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn opt_f64(record: &StringRecord, idx: Option<usize>, name: &str) -> Result<Option<f64>, String> {
    match cell(record, idx) {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("nan") => Ok(None),
        Some(v) => v
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("invalid {} value '{}'", name, v)),
    }
}

fn opt_season(record: &StringRecord, idx: Option<usize>) -> Result<Option<u16>, String> {
    match cell(record, idx) {
        None => Ok(None),
        Some(v) => v
            .parse::<u16>()
            .map(Some)
            .map_err(|_| format!("invalid season '{}'", v)),
    }
}

fn flag(record: &StringRecord, idx: Option<usize>) -> bool {
    matches!(
        cell(record, idx).map(|v| v.to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "y")
    )
}

fn outcome(record: &StringRecord, idx: Option<usize>) -> Result<AuctionOutcome, String> {
    match cell(record, idx).map(|v| v.to_ascii_uppercase()).as_deref() {
        None | Some("SOLD") => Ok(AuctionOutcome::Sold),
        Some("UNSOLD") => Ok(AuctionOutcome::Unsold),
        Some(other) => Err(format!("invalid outcome '{}'", other)),
    }
}

fn required<'r>(record: &'r StringRecord, idx: usize, name: &str) -> Result<&'r str, String> {
    cell(record, Some(idx)).ok_or_else(|| format!("missing {}", name))
}

const NAME: &[&str] = &["name", "player", "player_name"];
const SEASON: &[&str] = &["season", "year"];
const TEAM: &[&str] = &["team"];
const NATIONALITY: &[&str] = &["nationality", "country_bucket", "country"];
const ROLE: &[&str] = &["role", "paying_role"];
const KEEPER: &[&str] = &["keeper", "is_wicket_keeper", "is_keeper"];

/// Load pre-scored candidate rows.
///
/// Columns: `name,season,team,nationality,role,keeper,score,cost,outcome`;
/// only name, nationality and role are required.
pub fn load_scored_rows(path: &Path) -> Result<(Vec<RawRow>, ParseStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .clone();
    let cols = Columns::new(&headers);
    let name_i = cols.require(NAME, path)?;
    let nat_i = cols.require(NATIONALITY, path)?;
    let role_i = cols.require(ROLE, path)?;
    let season_i = cols.find(SEASON);
    let team_i = cols.find(TEAM);
    let keeper_i = cols.find(KEEPER);
    let score_i = cols.find(&["score", "final_score"]);
    let cost_i = cols.find(&["cost", "predicted_price", "price"]);
    let outcome_i = cols.find(&["outcome", "predicted_auction_outcome"]);

    let mut rows = Vec::new();
    let mut stats = ParseStats::default();

    for result in reader.records() {
        stats.total_rows += 1;
        let line = stats.total_rows + 1;

        let parsed = result
            .map_err(|e| e.to_string())
            .and_then(|record| -> Result<RawRow, String> {
                let name = required(&record, name_i, "name")?;
                let nationality: Nationality = required(&record, nat_i, "nationality")?
                    .parse()
                    .map_err(|e: roster_core::SelectionError| e.to_string())?;
                let role: Role = required(&record, role_i, "role")?
                    .parse()
                    .map_err(|e: roster_core::SelectionError| e.to_string())?;

                Ok(RawRow {
                    name: name.to_string(),
                    season: opt_season(&record, season_i)?,
                    team: cell(&record, team_i).map(str::to_string),
                    nationality,
                    role,
                    keeper: flag(&record, keeper_i),
                    score: opt_f64(&record, score_i, "score")?,
                    cost: opt_f64(&record, cost_i, "cost")?,
                    outcome: outcome(&record, outcome_i)?,
                })
            });

        match parsed {
            Ok(row) => {
                stats.parsed += 1;
                rows.push(row);
            }
            Err(reason) => {
                stats.failed += 1;
                log::warn!("{}: line {} skipped: {}", path.display(), line, reason);
            }
        }
    }

    log::info!(
        "loaded {} rows from {} ({} failed)",
        stats.parsed,
        path.display(),
        stats.failed
    );
    Ok((rows, stats))
}

/// `IND`/`Indian`/`Domestic` are domestic; any other country is overseas.
fn bucket_from_country(value: &str) -> Nationality {
    value.parse().unwrap_or(Nationality::Overseas)
}

/// Load raw career stats for rule-based or model scoring.
///
/// Accepts the upstream stats export headers (`Player`, `COUNTRY`, `TEAM`,
/// `Paying_Role`, `Avg`, `SR`, `Runs`, `Inns`, `B_Wkts`, `B_Inns`, `B_Econ`,
/// `CAPTAINCY EXP`) as well as the snake_case field names. Any other numeric
/// column is kept as an extra feature.
pub fn load_player_stats(path: &Path) -> Result<(Vec<PlayerStats>, ParseStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .clone();
    let cols = Columns::new(&headers);
    let name_i = cols.require(NAME, path)?;
    let nat_i = cols.require(NATIONALITY, path)?;
    let role_i = cols.require(ROLE, path)?;
    let season_i = cols.find(SEASON);
    let team_i = cols.find(TEAM);
    let keeper_i = cols.find(KEEPER);

    let numeric: [(&[&str], &str); 8] = [
        (&["avg", "batting_avg"], "avg"),
        (&["sr", "strike_rate"], "sr"),
        (&["runs"], "runs"),
        (&["inns", "innings"], "inns"),
        (&["b_wkts", "bowling_wickets"], "b_wkts"),
        (&["b_inns", "bowling_innings"], "b_inns"),
        (&["b_econ", "bowling_economy"], "b_econ"),
        (&["captaincy exp", "captaincy_exp"], "captaincy_exp"),
    ];
    let numeric_i: Vec<Option<usize>> = numeric.iter().map(|(names, _)| cols.find(names)).collect();

    let known: Vec<usize> = [Some(name_i), Some(nat_i), Some(role_i), season_i, team_i, keeper_i]
        .into_iter()
        .chain(numeric_i.iter().copied())
        .flatten()
        .collect();
    let extra_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !known.contains(i))
        .map(|(i, h)| (i, h.trim().to_ascii_lowercase()))
        .collect();

    let mut players = Vec::new();
    let mut stats = ParseStats::default();

    for result in reader.records() {
        stats.total_rows += 1;
        let line = stats.total_rows + 1;

        let parsed = result
            .map_err(|e| e.to_string())
            .and_then(|record| -> Result<PlayerStats, String> {
                let name = required(&record, name_i, "name")?;
                let nationality = bucket_from_country(required(&record, nat_i, "nationality")?);
                let role: Role = required(&record, role_i, "role")?
                    .parse()
                    .map_err(|e: roster_core::SelectionError| e.to_string())?;

                let mut p = PlayerStats::new(name, nationality, role);
                p.season = opt_season(&record, season_i)?;
                p.team = cell(&record, team_i).map(str::to_string);
                p.keeper = flag(&record, keeper_i);

                let mut values = [None; 8];
                for (slot, ((_, label), idx)) in values.iter_mut().zip(numeric.iter().zip(&numeric_i)) {
                    *slot = opt_f64(&record, *idx, label)?;
                }
                let [avg, sr, runs, inns, b_wkts, b_inns, b_econ, captaincy] = values;
                p.batting_avg = avg;
                p.strike_rate = sr;
                p.runs = runs;
                p.innings = inns;
                p.bowling_wickets = b_wkts;
                p.bowling_innings = b_inns;
                p.bowling_economy = b_econ;
                p.captaincy_exp = captaincy;

                // Non-numeric extras are ignored.
                for (i, header) in &extra_cols {
                    if let Some(v) = cell(&record, Some(*i)).and_then(|v| v.parse::<f64>().ok()) {
                        p.extra.insert(header.clone(), v);
                    }
                }
                Ok(p)
            });

        match parsed {
            Ok(p) => {
                stats.parsed += 1;
                players.push(p);
            }
            Err(reason) => {
                stats.failed += 1;
                log::warn!("{}: line {} skipped: {}", path.display(), line, reason);
            }
        }
    }

    log::info!(
        "loaded {} player stat rows from {} ({} failed)",
        stats.parsed,
        path.display(),
        stats.failed
    );
    Ok((players, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_scored_rows_with_bad_lines() {
        let f = write_csv(
            "name,season,team,nationality,role,keeper,score,cost,outcome\n\
             Alpha,2025,CSK,Indian,Batting,1,55.5,3.2,SOLD\n\
             Beta,2025,MI,Overseas,All rounder,,41,,\n\
             Gamma,2025,MI,Martian,Bowler,,10,1,SOLD\n\
             Delta,twenty,MI,Overseas,Bowler,,10,1,SOLD\n\
             Eps,2025,RR,Domestic,Bowling,no,abc,1,UNSOLD\n\
             Zeta,2025,RR,Domestic,Bowler,no,9,1,UNSOLD\n",
        );
        let (rows, stats) = load_scored_rows(f.path()).unwrap();

        assert_eq!(stats.total_rows, 6);
        assert_eq!(stats.parsed, 3);
        assert_eq!(stats.failed, 3);

        assert_eq!(rows[0].name, "Alpha");
        assert_eq!(rows[0].nationality, Nationality::Domestic);
        assert_eq!(rows[0].role, Role::Batter);
        assert!(rows[0].keeper);
        assert_eq!(rows[0].cost, Some(3.2));

        assert_eq!(rows[1].role, Role::Allrounder);
        assert_eq!(rows[1].cost, None);
        assert_eq!(rows[1].outcome, AuctionOutcome::Sold);

        assert_eq!(rows[2].outcome, AuctionOutcome::Unsold);
    }

    #[test]
    fn test_missing_required_column() {
        let f = write_csv("name,role\nAlpha,Batter\n");
        assert!(load_scored_rows(f.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_scored_rows(Path::new("/definitely/not/here.csv")).is_err());
    }

    #[test]
    fn test_player_stats_upstream_headers() {
        let f = write_csv(
            "Player,COUNTRY,TEAM,Paying_Role,Avg,SR,Runs,Inns,B_Wkts,B_Inns,B_Econ,CAPTAINCY EXP,AGE\n\
             MS Dhoni,IND,CSK,Batting,38.1,135.2,5000,200,,,,1,42\n\
             Rashid,AFG,GT,Bowling,10,140,300,40,120,100,6.5,0,26\n",
        );
        let (players, stats) = load_player_stats(f.path()).unwrap();
        assert_eq!(stats.parsed, 2);

        assert_eq!(players[0].nationality, Nationality::Domestic);
        assert_eq!(players[0].batting_avg, Some(38.1));
        assert_eq!(players[0].bowling_economy, None);
        assert_eq!(players[0].captaincy_exp, Some(1.0));
        assert_eq!(players[0].extra.get("age"), Some(&42.0));

        assert_eq!(players[1].nationality, Nationality::Overseas);
        assert_eq!(players[1].role, Role::Bowler);
        assert_eq!(players[1].bowling_wickets, Some(120.0));
    }
}
