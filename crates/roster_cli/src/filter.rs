//! Current-squad filter and current-season override
//!
//! Both are best-effort: any problem with the auxiliary file degrades to the
//! unfiltered / un-overridden input, with the reason attached.

use roster_core::{Eligibility, Loaded, PlayerStats, RawRow};
use std::collections::HashSet;
use std::path::Path;

use crate::input::{cell, load_player_stats, Columns};

/// Rows belonging to `team` (case-insensitive code match).
pub fn rows_for_team(rows: Vec<RawRow>, team: &str) -> Vec<RawRow> {
    let eligibility = Eligibility::for_team(team);
    rows.into_iter().filter(|r| eligibility.admits(r)).collect()
}

/// Restrict a team's rows to the players listed for it in `squad_csv`.
///
/// The squad file needs a team column (`TEAM`/`Team`/`team`) and a player
/// column (`Player`/`player`/`PLAYER_NAME`/`player_name`/`name`).
pub fn apply_squad_filter(rows: Vec<RawRow>, squad_csv: &Path, team: &str) -> Loaded<Vec<RawRow>> {
    if !squad_csv.exists() {
        return Loaded::degraded(
            rows,
            format!("squad file {} not found; using full team", squad_csv.display()),
        );
    }

    let names = match squad_names(squad_csv, team) {
        Ok(names) => names,
        Err(reason) => return Loaded::degraded(rows, format!("{}; using full team", reason)),
    };

    let filtered: Vec<RawRow> = rows
        .iter()
        .filter(|r| names.contains(r.name.trim()))
        .cloned()
        .collect();

    if filtered.is_empty() {
        return Loaded::degraded(
            rows,
            format!(
                "squad filter for {} matched 0 players; check name spelling; using full team",
                team
            ),
        );
    }

    log::info!(
        "squad filter for {}: {} of {} players kept",
        team,
        filtered.len(),
        rows.len()
    );
    Loaded::Clean(filtered)
}

fn squad_names(path: &Path, team: &str) -> Result<HashSet<String>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    let headers = reader
        .headers()
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?
        .clone();

    let cols = Columns::new(&headers);
    let (Some(team_i), Some(name_i)) = (
        cols.find(&["team"]),
        cols.find(&["player", "player_name", "name"]),
    ) else {
        return Err(format!("{} has no usable team/player columns", path.display()));
    };

    let mut team_rows = 0usize;
    let mut skipped = 0usize;
    let mut names = HashSet::new();
    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                skipped += 1;
                log::warn!("{}: line {} skipped: {}", path.display(), i + 2, e);
                continue;
            }
        };
        let row_team = cell(&record, Some(team_i)).unwrap_or_default();
        if !row_team.eq_ignore_ascii_case(team) {
            continue;
        }
        team_rows += 1;
        if let Some(name) = cell(&record, Some(name_i)) {
            names.insert(name.to_string());
        }
    }

    if skipped > 0 {
        log::warn!("{}: {} malformed squad rows skipped", path.display(), skipped);
    }
    if team_rows == 0 {
        return Err(format!("no squad rows for team {}", team));
    }
    if names.is_empty() {
        return Err(format!("squad list for {} has no player names", team));
    }
    Ok(names)
}

/// Replace base stats with current-season stats for every (team, player)
/// present in `current_csv`.
///
/// A missing override file is the normal case and returns the base rows
/// clean. Overridden rows move to the end, after the untouched base rows.
pub fn merge_season_override(base: Vec<PlayerStats>, current_csv: &Path) -> Loaded<Vec<PlayerStats>> {
    if !current_csv.exists() {
        return Loaded::Clean(base);
    }

    let current = match load_player_stats(current_csv) {
        Ok((players, _)) => players,
        Err(e) => {
            return Loaded::degraded(base, format!("current-season stats unreadable ({:#}); using base stats", e))
        }
    };

    if current.iter().any(|p| p.team.is_none()) {
        return Loaded::degraded(
            base,
            format!(
                "{} has rows without a team; using base stats",
                current_csv.display()
            ),
        );
    }

    let key = |p: &PlayerStats| {
        (
            p.team.as_deref().unwrap_or_default().to_ascii_uppercase(),
            p.name.trim().to_string(),
        )
    };
    let overridden: HashSet<(String, String)> = current.iter().map(key).collect();

    let before = base.len();
    let mut merged: Vec<PlayerStats> = base.into_iter().filter(|p| !overridden.contains(&key(p))).collect();
    log::info!(
        "current-season override: {} base rows replaced, {} rows added",
        before - merged.len(),
        current.len()
    );
    merged.extend(current);
    Loaded::Clean(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{Nationality, Role};
    use tempfile::TempDir;

    fn row(name: &str, team: &str) -> RawRow {
        RawRow::new(name, Nationality::Domestic, Role::Batter)
            .with_score(1.0)
            .with_team(team)
    }

    fn team_rows() -> Vec<RawRow> {
        vec![row("MS Dhoni", "CSK"), row("Ruturaj Gaikwad", "CSK"), row("Shivam Dube", "CSK")]
    }

    #[test]
    fn test_rows_for_team() {
        let rows = vec![row("a", "CSK"), row("b", "MI"), row("c", "csk")];
        let kept = rows_for_team(rows, "Csk");
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_filter_keeps_listed_players() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("players.csv");
        std::fs::write(&path, "Team,Player\ncsk,MS Dhoni\nCSK, Shivam Dube \nMI,Rohit Sharma\n").unwrap();

        let out = apply_squad_filter(team_rows(), &path, "CSK");
        assert!(!out.is_degraded());
        let names: Vec<&str> = out.value().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["MS Dhoni", "Shivam Dube"]);
    }

    #[test]
    fn test_filter_degrades() {
        let dir = TempDir::new().unwrap();

        let missing = apply_squad_filter(team_rows(), &dir.path().join("nope.csv"), "CSK");
        assert!(missing.is_degraded());
        assert_eq!(missing.value().len(), 3);

        let bad_cols = dir.path().join("bad.csv");
        std::fs::write(&bad_cols, "Club,Who\nCSK,MS Dhoni\n").unwrap();
        let out = apply_squad_filter(team_rows(), &bad_cols, "CSK");
        assert!(out.reason().unwrap().contains("no usable team/player columns"));
        assert_eq!(out.into_value().len(), 3);

        let other_team = dir.path().join("mi.csv");
        std::fs::write(&other_team, "TEAM,PLAYER_NAME\nMI,Rohit Sharma\n").unwrap();
        let out = apply_squad_filter(team_rows(), &other_team, "CSK");
        assert!(out.reason().unwrap().contains("no squad rows"));

        let no_match = dir.path().join("typo.csv");
        std::fs::write(&no_match, "team,player\nCSK,M S Dhoni\n").unwrap();
        let out = apply_squad_filter(team_rows(), &no_match, "CSK");
        assert!(out.reason().unwrap().contains("matched 0 players"));
        assert_eq!(out.value().len(), 3);
    }

    #[test]
    fn test_filter_skips_malformed_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("players.csv");
        // Invalid UTF-8 in the middle row.
        let mut bytes = b"Team,Player\nCSK,MS Dhoni\nCSK,".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b"\nCSK,Shivam Dube\n");
        std::fs::write(&path, bytes).unwrap();

        let names = squad_names(&path, "CSK").unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("MS Dhoni"));
        assert!(names.contains("Shivam Dube"));

        let out = apply_squad_filter(team_rows(), &path, "CSK");
        assert!(!out.is_degraded());
        assert_eq!(out.value().len(), 2);
    }

    fn stats(name: &str, team: &str, runs: f64) -> PlayerStats {
        let mut p = PlayerStats::new(name, Nationality::Domestic, Role::Batter);
        p.team = Some(team.to_string());
        p.runs = Some(runs);
        p
    }

    #[test]
    fn test_season_override() {
        let dir = TempDir::new().unwrap();
        let base = vec![stats("A", "CSK", 1.0), stats("B", "CSK", 2.0), stats("A", "MI", 3.0)];

        let absent = merge_season_override(base.clone(), &dir.path().join("current.csv"));
        assert!(!absent.is_degraded());
        assert_eq!(absent.value(), &base);

        let path = dir.path().join("current.csv");
        std::fs::write(&path, "Player,COUNTRY,TEAM,Paying_Role,Runs\nA,IND,csk,Batting,99\nC,IND,CSK,Batting,5\n")
            .unwrap();
        let merged = merge_season_override(base.clone(), &path).into_value();
        let summary: Vec<(String, Option<f64>)> = merged
            .iter()
            .map(|p| (format!("{}@{}", p.name, p.team.as_deref().unwrap_or("")), p.runs))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("B@CSK".to_string(), Some(2.0)),
                ("A@MI".to_string(), Some(3.0)),
                ("A@csk".to_string(), Some(99.0)),
                ("C@CSK".to_string(), Some(5.0)),
            ]
        );
    }

    #[test]
    fn test_season_override_without_team_degrades() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("current.csv");
        std::fs::write(&path, "Player,COUNTRY,Paying_Role,Runs\nA,IND,Batting,99\n").unwrap();

        let base = vec![stats("A", "CSK", 1.0)];
        let out = merge_season_override(base.clone(), &path);
        assert!(out.is_degraded());
        assert_eq!(out.into_value(), base);
    }
}
