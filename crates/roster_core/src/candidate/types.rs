//! Candidate data model
//!
//! Closed enumerations for role, nationality bucket and predicted auction
//! outcome, plus the raw row shape produced by upstream scoring/pricing and
//! the admitted `Candidate` that selectors work with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SelectionError;

/// Stable arena index of an admitted candidate.
///
/// Assigned in insertion order, so it doubles as the tie-break key when two
/// candidates share a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub u32);

impl CandidateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Playing role. Keeping is an independent flag, not a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(alias = "Batting", alias = "batter", alias = "batting")]
    Batter,
    #[serde(alias = "Bowling", alias = "bowler", alias = "bowling")]
    Bowler,
    #[serde(
        alias = "All rounder",
        alias = "All-rounder",
        alias = "All Rounder",
        alias = "allrounder"
    )]
    Allrounder,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Batter, Role::Bowler, Role::Allrounder];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Batter => "Batter",
            Role::Bowler => "Bowler",
            Role::Allrounder => "Allrounder",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "batter" | "batting" | "batsman" => Ok(Role::Batter),
            "bowler" | "bowling" => Ok(Role::Bowler),
            "allrounder" => Ok(Role::Allrounder),
            _ => Err(SelectionError::invalid(format!("unknown role: '{}'", s.trim()))),
        }
    }
}

/// Nationality bucket used by overseas quotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nationality {
    #[serde(alias = "Indian", alias = "IND", alias = "India", alias = "domestic")]
    Domestic,
    #[serde(alias = "overseas")]
    Overseas,
}

impl Nationality {
    pub fn is_overseas(self) -> bool {
        matches!(self, Nationality::Overseas)
    }
}

impl fmt::Display for Nationality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Nationality::Domestic => f.write_str("Domestic"),
            Nationality::Overseas => f.write_str("Overseas"),
        }
    }
}

impl FromStr for Nationality {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "domestic" | "indian" | "india" | "ind" => Ok(Nationality::Domestic),
            "overseas" => Ok(Nationality::Overseas),
            _ => Err(SelectionError::invalid(format!(
                "unknown nationality bucket: '{}'",
                s.trim()
            ))),
        }
    }
}

/// Upstream SOLD/UNSOLD prediction attached to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AuctionOutcome {
    #[default]
    #[serde(alias = "SOLD", alias = "sold")]
    Sold,
    #[serde(alias = "UNSOLD", alias = "unsold")]
    Unsold,
}

/// Identity of a candidate within one pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateKey {
    pub name: String,
    pub season: Option<u16>,
}

impl fmt::Display for CandidateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.season {
            Some(season) => write!(f, "{} ({})", self.name, season),
            None => f.write_str(&self.name),
        }
    }
}

/// One scored row as delivered by the scoring/pricing stage.
///
/// Numeric fields are optional here; the pool decides which rows are
/// admissible for the operation at hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub name: String,
    #[serde(default)]
    pub season: Option<u16>,
    #[serde(default)]
    pub team: Option<String>,
    pub nationality: Nationality,
    pub role: Role,
    #[serde(default)]
    pub keeper: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub outcome: AuctionOutcome,
}

impl RawRow {
    pub fn new(name: impl Into<String>, nationality: Nationality, role: Role) -> Self {
        Self {
            name: name.into(),
            season: None,
            team: None,
            nationality,
            role,
            keeper: false,
            score: None,
            cost: None,
            outcome: AuctionOutcome::Sold,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_season(mut self, season: u16) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn keeper(mut self) -> Self {
        self.keeper = true;
        self
    }

    pub fn with_outcome(mut self, outcome: AuctionOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn key(&self) -> CandidateKey {
        CandidateKey {
            name: self.name.clone(),
            season: self.season,
        }
    }
}

/// An admitted candidate: finite score, and a finite non-negative cost when
/// the pool was built for budgeted selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub season: Option<u16>,
    pub team: Option<String>,
    pub nationality: Nationality,
    pub role: Role,
    pub keeper: bool,
    pub score: f64,
    pub cost: Option<f64>,
}

impl Candidate {
    pub fn key(&self) -> CandidateKey {
        CandidateKey {
            name: self.name.clone(),
            season: self.season,
        }
    }

    #[inline]
    pub fn is_overseas(&self) -> bool {
        self.nationality.is_overseas()
    }

    #[inline]
    pub fn is_bowler(&self) -> bool {
        self.role == Role::Bowler
    }

    #[inline]
    pub fn is_allrounder(&self) -> bool {
        self.role == Role::Allrounder
    }

    /// Batter that is not a keeper.
    #[inline]
    pub fn is_pure_batter(&self) -> bool {
        self.role == Role::Batter && !self.keeper
    }

    /// Cost, or zero for pools built without a cost requirement.
    #[inline]
    pub fn cost_or_zero(&self) -> f64 {
        self.cost.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_accepts_source_spellings() {
        assert_eq!("Batting".parse::<Role>().unwrap(), Role::Batter);
        assert_eq!("Bowling".parse::<Role>().unwrap(), Role::Bowler);
        assert_eq!("All rounder".parse::<Role>().unwrap(), Role::Allrounder);
        assert_eq!("all-rounder".parse::<Role>().unwrap(), Role::Allrounder);
        assert!("Wicketkeeper".parse::<Role>().is_err());
    }

    #[test]
    fn test_nationality_parsing() {
        assert_eq!("Indian".parse::<Nationality>().unwrap(), Nationality::Domestic);
        assert_eq!("IND".parse::<Nationality>().unwrap(), Nationality::Domestic);
        assert_eq!(" Overseas ".parse::<Nationality>().unwrap(), Nationality::Overseas);
        assert!("Elsewhere".parse::<Nationality>().is_err());
    }

    #[test]
    fn test_serde_aliases() {
        let row: RawRow = serde_json::from_str(
            r#"{"name":"A","nationality":"Indian","role":"All rounder","score":1.5,"outcome":"UNSOLD"}"#,
        )
        .unwrap();
        assert_eq!(row.role, Role::Allrounder);
        assert_eq!(row.nationality, Nationality::Domestic);
        assert_eq!(row.outcome, AuctionOutcome::Unsold);
        assert!(!row.keeper);
        assert_eq!(row.cost, None);
    }

    #[test]
    fn test_key_display() {
        let row = RawRow::new("V Kohli", Nationality::Domestic, Role::Batter).with_season(2025);
        assert_eq!(row.key().to_string(), "V Kohli (2025)");
    }
}
