//! Venue → pitch context lookup

use super::PitchContext;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_VENUE_NOTE: &str = "Unknown venue; using 'balanced' as default.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueEntry {
    pub name: String,
    /// Extra search keys (city, nickname).
    #[serde(default)]
    pub aliases: Vec<String>,
    pub pitch: PitchContext,
    #[serde(default)]
    pub notes: String,
}

impl VenueEntry {
    pub fn new(name: &str, aliases: &[&str], pitch: PitchContext, notes: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            pitch,
            notes: notes.to_string(),
        }
    }

    fn matches(&self, query: &str) -> bool {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .any(|key| key.to_lowercase().contains(query))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueLookup {
    /// Matched venue name, `None` when the query resolved to nothing.
    pub venue: Option<String>,
    pub pitch: PitchContext,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueBook {
    entries: Vec<VenueEntry>,
}

impl VenueBook {
    pub fn new(entries: Vec<VenueEntry>) -> Self {
        Self { entries }
    }

    /// 기본 IPL 경기장 목록
    pub fn builtin() -> Self {
        use PitchContext::*;
        Self::new(vec![
            VenueEntry::new(
                "M. A. Chidambaram Stadium",
                &["chepauk", "chennai"],
                Bowling,
                "Slow, dry surface; spinners get grip and turn.",
            ),
            VenueEntry::new(
                "Wankhede Stadium",
                &["wankhede", "mumbai"],
                Batting,
                "True bounce and short boundaries; high scores common.",
            ),
            VenueEntry::new(
                "M. Chinnaswamy Stadium",
                &["chinnaswamy", "bengaluru", "bangalore"],
                Batting,
                "Small ground at altitude; bowlers struggle to contain.",
            ),
            VenueEntry::new(
                "Eden Gardens",
                &["eden", "kolkata"],
                Balanced,
                "Even contest; pace early, spin later.",
            ),
            VenueEntry::new(
                "Arun Jaitley Stadium",
                &["kotla", "feroz shah kotla", "delhi"],
                Batting,
                "Flat deck with quick outfield.",
            ),
            VenueEntry::new(
                "Narendra Modi Stadium",
                &["motera", "ahmedabad"],
                Balanced,
                "Large square; rewards both pace and spin depending on soil.",
            ),
            VenueEntry::new(
                "Rajiv Gandhi International Stadium",
                &["uppal", "hyderabad"],
                Batting,
                "Good carry; chasing sides do well.",
            ),
            VenueEntry::new(
                "Sawai Mansingh Stadium",
                &["jaipur"],
                Balanced,
                "Big boundaries keep totals in check.",
            ),
            VenueEntry::new(
                "Ekana Cricket Stadium",
                &["ekana", "lucknow"],
                Bowling,
                "Two-paced surface; cutters and spin hard to hit.",
            ),
            VenueEntry::new(
                "PCA Stadium",
                &["mohali", "mullanpur", "punjab"],
                Balanced,
                "Early seam movement, good batting later.",
            ),
        ])
    }

    pub fn entries(&self) -> &[VenueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive partial match; first entry in table order wins.
    /// Unknown or blank venues resolve to a balanced pitch.
    pub fn lookup(&self, query: &str) -> VenueLookup {
        let q = query.trim().to_lowercase();
        let hit = if q.is_empty() {
            None
        } else {
            self.entries.iter().find(|e| e.matches(&q))
        };

        match hit {
            Some(entry) => VenueLookup {
                venue: Some(entry.name.clone()),
                pitch: entry.pitch,
                notes: entry.notes.clone(),
            },
            None => {
                log::debug!("venue '{}' not found, defaulting to balanced", query);
                VenueLookup {
                    venue: None,
                    pitch: PitchContext::Balanced,
                    notes: UNKNOWN_VENUE_NOTE.to_string(),
                }
            }
        }
    }
}
