//! Selection configuration
//!
//! One file holds both selector parameter sets plus eligibility and any
//! extra venues. Every section is optional; missing sections fall back to
//! the auction / T20 defaults.
//!
//! ```yaml
//! squad:
//!   purse: 120.0
//!   squad_size: 9
//! lineup:
//!   overseas_cap: 4
//!   bowler_band: { min: 4, max: 6 }
//! eligibility:
//!   season: 2025
//!   require_sold_prediction: true
//! venues:
//!   - name: Barsapara Stadium
//!     aliases: [guwahati]
//!     pitch: batting
//! keepers: [MS Dhoni, Sanju Samson]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::candidate::Eligibility;
use crate::error::{ConfigError, Result};
use crate::scoring::{VenueBook, VenueEntry};
use crate::selection::{LineupParams, SquadParams};

/// Wicket-keepers recognised by name when the input has no keeper column.
pub const DEFAULT_KEEPERS: &[&str] = &[
    "MS Dhoni",
    "Rishabh Pant",
    "Wriddhiman Saha",
    "Matthew Wade",
    "K L Rahul",
    "Quinton De Kock",
    "Ishan Kishan",
    "Jonny Bairstow",
    "Jitesh Sharma",
    "Dinesh Karthik",
    "Jos Buttler",
    "Sanju Samson",
    "Nicholas Pooran",
    "Devon Conway",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub squad: SquadParams,
    pub lineup: LineupParams,
    pub eligibility: Eligibility,
    /// Checked before the built-in venue table.
    pub venues: Vec<VenueEntry>,
    /// 키퍼 명단 (기본: DEFAULT_KEEPERS). Replaces the default list when set.
    pub keepers: Vec<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self::auction()
    }
}

impl SelectionConfig {
    /// Auction preset: 9-man squad, purse 100, sold-predicted rows only.
    pub fn auction() -> Self {
        Self {
            squad: SquadParams::default(),
            lineup: LineupParams::default(),
            eligibility: Eligibility {
                require_sold_prediction: true,
                ..Eligibility::any()
            },
            venues: Vec::new(),
            keepers: DEFAULT_KEEPERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// T20 match-day preset: line-up from the whole squad list, no auction
    /// outcome filter.
    pub fn t20_lineup() -> Self {
        Self {
            eligibility: Eligibility::any(),
            ..Self::auction()
        }
    }

    /// Load by extension (`.yaml`, `.yml`, `.json`) and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let config = match ext.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.display().to_string(),
                })
            }
        };
        log::debug!("loaded selection config from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> std::result::Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> std::result::Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.squad.validate()?;
        self.lineup.validate()?;
        Ok(())
    }

    /// Name match against `keepers`, trimmed and case-insensitive.
    pub fn is_listed_keeper(&self, name: &str) -> bool {
        let name = name.trim();
        self.keepers.iter().any(|k| k.trim().eq_ignore_ascii_case(name))
    }

    /// Configured venues followed by the built-in table.
    pub fn venue_book(&self) -> VenueBook {
        let mut entries = self.venues.clone();
        entries.extend(VenueBook::builtin().entries().iter().cloned());
        VenueBook::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Role;
    use crate::scoring::PitchContext;
    use crate::selection::RoleQuota;
    use std::io::Write;

    #[test]
    fn test_presets() {
        let auction = SelectionConfig::auction();
        assert_eq!(auction.squad.squad_size, 9);
        assert_eq!(auction.squad.purse, 100.0);
        assert!(auction.eligibility.require_sold_prediction);
        assert_eq!(auction.lineup.size, 11);
        assert!(auction.validate().is_ok());

        let t20 = SelectionConfig::t20_lineup();
        assert!(!t20.eligibility.require_sold_prediction);
        assert_eq!(t20.lineup.bowler_band.min, 4);
        assert_eq!(SelectionConfig::default(), auction);
    }

    #[test]
    fn test_keeper_list() {
        let config = SelectionConfig::t20_lineup();
        assert!(config.is_listed_keeper("MS Dhoni"));
        assert!(config.is_listed_keeper("  sanju samson "));
        assert!(!config.is_listed_keeper("Ruturaj Gaikwad"));

        let custom = SelectionConfig::from_yaml_str("keepers: [Phil Salt]\n").unwrap();
        assert!(custom.is_listed_keeper("Phil Salt"));
        assert!(!custom.is_listed_keeper("MS Dhoni"));

        let untouched = SelectionConfig::from_yaml_str("squad:\n  purse: 90.0\n").unwrap();
        assert_eq!(untouched.keepers.len(), DEFAULT_KEEPERS.len());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
squad:
  purse: 120.0
  role_minimums:
    - { role: Bowler, minimum: 4 }
lineup:
  overseas_cap: 3
"#;
        let cfg = SelectionConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.squad.purse, 120.0);
        assert_eq!(cfg.squad.squad_size, 9);
        assert_eq!(cfg.squad.role_minimums, vec![RoleQuota::new(Role::Bowler, 4)]);
        assert_eq!(cfg.lineup.overseas_cap, 3);
        assert_eq!(cfg.lineup.size, 11);
        assert!(cfg.eligibility.require_sold_prediction);
    }

    #[test]
    fn test_json_and_validation() {
        let cfg = SelectionConfig::from_json_str(r#"{"lineup": {"iteration_cap": 5}}"#).unwrap();
        assert_eq!(cfg.lineup.iteration_cap, 5);

        let err = SelectionConfig::from_json_str(r#"{"squad": {"min_overseas": 4, "max_overseas": 2}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SelectionConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();

        let yaml_path = dir.path().join("sel.yml");
        let mut f = std::fs::File::create(&yaml_path).unwrap();
        writeln!(f, "eligibility:\n  season: 2025\n  require_sold_prediction: false").unwrap();
        let cfg = SelectionConfig::load(&yaml_path).unwrap();
        assert_eq!(cfg.eligibility.season, Some(2025));
        assert!(!cfg.eligibility.require_sold_prediction);

        let toml_path = dir.path().join("sel.toml");
        std::fs::write(&toml_path, "x = 1").unwrap();
        assert!(matches!(
            SelectionConfig::load(&toml_path),
            Err(ConfigError::UnsupportedFormat { .. })
        ));

        assert!(matches!(
            SelectionConfig::load(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_custom_venues_take_priority() {
        let yaml = r#"
venues:
  - name: Barsapara Stadium
    aliases: [guwahati]
    pitch: batting
  - name: Chepauk Practice Ground
    pitch: batting
"#;
        let cfg = SelectionConfig::from_yaml_str(yaml).unwrap();
        let book = cfg.venue_book();
        assert_eq!(book.lookup("guwahati").pitch, PitchContext::Batting);
        assert_eq!(book.lookup("chepauk").pitch, PitchContext::Batting);
        assert_eq!(book.lookup("wankhede").pitch, PitchContext::Batting);
        assert_eq!(book.len(), VenueBook::builtin().len() + 2);
    }
}
