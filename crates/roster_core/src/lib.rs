//! # roster_core - Deterministic Constrained Roster Selection
//!
//! Picks a cricket roster from a pool of scored (and optionally priced)
//! candidates under composition rules.
//!
//! ## Features
//! - Budgeted squad assembly: purse, overseas floor/ceiling, ordered role minimums
//! - Fixed-size line-up with bowler-band, allrounder and keeper repair passes
//! - Same pool + same parameters = same roster, ties broken by input order
//! - Unmet constraints reported as data, never as errors

// Selector entry points mirror the external call surface
#![allow(clippy::too_many_arguments)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod candidate;
pub mod config;
pub mod error;
pub mod outcome;
pub mod pricing;
pub mod roster;
pub mod scoring;
pub mod selection;
pub mod snapshot;

pub use candidate::{
    AuctionOutcome, Candidate, CandidateId, CandidateKey, CandidatePool, Eligibility, Exclusion,
    ExclusionReason, Nationality, PoolReport, RawRow, Requirement, Role,
};
pub use config::{SelectionConfig, DEFAULT_KEEPERS};
pub use error::{ConfigError, Result, SelectionError};
pub use outcome::Loaded;
pub use roster::{Roster, RosterCounts};
pub use scoring::{
    LinearScorer, MatchContext, PitchContext, PlayerStats, RuleBasedScorer, ScoringProvider,
    TossDecision, VenueBook,
};
pub use selection::{
    select_squad, select_starting_lineup, AllrounderRule, Band, BudgetedGreedySelector,
    ConstraintRepairSelector, LineupParams, Phase, RoleQuota, Selection, SelectionEvent,
    SquadParams, SwapEngine, UnmetConstraint,
};
pub use snapshot::{ModelSnapshot, SnapshotError, SnapshotHandle, SnapshotStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
