//! Selection result, unmet-constraint diagnostics and the pick/swap trace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::candidate::{Candidate, CandidateId, Role};
use crate::roster::Roster;

/// Phase that produced a trace event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    OverseasFloor,
    RoleFill,
    Filler,
    Seed,
    BowlerBand,
    AllrounderMinimum,
    KeeperGuarantee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SelectionEvent {
    Added {
        id: CandidateId,
        phase: Phase,
    },
    Swapped {
        out: CandidateId,
        incoming: CandidateId,
        phase: Phase,
    },
}

impl SelectionEvent {
    pub fn phase(&self) -> Phase {
        match self {
            SelectionEvent::Added { phase, .. } | SelectionEvent::Swapped { phase, .. } => *phase,
        }
    }
}

/// A soft constraint the engine could not satisfy with the given pool/budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnmetConstraint {
    SquadSize { required: usize, achieved: usize },
    OverseasFloor { required: usize, achieved: usize },
    RoleMinimum { role: Role, required: usize, achieved: usize },
    BowlerBand { min: usize, max: usize, achieved: usize },
    AllrounderMinimum { required: usize, achieved: usize },
    KeeperMissing,
}

impl fmt::Display for UnmetConstraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnmetConstraint::SquadSize { required, achieved } => {
                write!(f, "size {}/{}", achieved, required)
            }
            UnmetConstraint::OverseasFloor { required, achieved } => {
                write!(f, "overseas {} below floor {}", achieved, required)
            }
            UnmetConstraint::RoleMinimum {
                role,
                required,
                achieved,
            } => write!(f, "{} {}/{}", role, achieved, required),
            UnmetConstraint::BowlerBand { min, max, achieved } => {
                write!(f, "bowlers {} outside [{}, {}]", achieved, min, max)
            }
            UnmetConstraint::AllrounderMinimum { required, achieved } => {
                write!(f, "allrounders {}/{}", achieved, required)
            }
            UnmetConstraint::KeeperMissing => f.write_str("no keeper in line-up"),
        }
    }
}

/// Output of either selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub roster: Roster,
    /// Line-up variant only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<Candidate>,
    pub unmet: Vec<UnmetConstraint>,
    pub events: Vec<SelectionEvent>,
}

impl Selection {
    /// True when every soft constraint was met.
    pub fn is_complete(&self) -> bool {
        self.unmet.is_empty()
    }

    pub fn events_in(&self, phase: Phase) -> impl Iterator<Item = &SelectionEvent> {
        self.events.iter().filter(move |e| e.phase() == phase)
    }
}
