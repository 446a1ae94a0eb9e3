//! Candidates and the per-call candidate pool

pub mod pool;
pub mod types;

pub use pool::{CandidatePool, Eligibility, Exclusion, ExclusionReason, PoolReport, Requirement};
pub use types::{AuctionOutcome, Candidate, CandidateId, CandidateKey, Nationality, RawRow, Role};
