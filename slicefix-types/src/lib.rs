//! Shared DTOs (schemas-as-code) for the slicefix workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod apply;
pub mod decision;
pub mod layer;
pub mod occurrence;
pub mod report;

pub use decision::{Decision, PublicApiKind, RuleId};
pub use layer::{Layer, ParseLayerError};
pub use occurrence::{ImportOccurrence, OccurrenceDocument, Span};

/// Schema identifiers.
pub mod schema {
    pub const SLICEFIX_OCCURRENCES_V1: &str = "slicefix.occurrences.v1";
    pub const SLICEFIX_REPORT_V1: &str = "slicefix.report.v1";
    pub const SLICEFIX_APPLY_V1: &str = "slicefix.apply.v1";
}
