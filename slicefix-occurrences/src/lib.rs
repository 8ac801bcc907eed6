//! Import occurrence ingestion.
//!
//! The host's tree walker writes one `*.imports.json` document per traversal unit. Loading is
//! tolerant: unknown fields are ignored, and a document that cannot be read or parsed is kept as
//! a load error on that document instead of aborting the run.

mod load;

pub use load::{LoadedOccurrences, OccurrenceLoadError, load_occurrences, parse_document};
