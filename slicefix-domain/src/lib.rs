//! Domain logic: classify import paths and decide which imports violate the layer/slice rules.
//!
//! This crate owns *what* is wrong with an import and what the specifier should read instead.
//! It does not touch source files; applying replacements is the `slicefix-edit` crate's job.

mod engine;
mod layers;
mod path;
mod patterns;
mod ports;
mod reexports;
mod rewrite;
mod rules;
mod surface;

pub use engine::{EngineConfig, PolicyEngine, RuleToggles};
pub use layers::{LayerCatalog, SameLayerImports};
pub use path::{
    DEFAULT_SOURCE_DIR, FileLocation, ImportTarget, SourcePath, TESTING_SEGMENT,
    is_relative_specifier, normalize_separators, parse_file_path, strip_alias,
};
pub use patterns::{PathMatcher, PatternError};
pub use ports::{FsSurfaceReader, MemorySurfaceReader, PublicSurfaceReader};
pub use reexports::{ExportSet, scan_exports};
pub use rewrite::{MODULE_EXTENSIONS, PathRewriter};
pub use rules::{RuleMeta, builtin_rule_metas};
pub use surface::{
    MAX_STAR_DEPTH, PublicSurfaceDescriptor, SliceSurfaces, SurfaceFiles, SurfaceProbe,
    resolve_exports,
};
