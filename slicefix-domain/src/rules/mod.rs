//! The three import checks. Each rule turns one prepared occurrence into zero or more decisions.

use camino::Utf8Path;
use slicefix_types::{Decision, ImportOccurrence, RuleId};

use crate::layers::LayerCatalog;
use crate::path::{FileLocation, ImportTarget, SourcePath, normalize_separators, strip_alias};
use crate::patterns::PathMatcher;
use crate::ports::PublicSurfaceReader;
use crate::surface::SurfaceProbe;

mod layer_imports;
mod public_api;
mod relative_path;

pub use layer_imports::LayerImportsRule;
pub use public_api::PublicApiRule;
pub use relative_path::RelativePathRule;

/// Static description of a rule, for listings and `explain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMeta {
    pub id: RuleId,
    pub description: &'static str,
    /// Whether the rule can attach a replacement specifier to its findings.
    pub fixable: bool,
}

pub trait Rule: Send + Sync {
    fn meta(&self) -> RuleMeta;

    fn evaluate(&self, occ: &PreparedOccurrence<'_>, env: &RuleEnv<'_>) -> Vec<Decision>;
}

pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(RelativePathRule),
        Box::new(LayerImportsRule),
        Box::new(PublicApiRule),
    ]
}

pub fn builtin_rule_metas() -> Vec<RuleMeta> {
    builtin_rules().iter().map(|r| r.meta()).collect()
}

/// Everything a rule may consult besides the occurrence itself.
pub struct RuleEnv<'a> {
    pub catalog: &'a LayerCatalog,
    pub ignore: &'a PathMatcher,
    pub test_files: &'a PathMatcher,
    pub probe: &'a SurfaceProbe,
    pub reader: &'a dyn PublicSurfaceReader,
}

/// An occurrence with its file located and its specifier classified.
#[derive(Debug, Clone)]
pub struct PreparedOccurrence<'a> {
    pub occurrence: &'a ImportOccurrence,
    /// Importing file with forward slashes.
    pub file: String,
    pub from: FileLocation,
    /// Specifier after alias stripping.
    pub specifier: &'a str,
    /// The alias literal, when the specifier started with it.
    pub alias: Option<&'a str>,
    pub target: ImportTarget,
}

impl<'a> PreparedOccurrence<'a> {
    pub fn new(occurrence: &'a ImportOccurrence, alias: Option<&'a str>, source_dir: &str) -> Self {
        let file = normalize_separators(&occurrence.file);
        let from = crate::path::parse_file_path(&file, source_dir);
        let (specifier, alias_used) = strip_alias(&occurrence.specifier, alias);
        Self {
            occurrence,
            file,
            from,
            specifier,
            alias: if alias_used { alias } else { None },
            target: ImportTarget::parse(specifier),
        }
    }

    pub fn target_path(&self) -> Option<&SourcePath> {
        self.target.as_absolute()
    }

    /// Importing file and target share a recognized (layer, slice).
    pub fn is_same_slice(&self) -> bool {
        match (self.from.path.slice_key(), self.target_path().and_then(SourcePath::slice_key)) {
            (Some(from), Some(to)) => from == to,
            _ => false,
        }
    }

    /// Matches `matcher` against the full file path and its source-root-relative form.
    pub fn file_matches(&self, matcher: &PathMatcher) -> bool {
        let relative = self.from.path.to_specifier();
        let mut candidates = vec![self.file.as_str()];
        if !relative.is_empty() {
            candidates.push(relative.as_str());
        }
        matcher.matches_any(candidates)
    }

    pub fn is_test_file(&self, env: &RuleEnv<'_>) -> bool {
        self.file_matches(env.test_files)
    }

    pub fn source_root(&self) -> Option<&Utf8Path> {
        self.from.source_root.as_deref()
    }

    /// Prefixes `specifier` with the alias the occurrence was written with.
    pub fn with_alias(&self, specifier: &str) -> String {
        format!("{}{}", self.alias.unwrap_or(""), specifier)
    }
}
