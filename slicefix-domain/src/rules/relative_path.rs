use slicefix_types::{Decision, PublicApiKind, RuleId};

use crate::rewrite::PathRewriter;
use crate::rules::{PreparedOccurrence, Rule, RuleEnv, RuleMeta};

/// Absolute imports inside one slice must be written relative to the importing file.
pub struct RelativePathRule;

impl RelativePathRule {
    const DESCRIPTION: &'static str =
        "Imports within the same slice must be relative; the absolute specifier is rewritten.";
}

impl Rule for RelativePathRule {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: RuleId::RelativePath,
            description: Self::DESCRIPTION,
            fixable: true,
        }
    }

    fn evaluate(&self, occ: &PreparedOccurrence<'_>, env: &RuleEnv<'_>) -> Vec<Decision> {
        let Some(target) = occ.target_path() else {
            return vec![];
        };
        if !occ.is_same_slice() {
            return vec![];
        }
        if occ.file_matches(env.ignore) {
            tracing::debug!(file = %occ.file, "relative-path: file ignored");
            return vec![];
        }

        // `entities/User` from inside `entities/User` would rewrite to a self-import.
        // `shared` and `app` segments have no public surface and take the plain rewrite.
        let has_surface = target.layer().is_some_and(|l| l.has_public_surface());
        if has_surface && occ.target.is_public_surface_shaped() {
            return vec![Decision::PublicApiViolation {
                kind: PublicApiKind::MustUsePublicApi,
                same_slice: true,
                replacement: None,
            }];
        }

        vec![Decision::RelativeRequired {
            replacement: PathRewriter::to_relative(&occ.from.path, target),
        }]
    }
}
