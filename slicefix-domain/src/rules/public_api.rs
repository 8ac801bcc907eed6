use slicefix_types::{Decision, PublicApiKind, RuleId};

use crate::path::TESTING_SEGMENT;
use crate::rules::{PreparedOccurrence, Rule, RuleEnv, RuleMeta};

/// Absolute imports into another slice must go through its public surface.
///
/// Only `entities`, `features`, `widgets` and `pages` are restricted. Deep imports get a fix when
/// a public surface already exports every imported name; otherwise each name that no surface
/// exports is reported on its own.
pub struct PublicApiRule;

impl PublicApiRule {
    const DESCRIPTION: &'static str = "Absolute imports into a slice must use its public API (index), or its testing API from test files.";
}

impl Rule for PublicApiRule {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: RuleId::PublicApiImports,
            description: Self::DESCRIPTION,
            fixable: true,
        }
    }

    fn evaluate(&self, occ: &PreparedOccurrence<'_>, env: &RuleEnv<'_>) -> Vec<Decision> {
        let Some(target) = occ.target_path() else {
            return vec![];
        };
        let Some((layer, slice)) = target.slice_key() else {
            return vec![];
        };
        if !layer.has_public_surface() {
            return vec![];
        }
        if occ.from.path.len() < 2 || occ.is_same_slice() {
            return vec![];
        }

        match target.segments() {
            [_, _] => vec![],
            [_, _, last] if last == TESTING_SEGMENT => {
                if occ.is_test_file(env) {
                    vec![]
                } else {
                    vec![Decision::PublicApiViolation {
                        kind: PublicApiKind::TestingApiRestricted,
                        same_slice: false,
                        replacement: None,
                    }]
                }
            }
            _ => {
                let surface = format!("{layer}/{slice}");
                let Some(root) = occ.source_root() else {
                    return vec![must_use_public_api(None)];
                };
                let surfaces = env.probe.surfaces(env.reader, root, layer, slice);
                let names = &occ.occurrence.names;

                if surfaces.primary_exports_all(names) {
                    return vec![must_use_public_api(Some(occ.with_alias(&surface)))];
                }
                if surfaces.testing_exports_all(names) && occ.is_test_file(env) {
                    let testing = format!("{surface}/{TESTING_SEGMENT}");
                    return vec![must_use_public_api(Some(occ.with_alias(&testing)))];
                }

                let mut out = vec![must_use_public_api(None)];
                out.extend(
                    names
                        .iter()
                        .filter(|name| !surfaces.exports_anywhere(name))
                        .map(|name| Decision::PublicApiViolation {
                            kind: PublicApiKind::ExportMissing {
                                export: name.clone(),
                                surface: surface.clone(),
                            },
                            same_slice: false,
                            replacement: None,
                        }),
                );
                out
            }
        }
    }
}

fn must_use_public_api(replacement: Option<String>) -> Decision {
    Decision::PublicApiViolation {
        kind: PublicApiKind::MustUsePublicApi,
        same_slice: false,
        replacement,
    }
}
