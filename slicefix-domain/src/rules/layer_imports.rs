use slicefix_types::{Decision, RuleId};

use crate::rules::{PreparedOccurrence, Rule, RuleEnv, RuleMeta};

/// A layer may only import the layers the catalog allows it.
pub struct LayerImportsRule;

impl LayerImportsRule {
    const DESCRIPTION: &'static str =
        "A layer may only import from layers below it (entities and shared may also import themselves).";
}

impl Rule for LayerImportsRule {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            id: RuleId::LayerImports,
            description: Self::DESCRIPTION,
            fixable: false,
        }
    }

    fn evaluate(&self, occ: &PreparedOccurrence<'_>, env: &RuleEnv<'_>) -> Vec<Decision> {
        let Some(target) = occ.target_path() else {
            return vec![];
        };
        let (Some(from_layer), Some(target_layer)) = (occ.from.path.layer(), target.layer()) else {
            return vec![];
        };
        if occ.from.path.len() < 2 || occ.is_same_slice() {
            return vec![];
        }
        if env.ignore.matches(occ.specifier) {
            tracing::debug!(specifier = occ.specifier, "layer-imports: specifier ignored");
            return vec![];
        }

        if env.catalog.may_import(from_layer, target_layer) {
            vec![]
        } else {
            vec![Decision::LayerViolation {
                from_layer,
                offending_layer: target_layer,
            }]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{LayerCatalog, SameLayerImports};
    use crate::patterns::PathMatcher;
    use crate::rules::test_support::Fixture;
    use pretty_assertions::assert_eq;
    use slicefix_types::Layer;

    #[test]
    fn shared_cannot_import_entities() {
        let f = Fixture::default();
        assert_eq!(
            f.run(&LayerImportsRule, "/p/src/shared/Button.tsx", "@/entities/User"),
            vec![Decision::LayerViolation {
                from_layer: Layer::Shared,
                offending_layer: Layer::Entities,
            }]
        );
    }

    #[test]
    fn downward_imports_pass() {
        let f = Fixture::default();
        let file = "/p/src/features/NewFeature/ui/Thing.tsx";
        for spec in ["entities/User", "shared/ui/Button", "@/entities/Article/model"] {
            assert!(f.run(&LayerImportsRule, file, spec).is_empty(), "{spec}");
        }
    }

    #[test]
    fn entities_may_compose_entities() {
        let f = Fixture::default();
        assert!(
            f.run(&LayerImportsRule, "/p/src/entities/Article/model/a.ts", "entities/User")
                .is_empty()
        );
    }

    #[test]
    fn cross_slice_same_layer_follows_flag() {
        let file = "/p/src/features/Login/ui/Form.tsx";
        let f = Fixture::default();
        assert_eq!(
            f.run(&LayerImportsRule, file, "features/Register"),
            vec![Decision::LayerViolation {
                from_layer: Layer::Features,
                offending_layer: Layer::Features,
            }]
        );

        let f = Fixture {
            catalog: LayerCatalog::new(SameLayerImports {
                features_self_import: true,
                ..SameLayerImports::default()
            }),
            ..Fixture::default()
        };
        assert!(f.run(&LayerImportsRule, file, "features/Register").is_empty());
    }

    #[test]
    fn same_slice_is_left_to_relative_path() {
        let f = Fixture::default();
        assert!(
            f.run(
                &LayerImportsRule,
                "/p/src/pages/Main/ui/Page.tsx",
                "pages/Main/model/selectors"
            )
            .is_empty()
        );
    }

    #[test]
    fn unknown_layers_and_relative_targets_skip() {
        let f = Fixture::default();
        let file = "/p/src/shared/lib/a.ts";
        for spec in ["react", "@reduxjs/toolkit", "../entities/User", "processes/x"] {
            assert!(f.run(&LayerImportsRule, file, spec).is_empty(), "{spec}");
        }
        assert!(
            f.run(&LayerImportsRule, "/p/other/shared/a.ts", "app/providers")
                .is_empty()
        );
    }

    #[test]
    fn ignore_patterns_match_specifier() {
        let f = Fixture {
            ignore: PathMatcher::new(["**/StoreProvider"]).expect("valid"),
            ..Fixture::default()
        };
        let file = "/p/src/shared/config/StoreDecorator.tsx";
        assert!(
            f.run(&LayerImportsRule, file, "@/app/providers/StoreProvider")
                .is_empty()
        );
        assert_eq!(f.run(&LayerImportsRule, file, "@/app/providers/Theme").len(), 1);
    }
}
