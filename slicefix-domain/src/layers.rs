//! The layer catalog: which layer may import which.

use serde::{Deserialize, Serialize};
use slicefix_types::Layer;
use std::collections::{BTreeMap, BTreeSet};

/// Per-layer opt-in for importing a sibling slice of the same layer.
///
/// `shared` and `entities` always may import themselves; the others only when enabled here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SameLayerImports {
    pub features_self_import: bool,
    pub widgets_self_import: bool,
    pub pages_self_import: bool,
    pub app_self_import: bool,
}

/// Static mapping from each layer to the set of layers it may import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerCatalog {
    allowed: BTreeMap<Layer, BTreeSet<Layer>>,
}

impl Default for LayerCatalog {
    fn default() -> Self {
        Self::baseline()
    }
}

impl LayerCatalog {
    /// Every layer may import the layers strictly below it; `shared` and `entities` also
    /// themselves.
    pub fn baseline() -> Self {
        Self::new(SameLayerImports::default())
    }

    pub fn new(same_layer: SameLayerImports) -> Self {
        let mut allowed = BTreeMap::new();
        for (idx, layer) in Layer::ALL.iter().enumerate() {
            let mut set: BTreeSet<Layer> = Layer::ALL[..idx].iter().copied().collect();
            let self_import = match layer {
                Layer::Shared | Layer::Entities => true,
                Layer::Features => same_layer.features_self_import,
                Layer::Widgets => same_layer.widgets_self_import,
                Layer::Pages => same_layer.pages_self_import,
                Layer::App => same_layer.app_self_import,
            };
            if self_import {
                set.insert(*layer);
            }
            allowed.insert(*layer, set);
        }
        Self { allowed }
    }

    /// Whether `segment` names one of the six layers.
    pub fn is_recognized(segment: &str) -> bool {
        segment.parse::<Layer>().is_ok()
    }

    pub fn may_import(&self, from: Layer, target: Layer) -> bool {
        self.allowed
            .get(&from)
            .is_some_and(|set| set.contains(&target))
    }

    pub fn allowed_targets(&self, from: Layer) -> impl Iterator<Item = Layer> + '_ {
        self.allowed.get(&from).into_iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn targets(catalog: &LayerCatalog, from: Layer) -> Vec<&'static str> {
        catalog.allowed_targets(from).map(Layer::as_str).collect()
    }

    #[test]
    fn baseline_table() {
        let c = LayerCatalog::baseline();
        assert_eq!(targets(&c, Layer::Shared), ["shared"]);
        assert_eq!(targets(&c, Layer::Entities), ["shared", "entities"]);
        assert_eq!(targets(&c, Layer::Features), ["shared", "entities"]);
        assert_eq!(targets(&c, Layer::Widgets), ["shared", "entities", "features"]);
        assert_eq!(
            targets(&c, Layer::Pages),
            ["shared", "entities", "features", "widgets"]
        );
        assert_eq!(
            targets(&c, Layer::App),
            ["shared", "entities", "features", "widgets", "pages"]
        );
    }

    #[test]
    fn nothing_imports_upward() {
        let c = LayerCatalog::new(SameLayerImports {
            features_self_import: true,
            widgets_self_import: true,
            pages_self_import: true,
            app_self_import: true,
        });
        for from in Layer::ALL {
            for target in Layer::ALL {
                if target > from {
                    assert!(!c.may_import(from, target), "{from} -> {target}");
                }
            }
        }
    }

    #[test]
    fn self_import_flags_are_independent() {
        let c = LayerCatalog::new(SameLayerImports {
            widgets_self_import: true,
            ..SameLayerImports::default()
        });
        assert!(c.may_import(Layer::Widgets, Layer::Widgets));
        assert!(!c.may_import(Layer::Features, Layer::Features));
        assert!(!c.may_import(Layer::Pages, Layer::Pages));
        assert!(!c.may_import(Layer::App, Layer::App));
    }

    #[test]
    fn recognizes_exactly_six_layers() {
        for l in Layer::ALL {
            assert!(LayerCatalog::is_recognized(l.as_str()));
        }
        assert!(!LayerCatalog::is_recognized("processes"));
        assert!(!LayerCatalog::is_recognized("Shared"));
    }
}
