use crate::layer::Layer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The check that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    RelativePath,
    LayerImports,
    PublicApiImports,
}

impl RuleId {
    pub const ALL: [RuleId; 3] = [
        RuleId::RelativePath,
        RuleId::LayerImports,
        RuleId::PublicApiImports,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::RelativePath => "relative-path",
            RuleId::LayerImports => "layer-imports",
            RuleId::PublicApiImports => "public-api-imports",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        RuleId::ALL.into_iter().find(|r| r.as_str() == key)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong with an absolute import into a sliced layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicApiKind {
    /// The import reaches past `layer/slice` into slice internals.
    MustUsePublicApi,
    /// `layer/slice/testing` imported from a file that is not a test file.
    TestingApiRestricted,
    /// Neither public surface of `surface` (`layer/slice`) exports `export`.
    ExportMissing { export: String, surface: String },
}

/// The outcome of one policy for one import occurrence.
///
/// Pure value: it is computed per occurrence and never stored by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Allowed,

    /// Same-slice absolute import; `replacement` is the relative specifier to use instead.
    RelativeRequired { replacement: String },

    /// `offending_layer` may not be imported from `from_layer`.
    LayerViolation {
        from_layer: Layer,
        offending_layer: Layer,
    },

    PublicApiViolation {
        kind: PublicApiKind,

        /// The import targets the public surface of the importing file's own slice.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        same_slice: bool,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        replacement: Option<String>,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn rule(&self) -> Option<RuleId> {
        match self {
            Decision::Allowed => None,
            Decision::RelativeRequired { .. } => Some(RuleId::RelativePath),
            Decision::LayerViolation { .. } => Some(RuleId::LayerImports),
            Decision::PublicApiViolation { .. } => Some(RuleId::PublicApiImports),
        }
    }

    /// Literal text that should replace the import specifier, if a mechanical fix exists.
    pub fn replacement(&self) -> Option<&str> {
        match self {
            Decision::RelativeRequired { replacement } => Some(replacement),
            Decision::PublicApiViolation { replacement, .. } => replacement.as_deref(),
            Decision::Allowed | Decision::LayerViolation { .. } => None,
        }
    }

    /// Short stable code for reports, e.g. `must_use_public_api`.
    pub fn code(&self) -> &'static str {
        match self {
            Decision::Allowed => "allowed",
            Decision::RelativeRequired { .. } => "relative_required",
            Decision::LayerViolation { .. } => "layer_violation",
            Decision::PublicApiViolation {
                same_slice: true, ..
            } => "same_slice_public_import",
            Decision::PublicApiViolation { kind, .. } => match kind {
                PublicApiKind::MustUsePublicApi => "must_use_public_api",
                PublicApiKind::TestingApiRestricted => "testing_api_restricted",
                PublicApiKind::ExportMissing { .. } => "export_missing",
            },
        }
    }

    pub fn message(&self) -> String {
        match self {
            Decision::Allowed => "Import is allowed.".to_string(),
            Decision::RelativeRequired { .. } => {
                "All paths should be relative within the same slice.".to_string()
            }
            Decision::LayerViolation {
                from_layer,
                offending_layer,
            } => format!("You can't import layer '{offending_layer}' inside '{from_layer}' layer"),
            Decision::PublicApiViolation {
                same_slice: true, ..
            } => "Public API of the same slice must not be imported; use a relative path to the module instead."
                .to_string(),
            Decision::PublicApiViolation { kind, .. } => match kind {
                PublicApiKind::MustUsePublicApi => {
                    "Absolute import allowed only from public API (index.ts).".to_string()
                }
                PublicApiKind::TestingApiRestricted => {
                    "Only test files can import from testing public api.".to_string()
                }
                PublicApiKind::ExportMissing { export, surface } => {
                    format!("'{export}' is not exported from the public API of '{surface}'.")
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rule_keys_round_trip() {
        for rule in RuleId::ALL {
            assert_eq!(RuleId::from_key(rule.as_str()), Some(rule));
        }
        assert_eq!(RuleId::from_key("check-path"), None);
    }

    #[test]
    fn layer_message_names_both_layers() {
        let d = Decision::LayerViolation {
            from_layer: Layer::Shared,
            offending_layer: Layer::Entities,
        };
        assert_eq!(
            d.message(),
            "You can't import layer 'entities' inside 'shared' layer"
        );
        assert_eq!(d.replacement(), None);
    }

    #[test]
    fn same_slice_flag_changes_code_not_rule() {
        let d = Decision::PublicApiViolation {
            kind: PublicApiKind::MustUsePublicApi,
            same_slice: true,
            replacement: None,
        };
        assert_eq!(d.code(), "same_slice_public_import");
        assert_eq!(d.rule(), Some(RuleId::PublicApiImports));
    }

    #[test]
    fn decision_serializes_with_tag() {
        let d = Decision::RelativeRequired {
            replacement: "../UserCard/UserCard".to_string(),
        };
        let v = serde_json::to_value(&d).expect("serialize");
        assert_eq!(
            v,
            serde_json::json!({
                "decision": "relative_required",
                "replacement": "../UserCard/UserCard"
            })
        );
    }

    #[test]
    fn export_missing_carries_surface() {
        let d = Decision::PublicApiViolation {
            kind: PublicApiKind::ExportMissing {
                export: "UserCard".to_string(),
                surface: "entities/User".to_string(),
            },
            same_slice: false,
            replacement: None,
        };
        assert_eq!(
            d.message(),
            "'UserCard' is not exported from the public API of 'entities/User'."
        );
        let v = serde_json::to_value(&d).expect("serialize");
        assert!(v.get("same_slice").is_none());
        assert_eq!(v["kind"]["export_missing"]["export"], "UserCard");
    }
}
