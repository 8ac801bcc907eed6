//! Rule explanations for the `slicefix explain` command.

use slicefix_types::RuleId;

/// Information about one slicefix rule.
#[derive(Debug, Clone)]
pub struct RuleExplanation {
    pub rule: RuleId,
    /// Shorter spellings accepted by `explain` (e.g. "public-api").
    pub aliases: &'static [&'static str],
    pub title: &'static str,
    /// Whether findings of this rule can carry a replacement specifier.
    pub fixable: bool,
    pub description: &'static str,
    pub rationale: &'static str,
    pub remediation: &'static str,
    /// Finding codes this rule emits, with a one-line meaning each.
    pub codes: &'static [(&'static str, &'static str)],
}

pub static RULE_REGISTRY: &[RuleExplanation] = &[
    RuleExplanation {
        rule: RuleId::RelativePath,
        aliases: &["relative"],
        title: "Relative Imports Within a Slice",
        fixable: true,
        description: r#"Flags absolute imports (optionally through the configured alias) whose target
lives in the same layer and slice as the importing file.

Example, in src/entities/User/ui/UserCardHeader/UserCardHeader.ts:

    import { UserCard } from '@/entities/User/ui/UserCard/UserCard';

is rewritten to:

    import { UserCard } from '../UserCard/UserCard';"#,
        rationale: r#"A slice is a unit that moves, gets renamed and gets deleted as a whole.
Absolute self-references tie its internals to its current location, and
importing the slice's own public API from inside the slice invites cycles."#,
        remediation: r#"Run `slicefix fix --apply` to rewrite the specifier in place.

An import of the slice's own public API (e.g. `@/entities/User` from inside
entities/User) cannot be rewritten mechanically: import the concrete module
by relative path instead.

Files matching `ignore_files_patterns` are exempt from this rule."#,
        codes: &[
            ("relative_required", "same-slice import must be relative; fix attached"),
            ("same_slice_public_import", "same-slice import of the slice's own public API"),
        ],
    },
    RuleExplanation {
        rule: RuleId::LayerImports,
        aliases: &["layers", "layer"],
        title: "Layer Dependency Direction",
        fixable: false,
        description: r#"Checks that a layer only imports from the layers it is allowed to depend on:

    app      -> pages, widgets, features, entities, shared
    pages    -> widgets, features, entities, shared
    widgets  -> features, entities, shared
    features -> entities, shared
    entities -> entities, shared
    shared   -> shared

Same-layer imports between different slices of features, widgets, pages or app
are allowed only when enabled under `[layers]` in slicefix.toml."#,
        rationale: r#"Dependencies must point down the layer stack. An upward import makes a
lower layer depend on a consumer, which breaks isolation and eventually
produces cycles. Imports of third-party packages and paths outside the
source root are never checked."#,
        remediation: r#"Move the shared code down to a layer both sides may import, or invert the
dependency (pass data or callbacks in from the higher layer).

Specifiers matching `ignore_files_patterns` are exempt, which is the usual
escape hatch for app-level providers used by storybook decorators."#,
        codes: &[("layer_violation", "the target layer may not be imported from here")],
    },
    RuleExplanation {
        rule: RuleId::PublicApiImports,
        aliases: &["public-api", "public_api"],
        title: "Public API Imports",
        fixable: true,
        description: r#"Absolute imports into another slice of entities, features, widgets or pages
must stop at the slice's public API: `layer/slice` (index file) or, from test
files, `layer/slice/testing`.

When the import reaches deeper and the public API exports every imported name,
a fix to `layer/slice` (or `layer/slice/testing` from test files) is attached."#,
        rationale: r#"The index file is the contract of a slice. Deep imports couple consumers to
the slice's internal file layout and bypass whatever the slice chose to expose.
The testing surface holds mocks and fixtures that must not leak into
production code."#,
        remediation: r#"Run `slicefix fix --apply` for findings that carry a fix.

For `export_missing`, first re-export the name from the slice's index file
(e.g. `export { getUserAuthData } from './model/selectors/getUserAuthData';`),
then re-run `slicefix check`; the deep import then becomes fixable.

Test files are recognised by `test_files_patterns`."#,
        codes: &[
            ("must_use_public_api", "import reaches past layer/slice"),
            ("testing_api_restricted", "testing API imported from a non-test file"),
            ("export_missing", "a named import is exported by neither public surface"),
        ],
    },
];

/// Look up a rule explanation by id (e.g. "layer-imports") or alias.
pub fn lookup_rule(query: &str) -> Option<&'static RuleExplanation> {
    let normalized = query.trim().to_lowercase().replace('_', "-");

    RULE_REGISTRY.iter().find(|r| {
        r.rule.as_str() == normalized
            || r
                .aliases
                .iter()
                .any(|a| a.replace('_', "-") == normalized)
    })
}

pub fn list_rule_keys() -> Vec<&'static str> {
    RULE_REGISTRY.iter().map(|r| r.rule.as_str()).collect()
}

pub fn fixable_label(fixable: bool) -> &'static str {
    if fixable { "yes" } else { "no" }
}
