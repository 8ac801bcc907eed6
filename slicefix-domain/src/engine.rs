use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use slicefix_occurrences::LoadedOccurrences;
use slicefix_types::report::{Finding, InputRef, ReportSummary, SlicefixReport, ToolInfo};
use slicefix_types::{Decision, ImportOccurrence, RuleId};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::layers::{LayerCatalog, SameLayerImports};
use crate::path::DEFAULT_SOURCE_DIR;
use crate::patterns::{PathMatcher, PatternError};
use crate::ports::PublicSurfaceReader;
use crate::rules::{self, PreparedOccurrence, Rule, RuleEnv};
use crate::surface::{SurfaceFiles, SurfaceProbe};

/// Per-rule enable switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleToggles {
    pub relative_path: bool,
    pub layer_imports: bool,
    pub public_api: bool,
}

impl Default for RuleToggles {
    fn default() -> Self {
        Self {
            relative_path: true,
            layer_imports: true,
            public_api: true,
        }
    }
}

impl RuleToggles {
    pub fn is_enabled(&self, rule: RuleId) -> bool {
        match rule {
            RuleId::RelativePath => self.relative_path,
            RuleId::LayerImports => self.layer_imports,
            RuleId::PublicApiImports => self.public_api,
        }
    }

    pub fn set(&mut self, rule: RuleId, enabled: bool) {
        match rule {
            RuleId::RelativePath => self.relative_path = enabled,
            RuleId::LayerImports => self.layer_imports = enabled,
            RuleId::PublicApiImports => self.public_api = enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Literal prefix stripped from specifiers, e.g. `@/`.
    pub alias: Option<String>,
    /// Directory name marking the source root.
    pub source_dir: String,
    pub ignore_files_patterns: Vec<String>,
    pub test_files_patterns: Vec<String>,
    pub rules: RuleToggles,
    pub layers: SameLayerImports,
    pub surfaces: SurfaceFiles,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alias: None,
            source_dir: DEFAULT_SOURCE_DIR.to_string(),
            ignore_files_patterns: vec![],
            test_files_patterns: vec![],
            rules: RuleToggles::default(),
            layers: SameLayerImports::default(),
            surfaces: SurfaceFiles::default(),
        }
    }
}

/// Evaluates import occurrences against the enabled rules.
///
/// The surface cache lives inside the engine, so build one engine per run.
pub struct PolicyEngine<'r> {
    config: EngineConfig,
    catalog: LayerCatalog,
    ignore: PathMatcher,
    test_files: PathMatcher,
    probe: SurfaceProbe,
    reader: &'r dyn PublicSurfaceReader,
    rules: Vec<Box<dyn Rule>>,
}

impl<'r> PolicyEngine<'r> {
    pub fn new(
        config: EngineConfig,
        reader: &'r dyn PublicSurfaceReader,
    ) -> Result<Self, PatternError> {
        let ignore = PathMatcher::new(&config.ignore_files_patterns)?;
        let test_files = PathMatcher::new(&config.test_files_patterns)?;
        let rules = rules::builtin_rules()
            .into_iter()
            .filter(|r| config.rules.is_enabled(r.meta().id))
            .collect();

        Ok(Self {
            catalog: LayerCatalog::new(config.layers),
            probe: SurfaceProbe::new(config.surfaces.clone()),
            config,
            ignore,
            test_files,
            reader,
            rules,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decisions for one occurrence; `[Decision::Allowed]` when no rule objects.
    pub fn evaluate(&self, occurrence: &ImportOccurrence) -> Vec<Decision> {
        let prepared = PreparedOccurrence::new(
            occurrence,
            self.config.alias.as_deref(),
            &self.config.source_dir,
        );
        let env = RuleEnv {
            catalog: &self.catalog,
            ignore: &self.ignore,
            test_files: &self.test_files,
            probe: &self.probe,
            reader: self.reader,
        };

        let decisions: Vec<Decision> = self
            .rules
            .iter()
            .flat_map(|rule| rule.evaluate(&prepared, &env))
            .collect();

        if decisions.is_empty() {
            vec![Decision::Allowed]
        } else {
            decisions
        }
    }

    /// Findings for every occurrence, deterministically ordered and identified.
    pub fn check(&self, occurrences: &[ImportOccurrence]) -> Vec<Finding> {
        let mut findings: Vec<Finding> = occurrences
            .par_iter()
            .flat_map_iter(|occ| {
                self.evaluate(occ)
                    .into_iter()
                    .filter(|d| !d.is_allowed())
                    .filter_map(move |d| to_finding(occ, d))
            })
            .collect();

        findings.sort_by(|a, b| finding_sort_key(a).cmp(&finding_sort_key(b)));
        tracing::debug!(
            occurrences = occurrences.len(),
            findings = findings.len(),
            cached_slices = self.probe.cached_slices(),
            "check complete"
        );
        findings
    }

    /// Checks every successfully loaded document and summarizes the result.
    pub fn report(&self, inputs: &[LoadedOccurrences], tool: ToolInfo) -> SlicefixReport {
        let mut report = SlicefixReport::new(tool);
        let mut occurrences: Vec<ImportOccurrence> = Vec::new();

        for input in inputs {
            match &input.document {
                Ok(doc) => {
                    report.inputs.push(InputRef {
                        path: input.path.to_string(),
                        occurrences: doc.occurrences.len() as u64,
                        error: None,
                    });
                    occurrences.extend(doc.occurrences.iter().cloned());
                }
                Err(err) => report.inputs.push(InputRef {
                    path: input.path.to_string(),
                    occurrences: 0,
                    error: Some(err.to_string()),
                }),
            }
        }

        report.findings = self.check(&occurrences);
        report.summary = summarize(occurrences.len(), &report.findings);
        report
    }
}

fn to_finding(occ: &ImportOccurrence, decision: Decision) -> Option<Finding> {
    let rule = decision.rule()?;
    let mut finding = Finding {
        id: String::new(),
        rule,
        code: decision.code().to_string(),
        message: decision.message(),
        file: occ.file.clone(),
        specifier: occ.specifier.clone(),
        line: occ.line,
        span: occ.span,
        decision,
    };
    finding.id = deterministic_finding_id(&finding).to_string();
    Some(finding)
}

fn finding_sort_key(f: &Finding) -> (&str, u64, u64, RuleId, &str, &str) {
    (
        f.file.as_str(),
        f.line.unwrap_or(0),
        f.span.map(|s| s.start).unwrap_or(0),
        f.rule,
        f.code.as_str(),
        f.message.as_str(),
    )
}

fn deterministic_finding_id(f: &Finding) -> Uuid {
    // v5(namespace, stable key): identical input yields the identical id.
    const NAMESPACE: Uuid = Uuid::from_bytes([
        0x9e, 0x31, 0x0c, 0x6a, 0x52, 0x7d, 0x4f, 0x18, 0xa4, 0x0b, 0x63, 0xd2, 0x8f, 0x11, 0x5c,
        0x07,
    ]);

    let span = f
        .span
        .map(|s| format!("{}:{}", s.start, s.end))
        .unwrap_or_default();
    let line = f.line.map(|l| l.to_string()).unwrap_or_default();
    let stable_key = format!(
        "{}|{}|{}|{}|{}|{}|{}",
        f.file, span, line, f.specifier, f.rule, f.code, f.message
    );
    Uuid::new_v5(&NAMESPACE, stable_key.as_bytes())
}

fn summarize(occurrences: usize, findings: &[Finding]) -> ReportSummary {
    let mut by_rule: BTreeMap<RuleId, u64> = BTreeMap::new();
    for f in findings {
        *by_rule.entry(f.rule).or_default() += 1;
    }
    ReportSummary {
        occurrences: occurrences as u64,
        findings: findings.len() as u64,
        fixable: findings.iter().filter(|f| f.is_applicable()).count() as u64,
        by_rule,
    }
}
