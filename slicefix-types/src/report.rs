use crate::decision::{Decision, RuleId};
use crate::occurrence::Span;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output of a `slicefix check` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlicefixReport {
    pub schema: String,
    pub tool: ToolInfo,

    #[serde(default)]
    pub run: RunInfo,

    #[serde(default)]
    pub inputs: Vec<InputRef>,

    #[serde(default)]
    pub summary: ReportSummary,

    #[serde(default)]
    pub findings: Vec<Finding>,

    /// SHA-256 of every file that has at least one applicable fix, as read at check time.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub file_hashes: BTreeMap<String, String>,
}

impl SlicefixReport {
    pub fn new(tool: ToolInfo) -> Self {
        Self {
            schema: crate::schema::SLICEFIX_REPORT_V1.to_string(),
            tool,
            run: RunInfo::default(),
            inputs: vec![],
            summary: ReportSummary::default(),
            findings: vec![],
            file_hashes: BTreeMap::new(),
        }
    }

    pub fn status(&self) -> ReportStatus {
        if self.findings.is_empty() {
            ReportStatus::Pass
        } else {
            ReportStatus::Fail
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// An occurrence document that fed the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRef {
    pub path: String,

    #[serde(default)]
    pub occurrences: u64,

    /// Load failure, if the document could not be read or parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub occurrences: u64,
    pub findings: u64,

    /// Findings that carry a replacement and a span, i.e. that `slicefix fix` can apply.
    pub fixable: u64,

    #[serde(default)]
    pub by_rule: BTreeMap<RuleId, u64>,
}

/// A violation as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Deterministic id: identical inputs produce identical ids.
    pub id: String,
    pub rule: RuleId,
    pub code: String,
    pub message: String,
    pub file: String,
    pub specifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,

    pub decision: Decision,
}

impl Finding {
    pub fn replacement(&self) -> Option<&str> {
        self.decision.replacement()
    }

    pub fn is_applicable(&self) -> bool {
        self.span.is_some() && self.replacement().is_some()
    }
}
