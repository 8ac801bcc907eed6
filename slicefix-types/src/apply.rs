use crate::report::ToolInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output of a `slicefix fix` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyReport {
    pub schema: String,
    pub tool: ToolInfo,

    /// False for dry runs.
    pub applied: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub results: Vec<ApplyResult>,

    pub summary: ApplySummary,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ApplyReport {
    pub fn new(tool: ToolInfo) -> Self {
        Self {
            schema: crate::schema::SLICEFIX_APPLY_V1.to_string(),
            tool,
            applied: false,
            ended_at: None,
            results: vec![],
            summary: ApplySummary::default(),
            errors: vec![],
        }
    }
}

/// What happened to one finding's replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    pub finding_id: String,
    pub file: String,
    pub status: ApplyStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyStatus {
    Applied,
    Blocked,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    pub attempted: u64,
    pub applied: u64,
    pub blocked: u64,
    pub failed: u64,
    pub skipped: u64,
    pub files_modified: u64,
}
