//! Edit engine for slicefix reports.
//!
//! Responsibilities:
//! - Record the SHA-256 of every file a report wants to touch.
//! - Substitute replacement specifiers at their spans (in memory or on disk).
//! - Generate a unified diff preview.

mod error;

pub use error::{EditError, EditResult, PolicyBlockError};

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use diffy::PatchFormatter;
use fs_err as fs;
use sha2::{Digest, Sha256};
use slicefix_types::apply::{ApplyReport, ApplyResult, ApplyStatus, ApplySummary};
use slicefix_types::report::{Finding, SlicefixReport, ToolInfo};
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Compute results and the patch without writing any file.
    pub dry_run: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self { dry_run: true }
    }
}

/// Records the current SHA-256 of every file that has an applicable finding.
///
/// Files that cannot be read get no hash; their fixes are then guarded by the span check alone.
pub fn attach_file_hashes(repo_root: &Utf8Path, report: &mut SlicefixReport) {
    let mut hashes = BTreeMap::new();
    for finding in report.findings.iter().filter(|f| f.is_applicable()) {
        if hashes.contains_key(&finding.file) {
            continue;
        }
        let abs = abs_path(repo_root, Utf8Path::new(&finding.file));
        match fs::read(&abs) {
            Ok(bytes) => {
                hashes.insert(finding.file.clone(), sha256_hex(&bytes));
            }
            Err(err) => debug!(path = %abs, error = %err, "no hash for unreadable file"),
        }
    }
    report.file_hashes = hashes;
}

fn abs_path(repo_root: &Utf8Path, rel: &Utf8Path) -> Utf8PathBuf {
    if rel.is_absolute() {
        rel.to_path_buf()
    } else {
        repo_root.join(rel)
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

pub fn preview_patch(repo_root: &Utf8Path, report: &SlicefixReport) -> anyhow::Result<String> {
    let outcome = execute_report(repo_root, report, &ApplyOptions { dry_run: true })?;
    Ok(render_patch(&outcome.before, &outcome.after))
}

/// Apply every applicable finding of a report.
///
/// When `opts.dry_run` is true no file is written, but results and a patch are still produced.
/// Files whose preconditions fail are left alone and their results are `Blocked`; use
/// [`ensure_not_blocked`] to turn that into a policy error.
pub fn apply_fixes(
    repo_root: &Utf8Path,
    report: &SlicefixReport,
    tool: ToolInfo,
    opts: &ApplyOptions,
) -> EditResult<(ApplyReport, String)> {
    let outcome = execute_report(repo_root, report, opts)?;
    let patch = render_patch(&outcome.before, &outcome.after);

    let mut files_modified = 0u64;
    for (path, new_contents) in &outcome.after {
        let old = outcome.before.get(path).map(String::as_str).unwrap_or_default();
        if old == new_contents {
            continue;
        }
        files_modified += 1;
        if !opts.dry_run {
            let abs = abs_path(repo_root, path);
            fs::write(&abs, new_contents).with_context(|| format!("write {}", abs))?;
            info!(path = %abs, "rewrote import specifiers");
        }
    }

    let mut apply = ApplyReport::new(tool);
    apply.applied = !opts.dry_run;
    apply.summary = outcome.summary;
    apply.summary.files_modified = if opts.dry_run { 0 } else { files_modified };
    apply.results = outcome.results;
    apply.errors = outcome.errors;
    apply.ended_at = Some(Utc::now());

    Ok((apply, patch))
}

/// Fails with a policy block when any fix was blocked by a precondition.
pub fn ensure_not_blocked(apply: &ApplyReport) -> Result<(), PolicyBlockError> {
    if apply.summary.blocked == 0 {
        return Ok(());
    }
    let mut files: Vec<&str> = apply
        .results
        .iter()
        .filter(|r| r.status == ApplyStatus::Blocked)
        .map(|r| r.file.as_str())
        .collect();
    files.dedup();
    Err(PolicyBlockError::PreconditionMismatch {
        message: format!(
            "{} fix(es) blocked in {}",
            apply.summary.blocked,
            files.join(", ")
        ),
    })
}

struct ExecuteOutcome {
    before: BTreeMap<Utf8PathBuf, String>,
    after: BTreeMap<Utf8PathBuf, String>,
    results: Vec<ApplyResult>,
    summary: ApplySummary,
    errors: Vec<String>,
}

fn execute_report(
    repo_root: &Utf8Path,
    report: &SlicefixReport,
    opts: &ApplyOptions,
) -> anyhow::Result<ExecuteOutcome> {
    let mut by_file: BTreeMap<&str, Vec<&Finding>> = BTreeMap::new();
    for f in report.findings.iter().filter(|f| f.is_applicable()) {
        by_file.entry(f.file.as_str()).or_default().push(f);
    }

    let mut outcome = ExecuteOutcome {
        before: BTreeMap::new(),
        after: BTreeMap::new(),
        results: Vec::new(),
        summary: ApplySummary::default(),
        errors: Vec::new(),
    };

    for (file, mut findings) in by_file {
        findings.sort_by(|a, b| (span_start(a), &a.id).cmp(&(span_start(b), &b.id)));
        let path = Utf8PathBuf::from(file);
        let abs = abs_path(repo_root, &path);

        let contents = match fs::read_to_string(&abs) {
            Ok(c) => c,
            Err(err) => {
                outcome.errors.push(format!("read {}: {}", abs, err));
                for f in findings {
                    outcome.summary.failed += 1;
                    outcome.results.push(result(f, ApplyStatus::Failed, "file unreadable"));
                }
                continue;
            }
        };

        if let Some(reason) = file_precondition_failure(report, file, &contents, &findings) {
            debug!(file, reason = %reason, "precondition failed");
            for f in findings {
                outcome.summary.blocked += 1;
                outcome.results.push(result(f, ApplyStatus::Blocked, &reason));
            }
            continue;
        }

        // Accept non-overlapping spans in source order, then splice back to front.
        let mut accepted: Vec<&Finding> = Vec::new();
        for f in findings {
            let overlaps = accepted.last().is_some_and(|prev| match (prev.span, f.span) {
                (Some(a), Some(b)) => a.overlaps(&b),
                _ => false,
            });
            if overlaps {
                outcome.summary.skipped += 1;
                outcome
                    .results
                    .push(result(f, ApplyStatus::Skipped, "overlaps an earlier fix"));
            } else {
                accepted.push(f);
            }
        }

        let mut updated = contents.clone();
        for f in accepted.iter().rev() {
            if let (Some(span), Some(replacement)) = (f.span, f.replacement()) {
                updated.replace_range(span.start as usize..span.end as usize, replacement);
            }
        }

        for f in accepted {
            outcome.summary.attempted += 1;
            if opts.dry_run {
                outcome.summary.skipped += 1;
                outcome
                    .results
                    .push(result(f, ApplyStatus::Skipped, "dry-run: not written"));
            } else {
                outcome.summary.applied += 1;
                let mut r = result(f, ApplyStatus::Applied, "");
                r.message = None;
                outcome.results.push(r);
            }
        }

        outcome.before.insert(path.clone(), contents);
        outcome.after.insert(path, updated);
    }

    Ok(outcome)
}

fn span_start(f: &Finding) -> u64 {
    f.span.map(|s| s.start).unwrap_or(0)
}

/// The reason every fix in `file` must be withheld, if any.
fn file_precondition_failure(
    report: &SlicefixReport,
    file: &str,
    contents: &str,
    findings: &[&Finding],
) -> Option<String> {
    if let Some(expected) = report.file_hashes.get(file) {
        let actual = sha256_hex(contents.as_bytes());
        if &actual != expected {
            return Some(format!("sha mismatch: expected {expected}, got {actual}"));
        }
    }

    for f in findings {
        let Some(span) = f.span else { continue };
        let range = span.start as usize..span.end as usize;
        if contents.get(range) != Some(f.specifier.as_str()) {
            return Some(format!(
                "span {}..{} no longer holds '{}'",
                span.start, span.end, f.specifier
            ));
        }
    }
    None
}

fn result(f: &Finding, status: ApplyStatus, message: &str) -> ApplyResult {
    ApplyResult {
        finding_id: f.id.clone(),
        file: f.file.clone(),
        status,
        message: Some(message.to_string()),
        before: Some(f.specifier.clone()),
        after: f.replacement().map(str::to_string),
    }
}

fn render_patch(
    before: &BTreeMap<Utf8PathBuf, String>,
    after: &BTreeMap<Utf8PathBuf, String>,
) -> String {
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    for (path, old) in before {
        let new = after.get(path).unwrap_or(old);
        if old == new {
            continue;
        }

        let display = path.as_str().trim_start_matches('/');
        out.push_str(&format!("diff --git a/{0} b/{0}\n", display));
        out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", display));

        let patch = diffy::create_patch(old, new);
        out.push_str(&formatter.fmt_patch(&patch).to_string());
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn patch_skips_unchanged_files() {
        let mut before = BTreeMap::new();
        let mut after = BTreeMap::new();
        before.insert(Utf8PathBuf::from("src/a.ts"), "same\n".to_string());
        after.insert(Utf8PathBuf::from("src/a.ts"), "same\n".to_string());
        before.insert(Utf8PathBuf::from("src/b.ts"), "import x from 'a';\n".to_string());
        after.insert(Utf8PathBuf::from("src/b.ts"), "import x from './a';\n".to_string());

        let patch = render_patch(&before, &after);
        assert!(!patch.contains("src/a.ts"));
        assert!(patch.contains("diff --git a/src/b.ts b/src/b.ts"));
        assert!(patch.contains("-import x from 'a';"));
        assert!(patch.contains("+import x from './a';"));
    }

    #[test]
    fn default_options_are_dry_run() {
        assert!(ApplyOptions::default().dry_run);
    }
}
