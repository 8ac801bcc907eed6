//! Rendering helpers (markdown) for human-readable artifacts.

use slicefix_types::apply::{ApplyReport, ApplyStatus};
use slicefix_types::report::{ReportStatus, SlicefixReport};

pub fn render_report_md(report: &SlicefixReport) -> String {
    let mut out = String::new();
    out.push_str("# slicefix report\n\n");
    out.push_str(&format!("- Status: `{}`\n", status_word(report.status())));
    out.push_str(&format!(
        "- Occurrences: {}\n- Findings: {} (fixable {})\n",
        report.summary.occurrences, report.summary.findings, report.summary.fixable
    ));
    out.push_str(&format!("- Inputs: {}\n", report.inputs.len()));
    for (rule, count) in &report.summary.by_rule {
        out.push_str(&format!("  - `{}`: {}\n", rule, count));
    }

    let broken: Vec<_> = report.inputs.iter().filter(|i| i.error.is_some()).collect();
    if !broken.is_empty() {
        out.push_str("\n## Unreadable inputs\n\n");
        for input in broken {
            out.push_str(&format!(
                "- `{}`: {}\n",
                input.path,
                input.error.as_deref().unwrap_or_default()
            ));
        }
    }

    out.push_str("\n## Findings\n\n");
    if report.findings.is_empty() {
        out.push_str("_No findings._\n");
        return out;
    }

    for (i, f) in report.findings.iter().enumerate() {
        let loc = match f.line {
            Some(line) => format!("{}:{}", f.file, line),
            None => f.file.clone(),
        };
        out.push_str(&format!("### {}. `{}` {}\n\n", i + 1, f.rule, f.code));
        out.push_str(&format!("- Location: `{}`\n", loc));
        out.push_str(&format!("- Import: `{}`\n", f.specifier));
        match f.replacement() {
            Some(replacement) if f.is_applicable() => {
                out.push_str(&format!("- Fix: `{}`\n", replacement));
            }
            Some(replacement) => {
                out.push_str(&format!("- Suggested: `{}` (no span, not auto-fixable)\n", replacement));
            }
            None => {}
        }
        out.push_str(&format!("\n{}\n\n", f.message));
    }

    out
}

pub fn render_apply_md(apply: &ApplyReport) -> String {
    let mut out = String::new();
    out.push_str("# slicefix apply\n\n");
    if !apply.applied {
        out.push_str("_Dry run: no files were written._\n\n");
    }
    out.push_str(&format!(
        "- Attempted: {}\n- Applied: {}\n- Blocked: {}\n- Failed: {}\n- Skipped: {}\n- Files modified: {}\n\n",
        apply.summary.attempted,
        apply.summary.applied,
        apply.summary.blocked,
        apply.summary.failed,
        apply.summary.skipped,
        apply.summary.files_modified
    ));

    if !apply.errors.is_empty() {
        out.push_str("## Errors\n\n");
        for e in &apply.errors {
            out.push_str(&format!("- {}\n", e));
        }
        out.push('\n');
    }

    out.push_str("## Results\n\n");
    if apply.results.is_empty() {
        out.push_str("_No results._\n");
        return out;
    }

    for (i, r) in apply.results.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n\n", i + 1, r.file));
        out.push_str(&format!("- Finding: `{}`\n", r.finding_id));
        out.push_str(&format!("- Status: `{}`\n", status_label(r.status)));
        if let (Some(before), Some(after)) = (&r.before, &r.after) {
            out.push_str(&format!("- Change: `{}` → `{}`\n", before, after));
        }
        if let Some(msg) = &r.message {
            out.push_str(&format!("- Message: {}\n", msg));
        }
        out.push('\n');
    }

    out
}

fn status_word(s: ReportStatus) -> &'static str {
    match s {
        ReportStatus::Pass => "pass",
        ReportStatus::Fail => "fail",
    }
}

fn status_label(s: ApplyStatus) -> &'static str {
    match s {
        ApplyStatus::Applied => "applied",
        ApplyStatus::Blocked => "blocked",
        ApplyStatus::Failed => "failed",
        ApplyStatus::Skipped => "skipped",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicefix_types::apply::{ApplyResult, ApplySummary};
    use slicefix_types::report::{Finding, InputRef, ToolInfo};
    use slicefix_types::{Decision, Layer, RuleId, Span};

    fn tool() -> ToolInfo {
        ToolInfo {
            name: "slicefix".to_string(),
            version: None,
        }
    }

    #[test]
    fn empty_report_passes() {
        let md = render_report_md(&SlicefixReport::new(tool()));
        assert!(md.contains("- Status: `pass`"));
        assert!(md.contains("_No findings._"));
    }

    #[test]
    fn findings_show_location_and_fix() {
        let mut report = SlicefixReport::new(tool());
        let relative = Decision::RelativeRequired {
            replacement: "../UserCard/UserCard".to_string(),
        };
        report.findings.push(Finding {
            id: "a".to_string(),
            rule: RuleId::RelativePath,
            code: relative.code().to_string(),
            message: relative.message(),
            file: "src/entities/User/ui/UserCardHeader/UserCardHeader.ts".to_string(),
            specifier: "@/entities/User/ui/UserCard/UserCard".to_string(),
            line: Some(1),
            span: Some(Span { start: 26, end: 62 }),
            decision: relative,
        });
        let layer = Decision::LayerViolation {
            from_layer: Layer::Shared,
            offending_layer: Layer::App,
        };
        report.findings.push(Finding {
            id: "b".to_string(),
            rule: RuleId::LayerImports,
            code: layer.code().to_string(),
            message: layer.message(),
            file: "src/shared/a.ts".to_string(),
            specifier: "@/app/providers".to_string(),
            line: None,
            span: None,
            decision: layer,
        });
        report.inputs.push(InputRef {
            path: "imports/bad.imports.json".to_string(),
            occurrences: 0,
            error: Some("json: expected value".to_string()),
        });

        let md = render_report_md(&report);
        assert!(md.contains("- Status: `fail`"));
        assert!(md.contains("### 1. `relative-path` relative_required"));
        assert!(md.contains("- Location: `src/entities/User/ui/UserCardHeader/UserCardHeader.ts:1`"));
        assert!(md.contains("- Fix: `../UserCard/UserCard`"));
        assert!(md.contains("- Location: `src/shared/a.ts`\n"));
        assert!(md.contains("You can't import layer 'app' inside 'shared' layer"));
        assert!(md.contains("## Unreadable inputs"));
    }

    #[test]
    fn dry_run_apply_is_labelled() {
        let mut apply = ApplyReport::new(tool());
        apply.summary = ApplySummary {
            attempted: 1,
            skipped: 1,
            ..ApplySummary::default()
        };
        apply.results.push(ApplyResult {
            finding_id: "a".to_string(),
            file: "src/x.ts".to_string(),
            status: ApplyStatus::Skipped,
            message: Some("dry-run: not written".to_string()),
            before: Some("@/entities/User/ui/A/A".to_string()),
            after: Some("../A/A".to_string()),
        });

        let md = render_apply_md(&apply);
        assert!(md.contains("_Dry run: no files were written._"));
        assert!(md.contains("- Status: `skipped`"));
        assert!(md.contains("- Change: `@/entities/User/ui/A/A` → `../A/A`"));
    }
}
