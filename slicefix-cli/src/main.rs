mod config;
mod explain;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use config::{CheckOverrides, ConfigMerger};
use fs_err as fs;
use slicefix_domain::{FsSurfaceReader, PolicyEngine};
use slicefix_edit::{
    ApplyOptions, EditError, PolicyBlockError, apply_fixes, attach_file_hashes, ensure_not_blocked,
};
use slicefix_render::{render_apply_md, render_report_md};
use slicefix_types::report::{RunInfo, SlicefixReport, ToolInfo};
use slicefix_types::{Layer, RuleId};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "slicefix",
    version,
    about = "Import-path policy checks and fixes for feature-sliced source trees."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check import occurrences and write a report.
    Check(CheckArgs),
    /// Apply the fixes of an existing report (default: dry-run).
    Fix(FixArgs),
    /// Explain what a rule checks and how to resolve its findings.
    Explain(ExplainArgs),
    /// List all rules.
    ListRules(ListRulesArgs),
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Project root holding slicefix.toml (default: current directory).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Occurrence document, or directory of `*.imports.json` (default: <repo_root>/artifacts/imports).
    #[arg(long)]
    input: Option<Utf8PathBuf>,

    /// Output directory for slicefix artifacts (default: <repo_root>/artifacts/slicefix).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Alias prefix stripped from specifiers (overrides config).
    #[arg(long)]
    alias: Option<String>,

    /// Directory name marking the source root (overrides config).
    #[arg(long)]
    source_dir: Option<String>,

    /// Additional ignore pattern.
    #[arg(long = "ignore")]
    ignore: Vec<String>,

    /// Additional test file pattern.
    #[arg(long = "test-files")]
    test_files: Vec<String>,

    /// Disable a rule (relative-path, layer-imports, public-api-imports).
    #[arg(long, value_parser = parse_rule_id)]
    disable: Vec<RuleId>,

    /// Allow cross-slice imports within this layer (features, widgets, pages, app).
    #[arg(long)]
    allow_self_import: Vec<Layer>,

    /// Exit with code 1 when the report has findings.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    deny_findings: bool,
}

#[derive(Debug, Parser)]
struct FixArgs {
    /// Project root the report's file paths are relative to (default: current directory).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Directory containing report.json (default: <repo_root>/artifacts/slicefix).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Write changes to disk. If omitted, runs a dry-run and only emits artifacts.
    #[arg(long, default_value_t = false)]
    apply: bool,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Rule to explain (e.g., "relative-path", "layer-imports", "public-api").
    rule: String,
}

#[derive(Debug, Parser)]
struct ListRulesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_rule_id(s: &str) -> Result<RuleId, String> {
    RuleId::from_key(s).ok_or_else(|| {
        let known: Vec<&str> = RuleId::ALL.iter().map(|r| r.as_str()).collect();
        format!("unknown rule '{}' (expected one of: {})", s, known.join(", "))
    })
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Policy blocks exit with 2, everything else with 1.
fn exit_code_for(e: &anyhow::Error) -> u8 {
    if let Some(edit) = e.downcast_ref::<EditError>() {
        edit.exit_code()
    } else if e.downcast_ref::<PolicyBlockError>().is_some() {
        2
    } else {
        1
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Fix(args) => cmd_fix(args),
        Command::Explain(args) => cmd_explain(args).map(|()| ExitCode::SUCCESS),
        Command::ListRules(args) => cmd_list_rules(args).map(|()| ExitCode::SUCCESS),
    }
}

fn default_out_dir(repo_root: &Utf8Path) -> Utf8PathBuf {
    repo_root.join("artifacts").join("slicefix")
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let repo_root = args.repo_root;
    let input = args
        .input
        .unwrap_or_else(|| repo_root.join("artifacts").join("imports"));
    let out_dir = args.out_dir.unwrap_or_else(|| default_out_dir(&repo_root));

    fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir))?;

    let file_config = config::load_or_default(&repo_root).context("load slicefix.toml config")?;
    let overrides = CheckOverrides {
        alias: args.alias,
        source_dir: args.source_dir,
        ignore: args.ignore,
        test_files: args.test_files,
        disable: args.disable,
        allow_self_import: args.allow_self_import,
    };
    let engine_config = ConfigMerger::new(file_config)
        .merge_check_args(&overrides)
        .context("merge configuration")?;
    debug!(config = ?engine_config, "merged config");

    let inputs = slicefix_occurrences::load_occurrences(&input)
        .with_context(|| format!("load occurrences from {}", input))?;
    for failed in inputs.iter().filter(|i| i.document.is_err()) {
        if let Err(err) = &failed.document {
            warn!(path = %failed.path, error = %err, "skipping unreadable occurrence document");
        }
    }

    let reader = FsSurfaceReader::with_root(repo_root.clone());
    let engine = PolicyEngine::new(engine_config, &reader).context("compile file patterns")?;

    let started_at = Utc::now();
    let mut report = engine.report(&inputs, tool_info());
    report.run = RunInfo {
        started_at: Some(started_at),
        ended_at: Some(Utc::now()),
    };
    attach_file_hashes(&repo_root, &mut report);

    write_json(&out_dir.join("report.json"), &report)?;
    fs::write(out_dir.join("report.md"), render_report_md(&report))?;
    info!("wrote report to {}", out_dir);

    println!(
        "slicefix: {} finding(s), {} fixable, in {} import(s) from {} document(s)",
        report.summary.findings,
        report.summary.fixable,
        report.summary.occurrences,
        report.inputs.len()
    );

    if args.deny_findings && !report.findings.is_empty() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn cmd_fix(args: FixArgs) -> anyhow::Result<ExitCode> {
    let repo_root = args.repo_root;
    let out_dir = args.out_dir.unwrap_or_else(|| default_out_dir(&repo_root));

    let report_path = out_dir.join("report.json");
    let report_str =
        fs::read_to_string(&report_path).with_context(|| format!("read {}", report_path))?;
    let report: SlicefixReport =
        serde_json::from_str(&report_str).context("parse report.json")?;
    if report.schema != slicefix_types::schema::SLICEFIX_REPORT_V1 {
        anyhow::bail!(
            "unsupported report schema '{}' in {}",
            report.schema,
            report_path
        );
    }

    let opts = ApplyOptions {
        dry_run: !args.apply,
    };
    let (apply, patch) =
        apply_fixes(&repo_root, &report, tool_info(), &opts).context("apply fixes")?;

    write_json(&out_dir.join("apply.json"), &apply)?;
    fs::write(out_dir.join("apply.md"), render_apply_md(&apply))?;
    fs::write(out_dir.join("patch.diff"), &patch)?;
    info!("wrote apply artifacts to {}", out_dir);

    if opts.dry_run {
        println!(
            "slicefix: dry-run, {} fix(es) ready; re-run with --apply to write them",
            apply.summary.attempted
        );
    } else {
        println!(
            "slicefix: applied {} fix(es) in {} file(s)",
            apply.summary.applied, apply.summary.files_modified
        );
    }

    ensure_not_blocked(&apply).map_err(EditError::from)?;
    Ok(ExitCode::SUCCESS)
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "slicefix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    use explain::{fixable_label, list_rule_keys, lookup_rule};

    let Some(rule) = lookup_rule(&args.rule) else {
        let available = list_rule_keys().join(", ");
        anyhow::bail!(
            "Unknown rule: '{}'\n\nAvailable rules: {}",
            args.rule,
            available
        );
    };

    println!("================================================================================");
    println!("RULE: {}", rule.title);
    println!("================================================================================");
    println!();
    println!("Id:       {}", rule.rule);
    println!("Fixable:  {}", fixable_label(rule.fixable));
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.description);
    println!();

    println!("FINDING CODES");
    println!("--------------------------------------------------------------------------------");
    for (code, meaning) in rule.codes {
        println!("  - {:<26} {}", code, meaning);
    }
    println!();

    println!("RATIONALE");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.rationale);
    println!();

    println!("REMEDIATION GUIDANCE");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.remediation);
    println!();

    Ok(())
}

fn cmd_list_rules(args: ListRulesArgs) -> anyhow::Result<()> {
    use explain::{RULE_REGISTRY, fixable_label};

    match args.format {
        OutputFormat::Text => {
            println!("Available rules:\n");
            println!("  {:<20} {:<8} TITLE", "ID", "FIXABLE");
            println!("  {:<20} {:<8} -----", "--", "-------");
            for rule in RULE_REGISTRY {
                println!(
                    "  {:<20} {:<8} {}",
                    rule.rule.as_str(),
                    fixable_label(rule.fixable),
                    rule.title
                );
            }
            println!();
            println!("Use 'slicefix explain <rule>' for details.");
        }
        OutputFormat::Json => {
            let rules: Vec<_> = slicefix_domain::builtin_rule_metas()
                .into_iter()
                .map(|m| {
                    serde_json::json!({
                        "id": m.id,
                        "fixable": m.fixable,
                        "description": m.description,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
    }
    Ok(())
}
