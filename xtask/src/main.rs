use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use slicefix_types::OccurrenceDocument;
use std::path::Path;
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by slicefix.
    PrintSchemas,
    /// Create an occurrence input directory with an empty placeholder document.
    InitOccurrences {
        #[arg(long, default_value = "artifacts/imports")]
        dir: String,
    },
    /// Bless golden fixtures (overwrite expected reports).
    BlessFixtures,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", slicefix_types::schema::SLICEFIX_OCCURRENCES_V1);
            println!("{}", slicefix_types::schema::SLICEFIX_REPORT_V1);
            println!("{}", slicefix_types::schema::SLICEFIX_APPLY_V1);
        }
        Command::InitOccurrences { dir } => {
            fs::create_dir_all(&dir).with_context(|| format!("create {dir}"))?;
            let placeholder = Path::new(&dir).join("placeholder.imports.json");
            if placeholder.exists() {
                println!("{} already exists", placeholder.display());
            } else {
                let doc = OccurrenceDocument {
                    producer: Some("xtask".to_string()),
                    ..OccurrenceDocument::default()
                };
                let json = serde_json::to_string_pretty(&doc).context("serialize placeholder")?;
                fs::write(&placeholder, json)?;
                println!("initialized {}", placeholder.display());
            }
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "slicefix-domain", "--test", "golden_fixtures"])
                .env("SLICEFIX_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
    }
    Ok(())
}
