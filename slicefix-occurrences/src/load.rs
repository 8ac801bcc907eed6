use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use slicefix_types::OccurrenceDocument;
use thiserror::Error;
use tracing::{debug, warn};

/// File name suffix of occurrence documents inside an input directory.
pub const DOCUMENT_SUFFIX: &str = ".imports.json";

#[derive(Debug, Clone)]
pub struct LoadedOccurrences {
    pub path: Utf8PathBuf,
    pub document: Result<OccurrenceDocument, OccurrenceLoadError>,
}

impl LoadedOccurrences {
    pub fn occurrence_count(&self) -> usize {
        self.document.as_ref().map_or(0, |d| d.occurrences.len())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OccurrenceLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },
}

/// Parses one occurrence document.
pub fn parse_document(text: &str) -> Result<OccurrenceDocument, OccurrenceLoadError> {
    serde_json::from_str::<OccurrenceDocument>(text).map_err(|e| OccurrenceLoadError::Json {
        message: e.to_string(),
    })
}

fn load_one(path: Utf8PathBuf) -> LoadedOccurrences {
    let document = match fs::read_to_string(&path) {
        Ok(s) => parse_document(&s),
        Err(e) => Err(OccurrenceLoadError::Io {
            message: e.to_string(),
        }),
    };
    if let Err(err) = &document {
        warn!(path = %path, error = %err, "occurrence document not loaded");
    }
    LoadedOccurrences { path, document }
}

/// Loads `input` itself when it is a file, otherwise every `*.imports.json` directly inside it.
///
/// A missing directory yields no documents.
pub fn load_occurrences(input: &Utf8Path) -> anyhow::Result<Vec<LoadedOccurrences>> {
    if input.is_file() {
        return Ok(vec![load_one(input.to_path_buf())]);
    }

    let pattern = input.join(format!("*{DOCUMENT_SUFFIX}"));
    let pattern_str = pattern.as_str();
    debug!(pattern = %pattern_str, "scanning for occurrence documents");

    let mut out = Vec::new();
    for entry in glob(pattern_str).context("glob *.imports.json")? {
        let path = entry
            .map_err(|e| anyhow::anyhow!("glob error: {e}"))?
            .to_string_lossy()
            .to_string();
        out.push(load_one(Utf8PathBuf::from(path)));
    }

    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}
