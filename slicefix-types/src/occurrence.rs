use serde::{Deserialize, Serialize};

/// A document of import occurrences handed over by the host's tree walker.
///
/// Tolerant by construction: unknown fields are ignored and everything but the occurrence
/// list has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccurrenceDocument {
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Name of the host tool that produced the document, if it says.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,

    #[serde(default)]
    pub occurrences: Vec<ImportOccurrence>,
}

fn default_schema() -> String {
    crate::schema::SLICEFIX_OCCURRENCES_V1.to_string()
}

impl Default for OccurrenceDocument {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            producer: None,
            occurrences: vec![],
        }
    }
}

/// One import statement as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOccurrence {
    /// Path of the importing file, OS-native separators allowed.
    pub file: String,

    /// The specifier as written in source, before alias stripping.
    pub specifier: String,

    /// Named imports (`import { A, B } from ...`). Empty for default, namespace and
    /// side-effect imports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,

    /// Byte range of the specifier text in `file`, quotes excluded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
}

impl ImportOccurrence {
    pub fn new(file: impl Into<String>, specifier: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            specifier: specifier.into(),
            names: vec![],
            span: None,
            line: None,
        }
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_span(mut self, start: u64, end: u64) -> Self {
        self.span = Some(Span { start, end });
        self
    }

    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }
}

/// Half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}
