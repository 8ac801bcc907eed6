//! Path classification: file paths and import specifiers to source-root-relative segments.
//!
//! Nothing in here fails. A path that cannot be placed under the source root becomes an empty
//! [`SourcePath`], whose layer and slice are undefined, and every policy skips it.

use camino::Utf8PathBuf;
use slicefix_types::Layer;

/// Directory name that marks the source root when none is configured.
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Rewrites every OS-specific separator to `/`.
///
/// Must run before any splitting: a Windows path evaluated with `/` as the only separator
/// would otherwise stay a single segment and silently classify as "outside the source root".
pub fn normalize_separators(raw: &str) -> String {
    raw.replace('\\', "/")
}

/// Strips `alias` from the start of `specifier`.
///
/// Literal prefix match only: an alias occurring later in the specifier is left alone.
/// Returns the remaining specifier and whether the alias was present.
pub fn strip_alias<'a>(specifier: &'a str, alias: Option<&str>) -> (&'a str, bool) {
    match alias.filter(|a| !a.is_empty()) {
        Some(alias) => match specifier.strip_prefix(alias) {
            Some(rest) => (rest, true),
            None => (specifier, false),
        },
        None => (specifier, false),
    }
}

/// Location inside the source root, as ordered segments (`["entities", "User", "ui"]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourcePath {
    segments: Vec<String>,
}

impl SourcePath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment 0, when it names a recognized layer.
    pub fn layer(&self) -> Option<Layer> {
        self.segments.first()?.parse().ok()
    }

    /// Segment 1, when there is one.
    pub fn slice(&self) -> Option<&str> {
        self.segments.get(1).map(String::as_str)
    }

    /// `(layer, slice)` when both are defined.
    pub fn slice_key(&self) -> Option<(Layer, &str)> {
        Some((self.layer()?, self.slice()?))
    }

    /// Everything but the last segment.
    pub fn parent(&self) -> SourcePath {
        let keep = self.segments.len().saturating_sub(1);
        Self {
            segments: self.segments[..keep].to_vec(),
        }
    }

    /// Segments joined with `/`.
    pub fn to_specifier(&self) -> String {
        self.segments.join("/")
    }
}

/// A file path split at the source root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLocation {
    /// Directory up to and including the source root, `None` when the file is outside of it.
    pub source_root: Option<Utf8PathBuf>,
    pub path: SourcePath,
}

/// Places a file-system path under the source root.
///
/// Separators are normalized and `.`/`..` resolved lexically, then everything up to and
/// including the first segment equal to `source_dir` is dropped. No such segment yields an
/// empty [`SourcePath`].
///
/// A checkout below another `src` directory (`~/src/app/src/entities/...`) therefore starts at
/// the outer one and yields no layer; every rule then skips. Run with
/// `RUST_LOG=slicefix_domain=debug` to see these paths.
pub fn parse_file_path(raw: &str, source_dir: &str) -> FileLocation {
    let normalized = normalize_separators(raw);
    let absolute = normalized.starts_with('/');
    let segments = resolve_dots(&normalized);

    let Some(idx) = segments.iter().position(|s| s == source_dir) else {
        return FileLocation::default();
    };

    let mut root = segments[..=idx].join("/");
    if absolute {
        root.insert(0, '/');
    }

    let path = SourcePath::new(segments[idx + 1..].iter().cloned());
    if !path.is_empty() && path.layer().is_none() {
        tracing::debug!(
            file = raw,
            source_root = %root,
            first_segment = %path.segments()[0],
            "file is under the source root but not inside a layer"
        );
    }

    FileLocation {
        source_root: Some(Utf8PathBuf::from(root)),
        path,
    }
}

fn resolve_dots(normalized: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for seg in normalized.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            s => out.push(s.to_string()),
        }
    }
    out
}

/// `.` / `..` or anything starting with `./` or `../`.
pub fn is_relative_specifier(specifier: &str) -> bool {
    let s = normalize_separators(specifier);
    s == "." || s == ".." || s.starts_with("./") || s.starts_with("../")
}

/// An import specifier after alias substitution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportTarget {
    /// Written relative to the importing file; accepted as-is by every policy.
    Relative(String),
    /// Source-root-shaped specifier (`entities/User/ui`) or a package name.
    Absolute(SourcePath),
}

impl ImportTarget {
    /// Classifies an already alias-stripped specifier.
    pub fn parse(specifier: &str) -> Self {
        if is_relative_specifier(specifier) {
            return ImportTarget::Relative(specifier.to_string());
        }
        let normalized = normalize_separators(specifier);
        ImportTarget::Absolute(SourcePath::new(
            normalized.split('/').filter(|s| !s.is_empty()),
        ))
    }

    /// Strips `alias` and classifies.
    pub fn parse_with_alias(specifier: &str, alias: Option<&str>) -> Self {
        Self::parse(strip_alias(specifier, alias).0)
    }

    pub fn is_relative(&self) -> bool {
        matches!(self, ImportTarget::Relative(_))
    }

    pub fn as_absolute(&self) -> Option<&SourcePath> {
        match self {
            ImportTarget::Absolute(p) => Some(p),
            ImportTarget::Relative(_) => None,
        }
    }

    /// `layer/slice` or `layer/slice/testing`, with nothing further.
    pub fn is_public_surface_shaped(&self) -> bool {
        let Some(p) = self.as_absolute() else {
            return false;
        };
        match p.segments() {
            [_, _] => true,
            [_, _, last] => last == TESTING_SEGMENT,
            _ => false,
        }
    }
}

/// Segment naming a slice's testing surface.
pub const TESTING_SEGMENT: &str = "testing";
