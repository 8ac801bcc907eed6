//! Public surfaces of a slice and the per-run cache of what they export.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use slicefix_types::Layer;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use crate::path::is_relative_specifier;
use crate::ports::PublicSurfaceReader;
use crate::reexports::ExportSet;

/// How deep `export * from` chains are followed.
pub const MAX_STAR_DEPTH: usize = 8;

const MODULE_CANDIDATE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Candidate file names for the two public surfaces, probed in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceFiles {
    pub index_files: Vec<String>,
    pub testing_files: Vec<String>,
}

impl Default for SurfaceFiles {
    fn default() -> Self {
        Self {
            index_files: ["index.ts", "index.tsx", "index.js", "index.jsx"]
                .map(String::from)
                .to_vec(),
            testing_files: ["testing.ts", "testing.tsx", "testing.js", "testing.jsx"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Where the public surfaces of one slice live, if they exist at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicSurfaceDescriptor {
    pub layer: Layer,
    pub slice: String,
    pub primary: Option<Utf8PathBuf>,
    pub testing: Option<Utf8PathBuf>,
}

impl PublicSurfaceDescriptor {
    /// `layer/slice`, the specifier of the primary surface.
    pub fn specifier(&self) -> String {
        format!("{}/{}", self.layer, self.slice)
    }
}

/// Resolved exports of both surfaces of one slice. `None` means the surface file is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliceSurfaces {
    pub primary: Option<BTreeSet<String>>,
    pub testing: Option<BTreeSet<String>>,
}

impl SliceSurfaces {
    pub fn primary_exports_all(&self, names: &[String]) -> bool {
        exports_all(self.primary.as_ref(), names)
    }

    pub fn testing_exports_all(&self, names: &[String]) -> bool {
        exports_all(self.testing.as_ref(), names)
    }

    /// Whether `name` is exported by either surface.
    pub fn exports_anywhere(&self, name: &str) -> bool {
        [self.primary.as_ref(), self.testing.as_ref()]
            .into_iter()
            .flatten()
            .any(|set| set.contains(name))
    }
}

fn exports_all(set: Option<&BTreeSet<String>>, names: &[String]) -> bool {
    set.is_some_and(|set| !names.is_empty() && names.iter().all(|n| set.contains(n)))
}

type CacheKey = (Utf8PathBuf, Layer, String);

/// Locates public surfaces and caches their resolved exports per (source root, layer, slice).
///
/// One probe lives exactly as long as the engine that owns it, so cached results never
/// outlive a run.
#[derive(Debug, Default)]
pub struct SurfaceProbe {
    files: SurfaceFiles,
    cache: Mutex<HashMap<CacheKey, Arc<SliceSurfaces>>>,
}

impl SurfaceProbe {
    pub fn new(files: SurfaceFiles) -> Self {
        Self {
            files,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn describe(
        &self,
        reader: &dyn PublicSurfaceReader,
        source_root: &Utf8Path,
        layer: Layer,
        slice: &str,
    ) -> PublicSurfaceDescriptor {
        let dir = source_root.join(layer.as_str()).join(slice);
        let first_existing = |names: &[String]| {
            names
                .iter()
                .map(|n| dir.join(n))
                .find(|p| reader.exists(p))
        };
        PublicSurfaceDescriptor {
            layer,
            slice: slice.to_string(),
            primary: first_existing(&self.files.index_files),
            testing: first_existing(&self.files.testing_files),
        }
    }

    pub fn surfaces(
        &self,
        reader: &dyn PublicSurfaceReader,
        source_root: &Utf8Path,
        layer: Layer,
        slice: &str,
    ) -> Arc<SliceSurfaces> {
        let key = (source_root.to_path_buf(), layer, slice.to_string());
        if let Some(hit) = self.lock().get(&key) {
            tracing::debug!(layer = %layer, slice, "surface cache hit");
            return Arc::clone(hit);
        }

        let descriptor = self.describe(reader, source_root, layer, slice);
        let resolved = Arc::new(SliceSurfaces {
            primary: descriptor
                .primary
                .as_deref()
                .map(|p| resolve_exports(reader, p)),
            testing: descriptor
                .testing
                .as_deref()
                .map(|p| resolve_exports(reader, p)),
        });

        Arc::clone(self.lock().entry(key).or_insert(resolved))
    }

    pub fn cached_slices(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Arc<SliceSurfaces>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exports of `entry` including everything reachable through relative `export * from`.
pub fn resolve_exports(reader: &dyn PublicSurfaceReader, entry: &Utf8Path) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut visited = BTreeSet::new();
    let mut queue = vec![(entry.to_path_buf(), 0usize)];

    while let Some((file, depth)) = queue.pop() {
        if !visited.insert(file.clone()) {
            continue;
        }
        let Some(ExportSet {
            names: found,
            star_sources,
        }) = reader.exports(&file)
        else {
            continue;
        };
        names.extend(found);

        if depth >= MAX_STAR_DEPTH {
            continue;
        }
        let dir = file.parent().unwrap_or(Utf8Path::new(""));
        for source in star_sources.iter().filter(|s| is_relative_specifier(s)) {
            if let Some(next) = locate_module(reader, &join_lexically(dir, source)) {
                queue.push((next, depth + 1));
            }
        }
    }
    names
}

/// `base`, `base.<ext>` or `base/index.<ext>`, whichever exists first.
fn locate_module(reader: &dyn PublicSurfaceReader, base: &Utf8Path) -> Option<Utf8PathBuf> {
    if base.extension().is_some() && reader.exists(base) {
        return Some(base.to_path_buf());
    }
    let with_ext = MODULE_CANDIDATE_EXTENSIONS
        .iter()
        .map(|ext| Utf8PathBuf::from(format!("{base}.{ext}")));
    let index = MODULE_CANDIDATE_EXTENSIONS
        .iter()
        .map(|ext| base.join(format!("index.{ext}")));
    with_ext.chain(index).find(|p| reader.exists(p))
}

fn join_lexically(dir: &Utf8Path, rel: &str) -> Utf8PathBuf {
    let rel = rel.replace('\\', "/");
    let mut out = dir.to_path_buf();
    for component in Utf8Path::new(&rel).components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MemorySurfaceReader;
    use pretty_assertions::assert_eq;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_existing_candidate_wins() {
        let reader = MemorySurfaceReader::new()
            .with_file("/p/src/entities/User/index.tsx", "export const A = 1;")
            .with_file("/p/src/entities/User/index.js", "export const B = 1;");
        let probe = SurfaceProbe::default();
        let d = probe.describe(&reader, Utf8Path::new("/p/src"), Layer::Entities, "User");
        assert_eq!(
            d.primary.as_deref(),
            Some(Utf8Path::new("/p/src/entities/User/index.tsx"))
        );
        assert_eq!(d.testing, None);
        assert_eq!(d.specifier(), "entities/User");
    }

    #[test]
    fn star_exports_are_followed() {
        let reader = MemorySurfaceReader::new()
            .with_file(
                "/p/src/entities/User/index.ts",
                "export * from './model'; export { UserCard } from './ui/UserCard';",
            )
            .with_file(
                "/p/src/entities/User/model/index.ts",
                "export * from '../lib/helpers'; export type { User } from './types';",
            )
            .with_file(
                "/p/src/entities/User/lib/helpers.ts",
                "export function formatUser() {}",
            );
        let names = resolve_exports(&reader, Utf8Path::new("/p/src/entities/User/index.ts"));
        assert_eq!(names, set(&["User", "UserCard", "formatUser"]));
    }

    #[test]
    fn star_cycles_terminate() {
        let reader = MemorySurfaceReader::new()
            .with_file("/p/a.ts", "export * from './b'; export const A = 1;")
            .with_file("/p/b.ts", "export * from './a'; export const B = 1;");
        assert_eq!(resolve_exports(&reader, Utf8Path::new("/p/a.ts")), set(&["A", "B"]));
    }

    #[test]
    fn star_depth_is_bounded() {
        let mut reader = MemorySurfaceReader::new();
        for i in 0..12 {
            reader.insert(
                format!("/p/m{i}.ts"),
                format!("export * from './m{}'; export const N{i} = 1;", i + 1),
            );
        }
        let names = resolve_exports(&reader, Utf8Path::new("/p/m0.ts"));
        assert!(names.contains("N8"));
        assert!(!names.contains("N9"));
    }

    #[test]
    fn package_star_sources_are_not_followed() {
        let reader = MemorySurfaceReader::new()
            .with_file("/p/index.ts", "export * from 'react';");
        assert!(resolve_exports(&reader, Utf8Path::new("/p/index.ts")).is_empty());
    }

    #[test]
    fn surfaces_are_cached_per_slice() {
        let reader = MemorySurfaceReader::new()
            .with_file("/p/src/entities/User/index.ts", "export const A = 1;")
            .with_file("/p/src/entities/User/testing.ts", "export const mockUser = {};");
        let probe = SurfaceProbe::default();
        let root = Utf8Path::new("/p/src");

        let first = probe.surfaces(&reader, root, Layer::Entities, "User");
        let second = probe.surfaces(&reader, root, Layer::Entities, "User");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(probe.cached_slices(), 1);

        assert!(first.primary_exports_all(&["A".to_string()]));
        assert!(first.testing_exports_all(&["mockUser".to_string()]));
        assert!(!first.primary_exports_all(&[]));
        assert!(first.exports_anywhere("mockUser"));
        assert!(!first.exports_anywhere("Missing"));
    }

    #[test]
    fn missing_surfaces_export_nothing() {
        let probe = SurfaceProbe::default();
        let s = probe.surfaces(
            &MemorySurfaceReader::new(),
            Utf8Path::new("/p/src"),
            Layer::Features,
            "Auth",
        );
        assert_eq!(*s, SliceSurfaces::default());
        assert!(!s.exports_anywhere("x"));
    }
}
