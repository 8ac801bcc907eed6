//! Computes the relative specifier that replaces a same-slice absolute import.

use crate::path::{SourcePath, is_relative_specifier};

/// Module extensions removed from the final segment of a rewritten specifier.
///
/// Anything else after the last dot is kept: stripping it would change the module the
/// specifier resolves to (`./styles.module` vs `./styles`).
pub const MODULE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts", "vue", "svelte",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct PathRewriter;

impl PathRewriter {
    /// Relative specifier from the directory of `from_file` to `target`.
    ///
    /// Both arguments are source-root-relative. Returns `target` unchanged when it already is a
    /// relative specifier, so applying a rewrite twice changes nothing.
    pub fn to_relative(from_file: &SourcePath, target: &SourcePath) -> String {
        let from_dir = from_file.parent();
        let from = from_dir.segments();
        let to = target.segments();

        let common = from
            .iter()
            .zip(to.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<String> = Vec::with_capacity(from.len() - common + to.len() - common);
        parts.extend(std::iter::repeat_n("..".to_string(), from.len() - common));
        parts.extend(to[common..].iter().cloned());

        if let Some(last) = parts.last_mut() {
            if last != ".." {
                *last = strip_module_extension(last).to_string();
            }
        }

        let joined = parts.join("/");
        if joined.is_empty() {
            ".".to_string()
        } else if joined == ".." || joined.starts_with("../") {
            joined
        } else {
            format!("./{joined}")
        }
    }

    /// Like [`PathRewriter::to_relative`], but takes the specifier as written.
    pub fn rewrite_specifier(from_file: &SourcePath, specifier: &str) -> String {
        if is_relative_specifier(specifier) {
            return specifier.to_string();
        }
        let target = SourcePath::new(specifier.split('/').filter(|s| !s.is_empty()));
        Self::to_relative(from_file, &target)
    }
}

fn strip_module_extension(segment: &str) -> &str {
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && MODULE_EXTENSIONS.contains(&ext) => stem,
        _ => segment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sp(s: &str) -> SourcePath {
        SourcePath::new(s.split('/'))
    }

    #[test]
    fn sibling_directory() {
        let from = sp("entities/User/ui/UserCardHeader/UserCardHeader.ts");
        let target = sp("entities/User/ui/UserCard/UserCard");
        assert_eq!(
            PathRewriter::to_relative(&from, &target),
            "../UserCard/UserCard"
        );
    }

    #[test]
    fn same_directory_gets_dot_slash() {
        let from = sp("entities/User/ui/UserCard.tsx");
        let target = sp("entities/User/ui/UserAvatar");
        assert_eq!(PathRewriter::to_relative(&from, &target), "./UserAvatar");
    }

    #[test]
    fn descending_into_subdirectory() {
        let from = sp("entities/User/index.ts");
        let target = sp("entities/User/model/selectors/getUser");
        assert_eq!(
            PathRewriter::to_relative(&from, &target),
            "./model/selectors/getUser"
        );
    }

    #[test]
    fn target_is_own_directory() {
        let from = sp("entities/User/ui/A.ts");
        let target = sp("entities/User/ui");
        assert_eq!(PathRewriter::to_relative(&from, &target), ".");
    }

    #[test]
    fn target_is_ancestor() {
        let from = sp("entities/User/ui/Card/Card.ts");
        let target = sp("entities/User/ui");
        assert_eq!(PathRewriter::to_relative(&from, &target), "..");
    }

    #[test]
    fn known_extensions_are_stripped() {
        let from = sp("features/Auth/ui/Form.tsx");
        assert_eq!(
            PathRewriter::to_relative(&from, &sp("features/Auth/model/slice.ts")),
            "../model/slice"
        );
        assert_eq!(
            PathRewriter::to_relative(&from, &sp("features/Auth/ui/Form.module.scss")),
            "./Form.module.scss"
        );
        assert_eq!(
            PathRewriter::to_relative(&from, &sp("features/Auth/ui/Form.module")),
            "./Form.module"
        );
    }

    #[test]
    fn dotfile_is_not_treated_as_extension() {
        let from = sp("shared/lib/a.ts");
        assert_eq!(
            PathRewriter::to_relative(&from, &sp("shared/lib/.ts")),
            "./.ts"
        );
    }

    #[test]
    fn relative_specifier_passes_through() {
        let from = sp("entities/User/ui/A.ts");
        assert_eq!(
            PathRewriter::rewrite_specifier(&from, "../model/types"),
            "../model/types"
        );
        assert_eq!(
            PathRewriter::rewrite_specifier(&from, "entities/User/model/types"),
            "../model/types"
        );
    }
}
