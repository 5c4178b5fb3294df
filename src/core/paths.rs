//! Path normalization used when validating mirror roots.

use std::env;
use std::path::{Component, Path, PathBuf};

/// Resolve `path` to an absolute path.
///
/// Existing paths go through `fs::canonicalize` so symlinked roots compare
/// equal to their targets. Anything else is joined onto the current directory
/// and `.`/`..` are folded lexically.
pub fn resolve_absolute_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    let joined = match env::current_dir() {
        Ok(cwd) if path.is_relative() => cwd.join(path),
        _ => path.to_path_buf(),
    };
    fold_components(&joined)
}

/// True when `a` and `b` are the same directory or one contains the other.
pub fn paths_overlap(a: &Path, b: &Path) -> bool {
    let a = resolve_absolute_path(a);
    let b = resolve_absolute_path(b);
    a.starts_with(&b) || b.starts_with(&a)
}

fn fold_components(path: &Path) -> PathBuf {
    let mut folded: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(folded.last(), Some(Component::Normal(_))) {
                    folded.pop();
                }
            }
            other => folded.push(other),
        }
    }
    folded.into_iter().collect()
}
