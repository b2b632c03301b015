//! Path resolution for the different places an artifact path is used

use std::path::{Component, Path, PathBuf};

use tracing::debug;

/// Where a resolved artifact path is going to be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathContext {
    /// Handed to a viewer: canonical, symlinks resolved
    Interactive,
    /// Written into an exported document, relative to its directory
    ExportRelative,
    /// Written into an exported document as an absolute path
    ExportAbsolute,
}

/// Computes artifact paths relative to the current document
#[derive(Debug, Clone)]
pub struct PathResolver {
    document_dir: PathBuf,
}

impl PathResolver {
    /// `document_dir` is the directory of the document being viewed or exported
    pub fn new(document_dir: impl AsRef<Path>) -> Self {
        Self {
            document_dir: absolute(document_dir.as_ref()),
        }
    }

    pub fn document_dir(&self) -> &Path {
        &self.document_dir
    }

    /// Resolve `artifact` for `context`
    ///
    /// Never fails: a path that cannot be canonicalized falls back to its
    /// lexically normalized absolute form.
    pub fn resolve_path(&self, artifact: &Path, context: PathContext) -> PathBuf {
        let artifact = if artifact.is_absolute() {
            normalize(artifact)
        } else {
            normalize(&self.document_dir.join(artifact))
        };

        let resolved = match context {
            PathContext::Interactive => std::fs::canonicalize(&artifact).unwrap_or(artifact),
            PathContext::ExportAbsolute => artifact,
            PathContext::ExportRelative => relative_path(
                &canonical_or_normalized(&self.document_dir),
                &canonical_or_normalized(&artifact),
            ),
        };
        debug!(?context, path = %resolved.display(), "resolved artifact path");
        resolved
    }
}

// Both ends of a relative path must agree on symlinks, so they are compared
// in canonical form whenever the filesystem allows it.
fn canonical_or_normalized(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| normalize(path))
}

/// Make `path` absolute against the working directory, then normalize it
pub fn absolute(path: &Path) -> PathBuf {
    let joined = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize(&joined)
}

/// Lexically remove `.` and `..` components without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Path leading from directory `from` to `to`
///
/// Both paths should be absolute and normalized. When they share no root
/// (different drives) `to` is returned unchanged.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from.components().collect();
    let to_components: Vec<Component> = to.components().collect();

    if from.first() != to_components.first() {
        return to.to_path_buf();
    }

    let common = from
        .iter()
        .zip(&to_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..from.len() {
        out.push("..");
    }
    for component in &to_components[common..] {
        out.push(component.as_os_str());
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Render a path with `/` separators, as used inside URIs and documents
pub fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            Component::Prefix(p) => out.push_str(&p.as_os_str().to_string_lossy()),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}
