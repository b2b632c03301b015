//! Publishing a rendered artifact next to an exported document
//!
//! Rendered artifacts reference background tiles through absolute
//! `file://` URIs into the default cache directory. A published copy gets
//! those references rewritten relative to its new location so the publish
//! tree stays self-contained.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::paths::{absolute, relative_path, to_slash};
use crate::renderer::svg::escape_attr;
use crate::textio;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {0} has no file name")]
    NoFileName(PathBuf),

    #[error("publish target {0} is the source artifact itself")]
    SameFile(PathBuf),
}

/// Inputs of one publish operation
#[derive(Debug, Clone)]
pub struct PublishContext {
    /// The rendered artifact in the source tree
    pub source_artifact: PathBuf,
    /// Directory receiving the published copy
    pub publish_dir: PathBuf,
    /// Cache directory the published copy should point at
    pub cache_dir: PathBuf,
}

/// `file://` prefix under which the renderer embeds cache references
pub fn cache_uri_prefix(default_cache_dir: &Path) -> String {
    let dir = canonical_or_absolute(default_cache_dir);
    let mut prefix = format!("file://{}", to_slash(&dir));
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}

/// Prefix leading from `target_dir` to `cache_dir`, with a trailing `/`
pub fn relative_prefix(target_dir: &Path, cache_dir: &Path) -> String {
    let from = canonical_or_absolute(target_dir);
    let to = canonical_or_absolute(cache_dir);
    let mut prefix = to_slash(&relative_path(&from, &to));
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}

/// Copy `source` to `target`, replacing every occurrence of `old_prefix`
///
/// The content is treated as opaque bytes: no decoding or parsing, just
/// literal replacement. Newline conversion is suspended for the read and
/// the write so the copy is otherwise byte-identical. `source` is never written.
/// Returns the number of replacements made.
pub fn rewrite(
    source: &Path,
    target: &Path,
    old_prefix: &str,
    new_prefix: &str,
) -> Result<usize, PublishError> {
    if let (Ok(s), Ok(t)) = (source.canonicalize(), target.canonicalize()) {
        if s == t {
            return Err(PublishError::SameFile(target.to_path_buf()));
        }
    }

    let _raw = textio::suspend_conversion();

    let content = textio::read_text(source).map_err(|source_err| PublishError::Read {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    let (rewritten, count) = replace_all(&content, old_prefix.as_bytes(), new_prefix.as_bytes());

    textio::write_text(target, &rewritten).map_err(|source_err| PublishError::Write {
        path: target.to_path_buf(),
        source: source_err,
    })?;

    Ok(count)
}

/// Replace every non-overlapping `needle` in `haystack`, counting matches
fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> (Vec<u8>, usize) {
    if needle.is_empty() {
        return (haystack.to_vec(), 0);
    }
    let mut out = Vec::with_capacity(haystack.len());
    let mut count = 0;
    let mut last = 0;
    for pos in memchr::memmem::find_iter(haystack, needle) {
        out.extend_from_slice(&haystack[last..pos]);
        out.extend_from_slice(replacement);
        last = pos + needle.len();
        count += 1;
    }
    out.extend_from_slice(&haystack[last..]);
    (out, count)
}

/// Publish `ctx.source_artifact` into `ctx.publish_dir`
///
/// References to `default_cache_dir` are rewritten to point at
/// `ctx.cache_dir` relative to the publish directory. Only an exact prefix
/// match is rewritten; an artifact rendered against a different cache
/// directory is copied unchanged.
pub fn publish_artifact(ctx: &PublishContext, default_cache_dir: &Path) -> Result<PathBuf, PublishError> {
    let file_name = ctx
        .source_artifact
        .file_name()
        .ok_or_else(|| PublishError::NoFileName(ctx.source_artifact.clone()))?;

    std::fs::create_dir_all(&ctx.publish_dir).map_err(|source| PublishError::Write {
        path: ctx.publish_dir.clone(),
        source,
    })?;
    let target = ctx.publish_dir.join(file_name);

    // Both prefixes live inside SVG attribute values
    let old_prefix = escape_attr(&cache_uri_prefix(default_cache_dir));
    let new_prefix = escape_attr(&relative_prefix(&ctx.publish_dir, &ctx.cache_dir));
    let count = rewrite(&ctx.source_artifact, &target, &old_prefix, &new_prefix)?;

    if count == 0 {
        warn!(
            artifact = %ctx.source_artifact.display(),
            prefix = %old_prefix,
            "no cache references rewritten"
        );
    }
    info!(
        target = %target.display(),
        replacements = count,
        "published artifact"
    );
    Ok(target)
}

fn canonical_or_absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| absolute(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rewrite_replaces_every_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("track.svg");
        let target = dir.path().join("out.svg");
        let content = concat!(
            "<svg>\r\n",
            "<image href=\"file:///cache/OSM/13/1/2.png\"/>\n",
            "<image href=\"file:///cache/OSM/13/1/3.png\"/>\n",
            "<!-- file:///cache/OSM/ -->\n",
            "</svg>"
        );
        std::fs::write(&source, content).unwrap();

        let count = rewrite(&source, &target, "file:///cache/OSM/", "../../cache/OSM/").unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            content.replace("file:///cache/OSM/", "../../cache/OSM/")
        );
        assert_eq!(std::fs::read_to_string(&source).unwrap(), content);
    }

    #[test]
    fn test_rewrite_is_byte_identical_under_newline_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("track.svg");
        let target = dir.path().join("out.svg");
        std::fs::write(&source, "a\r\nb\nc").unwrap();

        let previous = textio::set_newline_mode(textio::NewlineMode::Dos);
        rewrite(&source, &target, "file:///none/", "x/").unwrap();
        assert_eq!(textio::newline_mode(), textio::NewlineMode::Dos);
        textio::set_newline_mode(previous);

        assert_eq!(std::fs::read(&target).unwrap(), b"a\r\nb\nc");
    }

    #[test]
    fn test_rewrite_missing_source_restores_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let previous = textio::set_newline_mode(textio::NewlineMode::Unix);

        let err = rewrite(
            &dir.path().join("missing.svg"),
            &dir.path().join("out.svg"),
            "a",
            "b",
        )
        .unwrap_err();

        assert!(matches!(err, PublishError::Read { .. }));
        assert_eq!(textio::newline_mode(), textio::NewlineMode::Unix);
        assert!(!dir.path().join("out.svg").exists());
        textio::set_newline_mode(previous);
    }

    #[test]
    fn test_rewrite_refuses_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("track.svg");
        std::fs::write(&source, "file:///c/").unwrap();

        assert!(matches!(
            rewrite(&source, &source, "file:///c/", "c/"),
            Err(PublishError::SameFile(_))
        ));
        assert_eq!(std::fs::read_to_string(&source).unwrap(), "file:///c/");
    }

    #[test]
    fn test_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let cache = root.join("cache/OSM");
        let publish = root.join("pub/site");
        std::fs::create_dir_all(&cache).unwrap();
        std::fs::create_dir_all(&publish).unwrap();

        assert_eq!(
            cache_uri_prefix(&cache),
            format!("file://{}/", to_slash(&cache))
        );
        assert_eq!(relative_prefix(&publish, &cache), "../../cache/OSM/");
    }

    #[test]
    fn test_publish_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let cache = root.join("cache/OSM");
        std::fs::create_dir_all(&cache).unwrap();
        let src_dir = root.join("notes");
        std::fs::create_dir_all(&src_dir).unwrap();

        let uri = cache_uri_prefix(&cache);
        let source = src_dir.join("walk.svg");
        let content = format!(
            "<image href=\"{uri}13/1/2.png\"/><image href=\"{uri}13/1/3.png\"/><image href=\"{uri}13/2/2.png\"/>"
        );
        std::fs::write(&source, &content).unwrap();

        let ctx = PublishContext {
            source_artifact: source.clone(),
            publish_dir: root.join("pub/site"),
            cache_dir: cache.clone(),
        };
        let target = publish_artifact(&ctx, &cache).unwrap();

        assert_eq!(target, root.join("pub/site/walk.svg"));
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            content.replace(&uri, "../../cache/OSM/")
        );
        assert_eq!(std::fs::read_to_string(&source).unwrap(), content);
    }

    #[test]
    fn test_publish_with_other_cache_copies_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let source = root.join("walk.svg");
        std::fs::write(&source, "<image href=\"file:///elsewhere/1.png\"/>").unwrap();

        let ctx = PublishContext {
            source_artifact: source,
            publish_dir: root.join("out"),
            cache_dir: root.join("cache"),
        };
        let target = publish_artifact(&ctx, &root.join("cache")).unwrap();
        assert_eq!(
            std::fs::read_to_string(target).unwrap(),
            "<image href=\"file:///elsewhere/1.png\"/>"
        );
    }

    #[test]
    fn test_rewrite_keeps_non_utf8_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("track.svg");
        let target = dir.path().join("out.svg");
        let mut content = b"<svg><!-- caf\xe9 -->".to_vec();
        for tile in ["1", "2", "3"] {
            content.extend_from_slice(format!("<image href=\"file:///cache/OSM/{tile}.png\"/>").as_bytes());
        }
        content.extend_from_slice(b"</svg>");
        std::fs::write(&source, &content).unwrap();

        let count = rewrite(&source, &target, "file:///cache/OSM/", "../../cache/OSM/").unwrap();

        assert_eq!(count, 3);
        let mut expected = b"<svg><!-- caf\xe9 -->".to_vec();
        for tile in ["1", "2", "3"] {
            expected.extend_from_slice(format!("<image href=\"../../cache/OSM/{tile}.png\"/>").as_bytes());
        }
        expected.extend_from_slice(b"</svg>");
        assert_eq!(std::fs::read(&target).unwrap(), expected);
    }

    #[test]
    fn test_replace_all_counts_non_overlapping() {
        assert_eq!(replace_all(b"aaaa", b"aa", b"b"), (b"bb".to_vec(), 2));
        assert_eq!(replace_all(b"abc", b"", b"x"), (b"abc".to_vec(), 0));
    }

    #[test]
    fn test_publish_escapes_prefixes_like_the_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let cache = root.join("Tom & Jerry/OSM");
        std::fs::create_dir_all(&cache).unwrap();

        let embedded = escape_attr(&cache_uri_prefix(&cache));
        assert!(embedded.contains("Tom &amp; Jerry"));
        let source = root.join("walk.svg");
        std::fs::write(&source, format!("<image href=\"{embedded}13/1/2.png\"/>")).unwrap();

        let ctx = PublishContext {
            source_artifact: source,
            publish_dir: root.join("pub"),
            cache_dir: cache.clone(),
        };
        let target = publish_artifact(&ctx, &cache).unwrap();
        assert_eq!(
            std::fs::read_to_string(target).unwrap(),
            "<image href=\"../Tom &amp; Jerry/OSM/13/1/2.png\"/>"
        );
    }
}
