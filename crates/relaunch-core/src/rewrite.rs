// SPDX-License-Identifier: MIT OR Apache-2.0
//! Redirecting agent and recording output files to fresh siblings.
//!
//! A parent and its relaunched child must not write coverage or recording
//! data to the same file. The destination embedded in such an option is
//! replaced by `<stem>-forked-<uuid><.ext>` in the same directory; the file
//! itself is left for the agent to create.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use uuid::Uuid;

static DESTFILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?[=,]destfile=)([^,=]+)(.*?)$").expect("destfile regex is valid")
});

static FILENAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?[=,]filename=)([^,=]+)(.*?)$").expect("filename regex is valid")
});

/// The `key=` parameter that names an output file inside an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKey {
    /// `destfile=`, used by coverage agents.
    DestFile,
    /// `filename=`, used by flight recordings.
    FileName,
}

impl DestinationKey {
    /// The parameter name without the `=`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationKey::DestFile => "destfile",
            DestinationKey::FileName => "filename",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            DestinationKey::DestFile => &DESTFILE_PATTERN,
            DestinationKey::FileName => &FILENAME_PATTERN,
        }
    }
}

/// An option whose destination was replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenOption {
    /// The option with the new destination spliced in.
    pub option: String,
    /// The destination found in the original option.
    pub original: PathBuf,
    /// The new sibling destination.
    pub replacement: PathBuf,
}

/// Replace the destination named by `key` with a fresh sibling path.
///
/// Returns `None` when the option carries no such parameter (for example an
/// agent reporting over a TCP port).
pub fn rewrite_destination(option: &str, key: DestinationKey) -> Option<RewrittenOption> {
    rewrite_destination_with(option, key, Uuid::new_v4())
}

/// Like [`rewrite_destination`], with a caller-chosen unique id.
pub fn rewrite_destination_with(
    option: &str,
    key: DestinationKey,
    id: Uuid,
) -> Option<RewrittenOption> {
    let caps = key.pattern().captures(option)?;
    let original = PathBuf::from(&caps[2]);
    let replacement = forked_sibling_with(&original, id);
    let option = format!("{}{}{}", &caps[1], replacement.to_string_lossy(), &caps[3]);
    Some(RewrittenOption {
        option,
        original,
        replacement,
    })
}

/// A fresh `<stem>-forked-<uuid><.ext>` path next to `original`.
pub fn forked_sibling(original: &Path) -> PathBuf {
    forked_sibling_with(original, Uuid::new_v4())
}

/// Like [`forked_sibling`], with a caller-chosen unique id.
pub fn forked_sibling_with(original: &Path, id: Uuid) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{stem}-forked-{id}");
    if let Some(ext) = original.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    match original.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_id() -> Uuid {
        Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef)
    }

    #[test]
    fn sibling_keeps_directory_and_extension() {
        let p = forked_sibling_with(Path::new("/tmp/orig.exec"), fixed_id());
        assert_eq!(
            p,
            Path::new("/tmp/orig-forked-01234567-89ab-cdef-0123-456789abcdef.exec")
        );
    }

    #[test]
    fn siblings_are_unique_and_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("jacoco.exec");
        let a = forked_sibling(&original);
        let b = forked_sibling(&original);
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(dir.path()));
        assert!(!a.exists());
    }

    #[test]
    fn sibling_of_relative_file() {
        let p = forked_sibling_with(Path::new("rec.jfr"), fixed_id());
        assert_eq!(
            p,
            Path::new("rec-forked-01234567-89ab-cdef-0123-456789abcdef.jfr")
        );
    }

    #[test]
    fn sibling_without_extension() {
        let p = forked_sibling_with(Path::new("/data/coverage"), fixed_id());
        assert_eq!(
            p,
            Path::new("/data/coverage-forked-01234567-89ab-cdef-0123-456789abcdef")
        );
    }

    #[test]
    fn rewrite_preserves_surrounding_parameters() {
        let rw = rewrite_destination_with(
            "-javaagent:agent.jar=destfile=/tmp/orig.exec,append=true",
            DestinationKey::DestFile,
            fixed_id(),
        )
        .unwrap();
        assert_eq!(
            rw.option,
            "-javaagent:agent.jar=destfile=/tmp/orig-forked-01234567-89ab-cdef-0123-456789abcdef.exec,append=true"
        );
        assert_eq!(rw.original, Path::new("/tmp/orig.exec"));
    }

    #[test]
    fn rewrite_finds_key_after_comma() {
        let rw = rewrite_destination_with(
            "-XX:StartFlightRecording=duration=30s,filename=/var/rec.jfr",
            DestinationKey::FileName,
            fixed_id(),
        )
        .unwrap();
        assert_eq!(
            rw.option,
            "-XX:StartFlightRecording=duration=30s,filename=/var/rec-forked-01234567-89ab-cdef-0123-456789abcdef.jfr"
        );
    }

    #[test]
    fn rewrite_without_key_is_none() {
        assert!(rewrite_destination("-javaagent:agent.jar", DestinationKey::DestFile).is_none());
        assert!(
            rewrite_destination(
                "-javaagent:agent.jar=output=tcpserver,port=6300",
                DestinationKey::DestFile
            )
            .is_none()
        );
    }

    #[test]
    fn keys_are_not_interchangeable() {
        assert!(
            rewrite_destination(
                "-XX:StartFlightRecording=filename=a.jfr",
                DestinationKey::DestFile
            )
            .is_none()
        );
    }
}
