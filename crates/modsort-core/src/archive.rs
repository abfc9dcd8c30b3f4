//! Archive files and input discovery.

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::encoding::{self, NameEncoding};

/// One input file. Immutable once read.
#[derive(Debug, Clone)]
pub struct ArchiveFile {
    pub path: PathBuf,
    /// Decoded file name (with extension). For opaque names, the decodable prefix.
    pub raw_name: String,
    pub encoding: NameEncoding,
    /// SHA-256 of the file name bytes; stable id for logs and reports.
    pub digest: String,
}

impl ArchiveFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.file_name().unwrap_or(path.as_os_str());
        let bytes = name_bytes(name);
        let decoded = encoding::decode_name(&bytes);
        if decoded.encoding != NameEncoding::Utf8 {
            tracing::debug!(
                path = %path.display(),
                encoding = ?decoded.encoding,
                "file name is not UTF-8"
            );
        }
        Self {
            raw_name: decoded.text,
            encoding: decoded.encoding,
            digest: encoding::name_digest(&bytes),
            path,
        }
    }

    /// Name used in logs: the decoded name, or a digest prefix for opaque names.
    pub fn display_name(&self) -> Cow<'_, str> {
        match self.encoding {
            NameEncoding::Opaque => {
                Cow::Owned(format!("{}…[{}]", self.raw_name, &self.digest[..12]))
            }
            _ => Cow::Borrowed(&self.raw_name),
        }
    }

    /// True if the path's extension is one of `extensions` (case-insensitive, no dot).
    pub fn has_extension(&self, extensions: &[String]) -> bool {
        has_extension(&self.path, extensions)
    }
}

#[cfg(unix)]
fn name_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(name.as_bytes())
}

#[cfg(not(unix))]
fn name_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    match name.to_str() {
        Some(s) => Cow::Borrowed(s.as_bytes()),
        None => Cow::Owned(name.to_string_lossy().into_owned().into_bytes()),
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Files found in an input directory.
#[derive(Debug, Default)]
pub struct Discovered {
    /// Files with an archive extension; these go through the pipeline.
    pub archives: Vec<ArchiveFile>,
    /// Any other entry, sub-directories included; these go straight to the
    /// unknown bucket.
    pub others: Vec<ArchiveFile>,
}

impl Discovered {
    pub fn len(&self) -> usize {
        self.archives.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lists entries directly inside `dir`, sorted by path. Sub-directories are
/// never archives: they go to `others` and are placed whole.
pub fn discover(dir: &Path, extensions: &[String]) -> Result<Discovered> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read dir {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", entry.path().display()))?;
        entries.push((entry.path(), file_type.is_dir()));
    }
    entries.sort();

    let mut found = Discovered::default();
    for (path, is_dir) in entries {
        let file = ArchiveFile::from_path(path);
        if !is_dir && file.has_extension(extensions) {
            found.archives.push(file);
        } else {
            found.others.push(file);
        }
    }
    tracing::debug!(
        archives = found.archives.len(),
        others = found.others.len(),
        "discovered input files in {}",
        dir.display()
    );
    Ok(found)
}
