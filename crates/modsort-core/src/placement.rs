//! Output placement: copies or moves each file into its bucket directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::archive::ArchiveFile;
use crate::classify::Classification;

/// Directory holding the six classified buckets.
pub const CLASSIFIED_DIR: &str = "classified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceMode {
    #[default]
    Copy,
    Move,
}

/// Places files under `root`: `classified/<Bucket>/` for the six buckets and
/// `unknown/` for everything else. Existing files are never overwritten.
///
/// Collision handling checks then writes, so one `Placer` must not be used
/// from several tasks at once; the batch runner places from a single task.
#[derive(Debug, Clone)]
pub struct Placer {
    root: PathBuf,
    mode: PlaceMode,
}

impl Placer {
    pub fn new(root: impl Into<PathBuf>, mode: PlaceMode) -> Self {
        Self {
            root: root.into(),
            mode,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bucket_dir(&self, classification: Classification) -> PathBuf {
        match classification {
            Classification::Unknown => self.root.join(classification.dir_name()),
            _ => self.root.join(CLASSIFIED_DIR).join(classification.dir_name()),
        }
    }

    /// Creates every bucket directory.
    pub fn prepare(&self) -> Result<()> {
        for c in Classification::ALL {
            let dir = self.bucket_dir(c);
            fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        }
        Ok(())
    }

    /// Copies or moves `file` into its bucket and returns the destination.
    /// Directories are placed whole, under the same collision naming.
    pub fn place(&self, file: &ArchiveFile, classification: Classification) -> Result<PathBuf> {
        let dir = self.bucket_dir(classification);
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let name = file
            .path
            .file_name()
            .with_context(|| format!("no file name in {}", file.path.display()))?;
        let dest = free_destination(&dir, Path::new(name));

        let src = &file.path;
        let is_dir = src.is_dir();
        match self.mode {
            PlaceMode::Copy if is_dir => copy_tree(src, &dest)?,
            PlaceMode::Copy => {
                fs::copy(src, &dest)
                    .with_context(|| format!("copy {} to {}", src.display(), dest.display()))?;
            }
            PlaceMode::Move => {
                if let Err(e) = fs::rename(src, &dest) {
                    // Cross-device moves fail with rename; copy then remove.
                    tracing::debug!("rename failed ({}), copying instead", e);
                    if is_dir {
                        copy_tree(src, &dest)?;
                        fs::remove_dir_all(src)
                            .with_context(|| format!("remove {}", src.display()))?;
                    } else {
                        fs::copy(src, &dest).with_context(|| {
                            format!("copy {} to {}", src.display(), dest.display())
                        })?;
                        fs::remove_file(src).with_context(|| format!("remove {}", src.display()))?;
                    }
                }
            }
        }
        tracing::debug!(bucket = %classification, dest = %dest.display(), "placed");
        Ok(dest)
    }
}

/// Copies the directory `src` to `dst`, which must not exist yet.
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("walk {}", src.display()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("{} outside {}", entry.path().display(), src.display()))?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).with_context(|| format!("create {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!("copy {} to {}", entry.path().display(), target.display())
            })?;
        }
    }
    Ok(())
}

/// `dir/name` if free, else the first free `stem (n).ext`.
fn free_destination(dir: &Path, name: &Path) -> PathBuf {
    let first = dir.join(name);
    if !first.exists() {
        return first;
    }
    let stem = name.file_stem().unwrap_or(name.as_os_str());
    let ext = name.extension();
    let mut n = 1u32;
    loop {
        let mut candidate = OsString::from(stem);
        candidate.push(format!(" ({n})"));
        if let Some(ext) = ext {
            candidate.push(".");
            candidate.push(ext);
        }
        let path = dir.join(&candidate);
        if !path.exists() {
            return path;
        }
        n += 1;
    }
}
