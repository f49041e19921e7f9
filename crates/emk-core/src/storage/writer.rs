//! `.part` file that becomes the real file only once fully written and synced.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::temp_path;

/// A temp file beside its destination. Dropped without [`PartFile::commit`],
/// the `.part` stays behind and is truncated by the next attempt.
pub struct PartFile {
    file: File,
    part: PathBuf,
    dest: PathBuf,
}

impl PartFile {
    /// Creates (or truncates) `<dest>.part`.
    pub fn create(dest: &Path) -> Result<Self> {
        let part = temp_path(dest);
        let file = File::create(&part)
            .with_context(|| format!("create temp file: {}", part.display()))?;
        Ok(Self {
            file,
            part,
            dest: dest.to_path_buf(),
        })
    }

    pub fn part_path(&self) -> &Path {
        &self.part
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.file
            .write_all(data)
            .with_context(|| format!("write {}", self.part.display()))
    }

    /// Fsyncs and renames over the destination.
    pub fn commit(self) -> Result<()> {
        self.file
            .sync_all()
            .with_context(|| format!("sync {}", self.part.display()))?;
        drop(self.file);
        std::fs::rename(&self.part, &self.dest).with_context(|| {
            format!("rename {} to {}", self.part.display(), self.dest.display())
        })
    }
}

/// Replaces `dest` with `data` so readers see either the old or the new
/// contents, never a prefix. On failure the `.part` file is removed.
pub fn write_atomic(dest: &Path, data: &[u8]) -> Result<()> {
    let mut part = PartFile::create(dest)?;
    let part_path = part.part_path().to_path_buf();
    let res = part.write_all(data).and_then(|()| part.commit());
    if res.is_err() {
        let _ = std::fs::remove_file(&part_path);
    }
    res
}
