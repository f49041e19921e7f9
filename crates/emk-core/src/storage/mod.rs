//! Filesystem writer and file-existence cache for combination images.
//!
//! Images live at `<base>/<left>/<left>_<right>.png`, spelled per
//! [`FilenameFormat`]. A file on disk means the combination is done; there is
//! no other index. Writes go to a `.part` file, are fsynced, then renamed
//! into place so a crash never leaves a truncated `.png` that would be
//! mistaken for a finished download.

mod layout;
mod writer;

pub use layout::FilenameFormat;
pub use writer::{write_atomic, PartFile};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a_b.png` → `a_b.png.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

#[derive(Debug, Clone)]
pub struct StorageManager {
    base_dir: PathBuf,
    format: FilenameFormat,
}

impl StorageManager {
    /// Creates the manager and its base directory.
    pub fn new(base_dir: impl Into<PathBuf>, format: FilenameFormat) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("create output dir: {}", base_dir.display()))?;
        Ok(Self {
            base_dir,
            format: format.resolve(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn format(&self) -> FilenameFormat {
        self.format
    }

    pub fn emoji_dir(&self, emoji: &str) -> PathBuf {
        self.base_dir.join(self.format.component(emoji))
    }

    pub fn file_path(&self, left: &str, right: &str) -> PathBuf {
        self.emoji_dir(left).join(self.format.file_name(left, right))
    }

    pub fn file_exists(&self, left: &str, right: &str) -> bool {
        self.file_path(left, right).is_file()
    }

    pub fn file_size(&self, left: &str, right: &str) -> Option<u64> {
        fs::metadata(self.file_path(left, right)).ok().map(|m| m.len())
    }

    /// Writes `content` for the pair and returns the final path.
    pub fn save(&self, left: &str, right: &str, content: &[u8]) -> Result<PathBuf> {
        let final_path = self.file_path(left, right);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        write_atomic(&final_path, content)?;
        Ok(final_path)
    }

    /// Removes the pair's file. Returns false if it did not exist.
    pub fn delete(&self, left: &str, right: &str) -> Result<bool> {
        let path = self.file_path(left, right);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }

    /// Counts `.png` files for one emoji's directory, or under the whole tree.
    pub fn count_files(&self, emoji: Option<&str>) -> Result<usize> {
        match emoji {
            Some(e) => {
                let dir = self.emoji_dir(e);
                if !dir.is_dir() {
                    return Ok(0);
                }
                count_png(&dir, false)
            }
            None => count_png(&self.base_dir, true),
        }
    }
}

fn count_png(dir: &Path, recursive: bool) -> Result<usize> {
    let mut n = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("read dir: {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        let ty = entry.file_type()?;
        if ty.is_dir() && recursive {
            n += count_png(&path, true)?;
        } else if ty.is_file() && path.extension().is_some_and(|ext| ext == "png") {
            n += 1;
        }
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(dir: &Path) -> StorageManager {
        StorageManager::new(dir.join("out"), FilenameFormat::Codepoint).unwrap()
    }

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("1f600_1f436.png"));
        assert_eq!(p.to_string_lossy(), "1f600_1f436.png.part");
    }

    #[test]
    fn layout_groups_by_left_emoji() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        let p = m.file_path("😀", "🐶");
        assert_eq!(p, dir.path().join("out").join("1f600").join("1f600_1f436.png"));
    }

    #[test]
    fn save_then_exists_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        assert!(!m.file_exists("😀", "🐶"));
        assert_eq!(m.file_size("😀", "🐶"), None);
        let path = m.save("😀", "🐶", b"\x89PNG-body").unwrap();
        assert!(m.file_exists("😀", "🐶"));
        assert_eq!(m.file_size("😀", "🐶"), Some(9));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG-body");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        m.save("😀", "🐶", b"old").unwrap();
        let path = m.save("😀", "🐶", b"newer").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"newer");
    }

    #[test]
    fn delete_reports_presence() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        assert!(!m.delete("😀", "🐶").unwrap());
        m.save("😀", "🐶", b"x").unwrap();
        assert!(m.delete("😀", "🐶").unwrap());
        assert!(!m.file_exists("😀", "🐶"));
    }

    #[test]
    fn count_files_per_emoji_and_total() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(dir.path());
        m.save("😀", "🐶", b"a").unwrap();
        m.save("😀", "🐱", b"b").unwrap();
        m.save("🐶", "😀", b"c").unwrap();
        std::fs::write(m.emoji_dir("😀").join("notes.txt"), b"x").unwrap();
        assert_eq!(m.count_files(Some("😀")).unwrap(), 2);
        assert_eq!(m.count_files(Some("🔥")).unwrap(), 0);
        assert_eq!(m.count_files(None).unwrap(), 3);
    }
}
