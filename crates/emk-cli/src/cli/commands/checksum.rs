//! `emk checksum` – SHA-256 of a file, in the format session ledgers record.

use anyhow::Result;
use emk_core::checksum;
use std::path::Path;

pub fn run_checksum(path: &Path) -> Result<()> {
    let digest = checksum::sha256_path(path)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
