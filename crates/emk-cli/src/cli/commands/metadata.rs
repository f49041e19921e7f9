//! `emk metadata` – catalog cache maintenance and lookups.

use anyhow::Result;
use emk_core::config::EmkConfig;
use emk_core::emoji::{emoji_to_codepoint, normalize_token};
use emk_core::metadata::MetadataStore;

use crate::cli::MetadataCommand;

pub async fn run_metadata(cfg: &EmkConfig, command: MetadataCommand) -> Result<()> {
    let store = MetadataStore::open_default()?;
    let policy = cfg.retry_policy();
    match command {
        MetadataCommand::Update => {
            let catalog = store.download(&cfg.metadata_url, &policy).await?;
            let info = store.cache_info();
            println!(
                "Catalog updated: {} emoji, {:.1} MiB at {}",
                catalog.len(),
                info.size_mib().unwrap_or(0.0),
                info.path.display()
            );
        }
        MetadataCommand::Info => {
            let info = store.cache_info();
            if !info.exists {
                println!("No cached catalog at {}", info.path.display());
                println!("Run `emk metadata update` to download it.");
                return Ok(());
            }
            println!("Path:     {}", info.path.display());
            println!("Size:     {:.1} MiB", info.size_mib().unwrap_or(0.0));
            if let Some(modified) = info.modified {
                let local: chrono::DateTime<chrono::Local> = modified.into();
                println!("Updated:  {}", local.format("%Y-%m-%d %H:%M:%S"));
            }
            if let Some(catalog) = store.load()? {
                println!("Emoji:    {}", catalog.len());
                println!("Supported: {}", catalog.supported_emoji().len());
            }
        }
        MetadataCommand::Check { left, right } => {
            let (left, right) = (normalize_token(&left)?, normalize_token(&right)?);
            let catalog = store.ensure(&cfg.metadata_url, &policy).await?;
            match catalog.combination(&left, &right) {
                Some(combo) => println!("{} + {}: yes ({}) {}", left, right, combo.date, combo.url),
                None => println!("{} + {}: no", left, right),
            }
        }
        MetadataCommand::List { emoji, limit } => {
            let emoji = normalize_token(&emoji)?;
            let catalog = store.ensure(&cfg.metadata_url, &policy).await?;
            let combos = catalog.find_combinations(&emoji);
            println!(
                "{} ({}): {} combination(s)",
                emoji,
                emoji_to_codepoint(&emoji),
                combos.len()
            );
            for combo in combos.iter().take(limit.unwrap_or(usize::MAX)) {
                println!("  {}  {}  {}", combo.pair, combo.date, combo.url);
            }
        }
    }
    Ok(())
}
