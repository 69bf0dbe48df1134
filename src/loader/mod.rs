//! Concurrent loading of a game system and its catalogues.
//!
//! One decode task per document. A failed document marks the whole load
//! as failed but already-decoded documents are kept; callers must check
//! [`LoadOutcome::is_failed`] before parsing rosters against the group.

mod collector;

pub use collector::{collect_schema_files, SchemaFileSet};

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use crate::schema::records::{CatalogueRecord, GameSystemRecord};
use crate::schema::{Catalogue, GameSystem, GameSystemGroup};
use crate::types::RosterScannerConfig;

/// One document that failed to decode.
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: String,
}

/// The result of loading one data directory.
pub struct LoadOutcome {
    pub group: GameSystemGroup,
    pub failures: Vec<LoadFailure>,
}

impl LoadOutcome {
    /// Whether any document failed. A failed outcome must not be used
    /// for roster parsing.
    pub fn is_failed(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Loads the game system and every catalogue found under `dir` into one
/// group, decoding documents concurrently.
pub async fn load_game_system_group(
    dir: &Path,
    config: &RosterScannerConfig,
) -> Result<LoadOutcome> {
    info!("Loading schema documents from {}", dir.display());
    let files = collect_schema_files(dir)?;

    let system_path = match files.system_files.as_slice() {
        [] => return Err(anyhow!("No game system file under {}", dir.display())),
        [single] => single.clone(),
        [first, ..] => {
            warn!(
                "Multiple game system files under {}, using {}",
                dir.display(),
                first.display()
            );
            first.clone()
        }
    };

    let progress = ProgressBar::new(files.catalogue_files.len() as u64 + 1);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress.set_message("Loading schema documents");

    let game_system = {
        let path = system_path.clone();
        tokio::task::spawn_blocking(move || load_game_system_file(&path)).await?
    };
    progress.inc(1);

    let mut failures = Vec::new();
    let game_system = match game_system {
        Ok(system) => system,
        Err(e) => {
            error!("Failed to load game system {}: {}", system_path.display(), e);
            progress.finish_and_clear();
            return Err(anyhow!(
                "Failed to load game system {}: {}",
                system_path.display(),
                e
            ));
        }
    };

    let mut group = GameSystemGroup::new(game_system);

    // One task per catalogue, at most max_threads decoding at once
    let catalogue_results: Vec<(PathBuf, Result<Catalogue>)> =
        stream::iter(files.catalogue_files.clone())
            .map(|path| async move {
                let task_path = path.clone();
                let result = tokio::task::spawn_blocking(move || {
                    load_catalogue_file(&task_path)
                })
                .await
                .map_err(anyhow::Error::from)
                .and_then(|decoded| decoded);
                (path, result)
            })
            .buffer_unordered(config.max_threads.max(1))
            .collect()
            .await;

    for (path, result) in catalogue_results {
        progress.inc(1);
        match result {
            Ok(catalogue) => group.add_catalogue(catalogue),
            Err(e) => {
                error!("Failed to load catalogue {}: {}", path.display(), e);
                failures.push(LoadFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    progress.finish_with_message(format!(
        "Loaded {} catalogues ({} failed)",
        group.catalogues().len(),
        failures.len()
    ));
    info!(
        "Loaded game system {} with {} catalogues, {} failures",
        group.game_system().name.as_deref().unwrap_or("<unnamed>"),
        group.catalogues().len(),
        failures.len()
    );

    Ok(LoadOutcome { group, failures })
}

fn load_game_system_file(path: &Path) -> Result<GameSystem> {
    let file = std::fs::File::open(path)?;
    let record: GameSystemRecord = serde_json::from_reader(file)?;
    if record.id.is_empty() {
        return Err(anyhow!("Game system document has no id"));
    }
    Ok(GameSystem::from_record(record))
}

fn load_catalogue_file(path: &Path) -> Result<Catalogue> {
    let file = std::fs::File::open(path)?;
    let record: CatalogueRecord = serde_json::from_reader(file)?;
    if record.id.is_empty() {
        return Err(anyhow!("Catalogue document has no id"));
    }
    Ok(Catalogue::from_record(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_system(dir: &Path) {
        std::fs::write(
            dir.join("core.system.json"),
            r#"{"id": "sys-1", "name": "Test System", "revision": 1}"#,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_load_system_and_catalogues() -> Result<()> {
        let dir = tempdir()?;
        write_system(dir.path());
        std::fs::write(
            dir.path().join("raiders.catalogue.json"),
            r#"{"id": "cat-1", "name": "Star Raiders", "gameSystemId": "sys-1",
                "selectionEntries": [{"id": "e-1", "name": "Captain", "type": "unit"}]}"#,
        )?;

        let outcome =
            load_game_system_group(dir.path(), &RosterScannerConfig::default()).await?;
        assert!(!outcome.is_failed());
        assert_eq!(outcome.group.catalogues().len(), 1);
        assert!(outcome.group.search_by_id("e-1").is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_catalogue_marks_load_failed() -> Result<()> {
        let dir = tempdir()?;
        write_system(dir.path());
        std::fs::write(
            dir.path().join("good.catalogue.json"),
            r#"{"id": "cat-1", "name": "Good", "gameSystemId": "sys-1"}"#,
        )?;
        std::fs::write(dir.path().join("bad.catalogue.json"), "{not json")?;

        let outcome =
            load_game_system_group(dir.path(), &RosterScannerConfig::default()).await?;
        // The good catalogue is kept, but the outcome is failed
        assert!(outcome.is_failed());
        assert_eq!(outcome.group.catalogues().len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_system_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(
            dir.path().join("orphan.catalogue.json"),
            r#"{"id": "cat-1", "gameSystemId": "sys-1"}"#,
        )?;

        let result =
            load_game_system_group(dir.path(), &RosterScannerConfig::default()).await;
        assert!(result.is_err());
        Ok(())
    }
}
