use crate::codec::{import_deck, ImportedDeck};
use crate::schema::AppConfig;
use anyhow::Context;
use deckhand_core::{DeckRegistry, DeckRules};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    load_json(path)
}

/// Rules file; any field left out keeps its default.
pub fn load_rules(path: &Path) -> anyhow::Result<DeckRules> {
    load_json(path)
}

pub fn load_deck_file(path: &Path) -> anyhow::Result<ImportedDeck> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let deck = import_deck(&raw).with_context(|| format!("import {}", path.display()))?;
    Ok(deck)
}

pub fn save_deck_file(path: &Path, body: &str) -> anyhow::Result<()> {
    fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "deck file written");
    Ok(())
}

#[derive(Debug, Default)]
pub struct RegistryLoadReport {
    /// Registry indices of the decks that were added, in file order.
    pub loaded: Vec<usize>,
    /// One `<file>: Invalid file format` line per rejected file.
    pub errors: Vec<String>,
}

/// Side-loads every file into the registry under its file name. Bad files
/// are reported and skipped; the rest still load.
pub fn load_registry_decks(
    registry: &mut DeckRegistry,
    paths: &[impl AsRef<Path>],
) -> RegistryLoadReport {
    let mut report = RegistryLoadReport::default();
    for path in paths {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match load_deck_file(path) {
            Ok(deck) => report.loaded.push(registry.add_deck(&file_name, deck.cards)),
            Err(err) => {
                warn!(file = %file_name, error = %format!("{err:#}"), "registry deck rejected");
                report.errors.push(format!("{file_name}: Invalid file format"));
            }
        }
    }
    report
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "deckhand_load_test_{}_{}",
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).expect("mkdir");
        dir
    }

    #[test]
    fn partial_rules_keep_defaults() {
        let dir = unique_temp_dir();
        let path = dir.join("rules.json");
        fs::write(&path, r#"{"playable_minimum": 60, "undo_capacity": 8}"#).expect("write");
        let rules = load_rules(&path).expect("rules");
        assert_eq!(rules.playable_minimum, 60);
        assert_eq!(rules.undo_capacity, 8);
        assert_eq!(rules.hand_size, 7);
        assert_eq!(rules.max_main_cards, 3);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn config_sections_default_independently() {
        let dir = unique_temp_dir();
        let path = dir.join("config.json");
        fs::write(&path, r#"{"catalog": {"page_size": 50}}"#).expect("write");
        let config = load_config(&path).expect("config");
        assert_eq!(config.catalog.page_size, 50);
        assert_eq!(config.catalog.api_base_url, "https://api.pokemontcg.io/v2");
        assert_eq!(config.table.max_url_len, 20_000);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let dir = unique_temp_dir();
        let path = dir.join("absent.json");
        let err = load_deck_file(&path).expect_err("missing");
        assert!(format!("{err:#}").contains("absent.json"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn registry_load_skips_bad_files() {
        let dir = unique_temp_dir();
        let good = dir.join("fire.json");
        let dup = dir.join("sub");
        fs::create_dir_all(&dup).expect("mkdir");
        let dup = dup.join("fire.json");
        let bad = dir.join("broken.json");
        fs::write(&good, r#"[{"name":"Charmander","supertype":"Pokémon"}]"#).expect("write");
        fs::write(&dup, r#"{"name":"Fire","cards":[{"name":"Vulpix","image_url":"v.png"}]}"#)
            .expect("write");
        fs::write(&bad, r#"{"cards": 3}"#).expect("write");

        let mut registry = DeckRegistry::new();
        let report = load_registry_decks(&mut registry, &[&good, &bad, &dup]);
        assert_eq!(report.loaded, vec![0, 1]);
        assert_eq!(report.errors, vec!["broken.json: Invalid file format".to_string()]);
        let names: Vec<_> = registry.iter().map(|deck| deck.name.as_str()).collect();
        assert_eq!(names, vec!["fire.json", "fire (2).json"]);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn save_then_load() {
        let dir = unique_temp_dir();
        let path = dir.join("out.json");
        save_deck_file(&path, r#"[{"name":"Potion","supertype":"Trainer"}]"#).expect("save");
        let deck = load_deck_file(&path).expect("load");
        assert_eq!(deck.cards[0].name, "Potion");
        let _ = fs::remove_dir_all(dir);
    }
}
