// roadster_sim/src/simulation/config/catalog.rs

//! The `PrefabCatalog`: every vehicle definition found under the catalog
//! directory, parsed but not yet resolved.

use bevy::prelude::*;
use figment::{
    providers::{Format, Toml},
    value::Value,
    Figment,
};
use std::{collections::HashMap, path::Path};
use walkdir::WalkDir;

use super::ConfigError;

/// The key is a namespace string (e.g., "vehicles.sedan") and the value is the
/// raw, parsed TOML data of that file.
#[derive(Resource, Default, Debug, Clone)]
pub struct PrefabCatalog(pub HashMap<String, Value>);

impl PrefabCatalog {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Walks `catalog_path`, parses every `.toml` file and keys it by its relative
/// path with separators replaced by dots.
///
/// A missing directory is not an error: scenarios may define every vehicle
/// inline.
pub fn load_catalog(catalog_path: &Path) -> Result<PrefabCatalog, ConfigError> {
    let mut catalog = PrefabCatalog::default();
    if !catalog_path.exists() {
        warn!(
            "Catalog directory not found at {:?}, no prefabs will be loaded.",
            catalog_path
        );
        return Ok(catalog);
    }

    info!("Loading prefab catalog from: {:?}", catalog_path);

    for entry in WalkDir::new(catalog_path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| {
            !e.file_type().is_dir() && e.path().extension().is_some_and(|ext| ext == "toml")
        })
    {
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(catalog_path) else {
            continue;
        };
        let key = relative
            .with_extension("")
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, ".");

        let data = Figment::new()
            .merge(Toml::file(path))
            .extract::<Value>()
            .map_err(|source| ConfigError::Load {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;
        debug!("Loaded catalog item: '{}'", key);
        catalog.0.insert(key, data);
    }

    info!("Catalog holds {} prefab(s).", catalog.len());
    Ok(catalog)
}
