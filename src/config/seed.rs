//! Seed hierarchy loading from seed.toml
//!
//! The `seed` command creates a default set of expense heads, categories and
//! subcategories for a user. The hierarchy comes from a TOML file; when that file is
//! absent the copy of `seed.toml` compiled into the binary is used.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// File read by the `seed` command unless `SEED_FILE` or `config.toml` say otherwise.
pub const DEFAULT_SEED_FILE: &str = "seed.toml";

const BUILTIN_SEED: &str = include_str!("../../seed.toml");

/// Configuration structure representing the entire seed file
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// Expense heads to create
    #[serde(default)]
    pub heads: Vec<HeadSeed>,
}

/// A single expense head and its categories
#[derive(Debug, Deserialize, Clone)]
pub struct HeadSeed {
    /// Name of the expense head
    pub name: String,
    /// Categories under this head
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
}

/// A single category and the names of its subcategories
#[derive(Debug, Deserialize, Clone)]
pub struct CategorySeed {
    /// Name of the category
    pub name: String,
    /// Subcategory names under this category
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// Parses a seed hierarchy from TOML text.
pub fn parse_seed(contents: &str) -> Result<SeedConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Loads the seed hierarchy from `path`, falling back to the built-in hierarchy when
/// the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_seed_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(
            "Seed file {} not found, using built-in hierarchy",
            path.display()
        );
        return parse_seed(BUILTIN_SEED);
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read seed file {}: {e}", path.display()),
    })?;
    parse_seed(&contents)
}
