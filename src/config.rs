use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{DerefError, Result};

/// Conventional file name for an on-disk options file.
pub const OPTIONS_FILENAME: &str = "apideref.json";

/// Options controlling whether pointers are resolved and dereferenced.
///
/// Field names on disk follow the parser's option names, so an options file
/// looks like `{"resolve$Refs": true, "dereference$Refs": false}`. Missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerefOptions {
    /// Whether a pointer table is built and consulted at all.
    #[serde(rename = "resolve$Refs")]
    pub resolve_refs: bool,
    /// Whether pointer nodes are replaced in place by their targets.
    #[serde(rename = "dereference$Refs")]
    pub dereference_refs: bool,
}

impl Default for DerefOptions {
    fn default() -> Self {
        Self {
            resolve_refs: true,
            dereference_refs: true,
        }
    }
}

impl DerefOptions {
    /// Dereferencing happens only when both flags are set.
    pub fn enabled(&self) -> bool {
        self.resolve_refs && self.dereference_refs
    }
}

/// Loads options from a JSON file.
///
/// If the file does not exist, returns the default options.
pub fn load_options(path: &Path) -> Result<DerefOptions> {
    if !path.exists() {
        return Ok(DerefOptions::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| DerefError::Config {
        message: format!("failed to read options file '{}': {}", path.display(), e),
    })?;

    let options: DerefOptions =
        serde_json::from_str(&contents).map_err(|e| DerefError::Config {
            message: format!("failed to parse options file '{}': {}", path.display(), e),
        })?;

    Ok(options)
}

/// Saves options to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it to the final location,
/// so a partial write never corrupts the options file.
pub fn save_options(path: &Path, options: &DerefOptions) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DerefError::Config {
            message: format!(
                "failed to create options directory '{}': {}",
                parent.display(),
                e
            ),
        })?;
    }

    let tmp_path = path.with_extension("tmp");

    let json = serde_json::to_string_pretty(options).map_err(|e| DerefError::Config {
        message: format!("failed to serialize options: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| DerefError::Config {
        message: format!(
            "failed to write temporary options file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, path).map_err(|e| DerefError::Config {
        message: format!(
            "failed to rename temporary options file '{}' to '{}': {}",
            tmp_path.display(),
            path.display(),
            e
        ),
    })?;

    Ok(())
}
