use std::path::Path;

use serde::Deserialize;

use crate::products::{validate_draft, ProductDraft};
use crate::ConfigError;

/// Drafts seeded into a session once the catalog has loaded.
#[derive(Debug, Deserialize)]
pub struct DraftsFile {
    #[serde(default)]
    pub drafts: Vec<ProductDraft>,
}

/// Load and validate a drafts seed file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or a draft fails
/// validation.
pub fn load_drafts(path: &Path) -> Result<DraftsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DraftsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_drafts(&content)
}

/// Parse and validate drafts from YAML text.
///
/// # Errors
///
/// Returns [`ConfigError::DraftsFileParse`] for malformed YAML and
/// [`ConfigError::Validation`] naming the first invalid draft.
pub fn parse_drafts(content: &str) -> Result<DraftsFile, ConfigError> {
    let drafts_file: DraftsFile =
        serde_yaml::from_str(content).map_err(ConfigError::DraftsFileParse)?;

    for (idx, draft) in drafts_file.drafts.iter().enumerate() {
        validate_draft(draft).map_err(|e| {
            ConfigError::Validation(format!("draft #{} ('{}'): {e}", idx + 1, draft.title))
        })?;
    }

    Ok(drafts_file)
}
