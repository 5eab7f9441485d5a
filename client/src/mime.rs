//! MIME Translator (spec.md §4.1, §6.3).
//!
//! A static mapping from native-document MIME types to an
//! `(export_mime, extension)` pair, loaded from a user-editable
//! `types.toml`. Folder MIME is never looked up here — the engine branches
//! on `FileRecord::is_folder` directly (spec.md §9 "Folder-as-value").

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTarget {
    pub export_mime: String,
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MimeTranslator {
    #[serde(rename = "native")]
    table: HashMap<String, ExportTarget>,
}

impl MimeTranslator {
    /// The table bundled with the application, copied to `~/.<app>/types.toml`
    /// on first run per spec.md §6.2. Matches the four native types the
    /// prototype (`original_source/types.py`) ships by default.
    pub fn default_table() -> Self {
        let mut table = HashMap::new();
        table.insert(
            "application/vnd.google-apps.document".to_string(),
            ExportTarget {
                export_mime: "application/vnd.oasis.opendocument.text".to_string(),
                extension: ".odt".to_string(),
            },
        );
        table.insert(
            "application/vnd.google-apps.spreadsheet".to_string(),
            ExportTarget {
                export_mime: "application/vnd.oasis.opendocument.spreadsheet".to_string(),
                extension: ".ods".to_string(),
            },
        );
        table.insert(
            "application/vnd.google-apps.presentation".to_string(),
            ExportTarget {
                export_mime: "application/vnd.oasis.opendocument.presentation".to_string(),
                extension: ".odp".to_string(),
            },
        );
        table.insert(
            "application/vnd.google-apps.drawing".to_string(),
            ExportTarget {
                export_mime: "image/png".to_string(),
                extension: ".png".to_string(),
            },
        );
        Self { table }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let translator: Self = toml::from_str(&content)?;
        Ok(translator)
    }

    /// Load from `path` if present, otherwise fall back to the bundled
    /// default table (and write it out so the user has something to edit).
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let default = Self::default_table();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(&default)?)?;
        Ok(default)
    }

    /// `translate(mime) -> (export_mime, extension) | none`. Unknown MIME
    /// types return `None`; the caller downloads raw bytes verbatim.
    pub fn translate(&self, mime: &str) -> Option<(&str, &str)> {
        self.table
            .get(mime)
            .map(|t| (t.export_mime.as_str(), t.extension.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_native_types() {
        let t = MimeTranslator::default_table();
        let (mime, ext) = t
            .translate("application/vnd.google-apps.document")
            .expect("document type should translate");
        assert_eq!(mime, "application/vnd.oasis.opendocument.text");
        assert_eq!(ext, ".odt");
    }

    #[test]
    fn unknown_mime_translates_to_none() {
        let t = MimeTranslator::default_table();
        assert!(t.translate("text/plain").is_none());
        assert!(t.translate(crate::remote::FOLDER_MIME).is_none());
    }

    #[test]
    fn round_trips_through_toml() {
        let t = MimeTranslator::default_table();
        let s = toml::to_string_pretty(&t).unwrap();
        let parsed: MimeTranslator = toml::from_str(&s).unwrap();
        assert_eq!(
            parsed.translate("application/vnd.google-apps.drawing"),
            t.translate("application/vnd.google-apps.drawing")
        );
    }
}
