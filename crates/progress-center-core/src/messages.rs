//! Display strings for summarized items.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ItemType, ProgressError, ProgressResult};

/// Placeholder replaced by the error count in plural templates.
pub const COUNT_PLACEHOLDER: &str = "$1";

/// Source of localized summary strings.
///
/// The group logic only passes an operation type or an error count; all
/// wording lives behind this trait.
pub trait MessageCatalog: fmt::Debug + Send + Sync {
    /// Generic message for several operations of one kind.
    fn progress_summary(&self, item_type: ItemType) -> String;

    /// Error-count message. `count == 1` selects the singular form.
    fn error_summary(&self, count: usize) -> String;
}

/// Template-based message catalog, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    pub copy: String,
    pub r#move: String,
    pub delete: String,
    pub archive: String,
    pub transfer: String,
    /// Shown when exactly one error exists.
    pub error_single: String,
    /// Shown for several errors; must contain `$1`.
    pub error_plural: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            copy: "Copying...".to_string(),
            r#move: "Moving...".to_string(),
            delete: "Deleting...".to_string(),
            archive: "Archiving...".to_string(),
            transfer: "Transferring...".to_string(),
            error_single: "1 error.".to_string(),
            error_plural: "$1 errors.".to_string(),
        }
    }
}

impl MessageTemplates {
    /// Parse templates from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> ProgressResult<Self> {
        let templates: Self = toml::from_str(content).map_err(|e| ProgressError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })?;
        templates.validate()?;
        Ok(templates)
    }

    /// Load templates from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ProgressResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ProgressError::io(path, e))?;
        let templates: Self =
            toml::from_str(&content).map_err(|e| ProgressError::parse(path, e))?;
        templates.validate()?;
        Ok(templates)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> ProgressResult<String> {
        toml::to_string_pretty(self).map_err(|e| ProgressError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Check that every template is usable.
    pub fn validate(&self) -> ProgressResult<()> {
        let entries = [
            ("copy", &self.copy),
            ("move", &self.r#move),
            ("delete", &self.delete),
            ("archive", &self.archive),
            ("transfer", &self.transfer),
            ("error_single", &self.error_single),
            ("error_plural", &self.error_plural),
        ];
        for (key, template) in entries {
            if template.trim().is_empty() {
                return Err(ProgressError::InvalidTemplate {
                    key: key.to_string(),
                    message: "template is empty".to_string(),
                });
            }
        }
        if !self.error_plural.contains(COUNT_PLACEHOLDER) {
            return Err(ProgressError::InvalidTemplate {
                key: "error_plural".to_string(),
                message: format!("missing {COUNT_PLACEHOLDER} placeholder"),
            });
        }
        Ok(())
    }

    fn template_for(&self, item_type: ItemType) -> &str {
        match item_type {
            ItemType::Copy => &self.copy,
            ItemType::Move => &self.r#move,
            ItemType::Delete => &self.delete,
            ItemType::Archive => &self.archive,
            ItemType::Transfer => &self.transfer,
        }
    }
}

impl MessageCatalog for MessageTemplates {
    fn progress_summary(&self, item_type: ItemType) -> String {
        self.template_for(item_type).to_string()
    }

    fn error_summary(&self, count: usize) -> String {
        if count == 1 {
            self.error_single.clone()
        } else {
            self.error_plural
                .replace(COUNT_PLACEHOLDER, &count.to_string())
        }
    }
}
