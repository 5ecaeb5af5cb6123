//! Progress center configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::MessageTemplates;

/// Configuration for a progress center.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CenterConfig {
    /// Name of the group holding regular items.
    #[builder(default = "default_normal_group()")]
    #[serde(default = "default_normal_group")]
    pub normal_group: String,

    /// Name of the group holding quiet items.
    #[builder(default = "default_quiet_group()")]
    #[serde(default = "default_quiet_group")]
    pub quiet_group: String,

    /// Summary message templates.
    #[builder(default)]
    #[serde(default)]
    pub templates: MessageTemplates,
}

fn default_normal_group() -> String {
    "normal".to_string()
}

fn default_quiet_group() -> String {
    "quiet".to_string()
}

impl CenterConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let normal = self
            .normal_group
            .clone()
            .unwrap_or_else(default_normal_group);
        let quiet = self.quiet_group.clone().unwrap_or_else(default_quiet_group);
        if normal.is_empty() || quiet.is_empty() {
            return Err("Group names cannot be empty".to_string());
        }
        if normal == quiet {
            return Err(format!("Group names must differ, both are '{normal}'"));
        }
        if let Some(ref templates) = self.templates {
            templates.validate().map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

impl CenterConfig {
    /// Create a new config builder.
    pub fn builder() -> CenterConfigBuilder {
        CenterConfigBuilder::default()
    }
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            normal_group: default_normal_group(),
            quiet_group: default_quiet_group(),
            templates: MessageTemplates::default(),
        }
    }
}
