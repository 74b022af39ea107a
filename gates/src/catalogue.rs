//! Gate catalogues: ordered gate lists looked up by template id.

use crate::error::{GateError, Result};
use crate::types::Gate;
use rustc_hash::FxHashMap;
use std::path::Path;

/// Supplies the ordered gates of a gate template.
pub trait GateCatalogue: Send + Sync {
    /// # Errors
    /// Returns `GateError::MissingParameter` if the template is unknown.
    fn gates_for_template(&self, template_id: &str) -> Result<Vec<Gate>>;
}

/// Catalogue read from a JSON object mapping template ids to gate arrays:
///
/// ```json
/// { "tpl-1": [ { "id": "g1", "type": "polygon", "xParameterIndex": 0, ... } ] }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonGateCatalogue {
    templates: FxHashMap<String, Vec<Gate>>,
}

impl JsonGateCatalogue {
    pub fn from_json(json: &str) -> Result<Self> {
        let templates: FxHashMap<String, Vec<Gate>> = serde_json::from_str(json)?;
        Ok(Self { templates })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| GateError::data_unavailable(path.display().to_string(), e.to_string()))?;
        Self::from_json(&json).map_err(|e| e.with_context(path.display().to_string()))
    }

    /// Template ids, sorted
    pub fn template_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl GateCatalogue for JsonGateCatalogue {
    fn gates_for_template(&self, template_id: &str) -> Result<Vec<Gate>> {
        self.templates.get(template_id).cloned().ok_or_else(|| {
            GateError::missing_parameter(
                template_id,
                format!("gate catalogue with {} templates", self.templates.len()),
            )
        })
    }
}
