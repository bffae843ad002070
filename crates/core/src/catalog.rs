use serde::{Deserialize, Serialize};

/// A model offered by IT, with the short blurb shown to requesters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub description: String,
}

/// Catalog of laptop models a request may name. Creation validation
/// checks membership here; the catalog itself is fixed per deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelCatalog {
    models: Vec<ModelInfo>,
}

const BUILTIN_MODELS: &[(&str, &str)] = &[
    ("XPS-15-Ultrabook", "High-performance ultrabook with 4K display"),
    ("Latitude-E5550", "Business-class laptop with enterprise features"),
    ("Probook-450-G4", "Reliable workhorse with excellent keyboard"),
    ("Zbook17-G3", "Mobile workstation for creative professionals"),
    ("Latitude-E5580", "Durable business laptop with security features"),
    ("Probook-450-G5", "Updated version with improved performance"),
    ("Precision-5530", "Powerful mobile workstation with NVIDIA graphics"),
    ("Precision-7530-CTO", "Customizable high-end workstation"),
];

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            models: BUILTIN_MODELS
                .iter()
                .map(|(name, description)| ModelInfo {
                    name: (*name).to_owned(),
                    description: (*description).to_owned(),
                })
                .collect(),
        }
    }
}

impl ModelCatalog {
    pub fn new(models: Vec<ModelInfo>) -> Self {
        Self { models }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.iter().any(|model| model.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&ModelInfo> {
        self.models.iter().find(|model| model.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelInfo> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
