//! Static health-condition catalog.
//!
//! The catalog is a fixed, immutable dataset mapping each [`Category`] to an
//! ordered list of [`Condition`] records. The default dataset is compiled in
//! (`data.yaml`); an external YAML file with the same shape can be loaded
//! instead. Both paths go through the same pipeline: read, parse,
//! deserialize, validate, freeze.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, IssueSeverity, ValidationIssue};

/// The compiled-in dataset.
const EMBEDDED_DATA: &str = include_str!("data.yaml");

/// Source name used in errors for the embedded dataset.
const EMBEDDED_SOURCE: &str = "<embedded>";

// ============================================================================
// Category
// ============================================================================

/// The closed set of health-condition categories.
///
/// Variant order is display order; the serde representation is the kebab-case
/// slug used as the top-level key in catalog YAML.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Diseases transmitted by drinking contaminated water.
    WaterBorne,
    /// Parasitic infections acquired through water contact or ingestion.
    Parasitic,
    /// Illnesses driven by inadequate sanitation.
    SanitationRelated,
    /// Health impacts of not having enough water.
    WaterScarcity,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 4] = [
        Self::WaterBorne,
        Self::Parasitic,
        Self::SanitationRelated,
        Self::WaterScarcity,
    ];

    /// The kebab-case slug (matches the serde representation).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WaterBorne => "water-borne",
            Self::Parasitic => "parasitic",
            Self::SanitationRelated => "sanitation-related",
            Self::WaterScarcity => "water-scarcity",
        }
    }

    /// Human-readable category title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WaterBorne => "Water-Borne Diseases",
            Self::Parasitic => "Parasitic Infections",
            Self::SanitationRelated => "Sanitation-Related",
            Self::WaterScarcity => "Water Scarcity Issues",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Severity
// ============================================================================

/// Severity classification of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Life-threatening or blinding without treatment.
    High,
    /// Significant illness, usually recoverable with care.
    Medium,
    /// Uncomfortable but rarely dangerous.
    Low,
}

impl Severity {
    /// Badge label as shown to users.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Condition
// ============================================================================

/// One health-condition record.
///
/// Every field is required and every list is non-empty; the validator
/// enforces this for external files and the unit tests enforce it for the
/// embedded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Display name, unique within its category.
    pub name: String,
    /// One-paragraph description.
    pub description: String,
    /// Ordered list of causes.
    pub causes: Vec<String>,
    /// Ordered list of symptoms.
    pub symptoms: Vec<String>,
    /// Ordered list of treatments and remedies.
    pub remedies: Vec<String>,
    /// Ordered list of prevention measures.
    pub prevention: Vec<String>,
    /// Severity classification.
    pub severity: Severity,
    /// Presentation hint: an emoji or icon token.
    pub icon: String,
    /// Presentation hint: a CSS color.
    pub color: String,
}

// ============================================================================
// Catalog
// ============================================================================

/// Immutable category-to-conditions lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    by_category: BTreeMap<Category, Vec<Condition>>,
}

impl Catalog {
    /// Loads and validates the compiled-in dataset.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the embedded YAML fails to parse or
    /// validate. Both would indicate a packaging defect; the unit tests
    /// guard against shipping one.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_yaml(EMBEDDED_DATA, EMBEDDED_SOURCE)
    }

    /// Loads and validates a catalog from an external YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file is missing, fails to parse,
    /// or fails validation.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|_| CatalogError::MissingFile {
            path: path.to_path_buf(),
        })?;
        Self::from_yaml(&raw, &path.display().to_string())
    }

    /// Parses and validates catalog YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on parse failure or validation failure.
    pub fn from_yaml(raw: &str, source_name: &str) -> Result<Self, CatalogError> {
        let catalog: Self =
            serde_yaml::from_str(raw).map_err(|e| CatalogError::ParseError {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;

        let errors = catalog.validate();
        if errors.is_empty() {
            Ok(catalog)
        } else {
            Err(CatalogError::Invalid {
                source_name: source_name.to_string(),
                errors,
            })
        }
    }

    /// The ordered condition list for a category.
    ///
    /// Validation guarantees every category is present, so this only returns
    /// an empty slice for a catalog that bypassed validation.
    #[must_use]
    pub fn conditions(&self, category: Category) -> &[Condition] {
        self.by_category
            .get(&category)
            .map_or(&[], Vec::as_slice)
    }

    /// Looks up a condition by name within a category.
    #[must_use]
    pub fn find(&self, category: Category, name: &str) -> Option<&Condition> {
        self.conditions(category).iter().find(|c| c.name == name)
    }

    /// Total number of conditions across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    /// Returns `true` if the catalog holds no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates the catalog, collecting every issue rather than stopping at
    /// the first.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut errors = Vec::new();

        for category in Category::ALL {
            let Some(conditions) = self.by_category.get(&category) else {
                error(&mut errors, category.as_str(), "category is missing");
                continue;
            };
            if conditions.is_empty() {
                error(&mut errors, category.as_str(), "category has no conditions");
                continue;
            }

            let mut seen = std::collections::HashSet::new();
            for (index, condition) in conditions.iter().enumerate() {
                let at = |field: &str| format!("{}[{index}].{field}", category.as_str());

                if condition.name.trim().is_empty() {
                    error(&mut errors, &at("name"), "name is empty");
                } else if !seen.insert(condition.name.as_str()) {
                    error(
                        &mut errors,
                        &at("name"),
                        &format!("duplicate condition name '{}'", condition.name),
                    );
                }
                if condition.description.trim().is_empty() {
                    error(&mut errors, &at("description"), "description is empty");
                }
                if condition.icon.trim().is_empty() {
                    error(&mut errors, &at("icon"), "icon is empty");
                }
                if condition.color.trim().is_empty() {
                    error(&mut errors, &at("color"), "color is empty");
                }

                for (field, list) in [
                    ("causes", &condition.causes),
                    ("symptoms", &condition.symptoms),
                    ("remedies", &condition.remedies),
                    ("prevention", &condition.prevention),
                ] {
                    if list.is_empty() {
                        error(&mut errors, &at(field), "list is empty");
                    } else if list.iter().any(|entry| entry.trim().is_empty()) {
                        error(&mut errors, &at(field), "list contains an empty entry");
                    }
                }
            }
        }

        errors
    }
}

fn error(errors: &mut Vec<ValidationIssue>, path: &str, message: &str) {
    errors.push(ValidationIssue {
        path: path.to_string(),
        message: message.to_string(),
        severity: IssueSeverity::Error,
    });
}

// ============================================================================
// Tests
// ============================================================================
