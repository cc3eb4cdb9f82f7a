//! Persisted component records and the partial updates sent back to the store.
//!
//! Field names follow the document store's camelCase layout so that records
//! exported from the marketplace database deserialize directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque identifier assigned by the persistence collaborator.
pub type ComponentId = String;

/// Package name → version string.
pub type DependencyMap = BTreeMap<String, String>;

/// Catalog identifier used for the component file path when a record has none.
pub const FALLBACK_SLUG: &str = "component";

/// A component as stored by the external document database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    pub id: ComponentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Catalog slug, e.g. "gradient-button". Forks keep the slug of their origin.
    #[serde(default, alias = "componentId", alias = "catalogComponentId")]
    pub catalog_id: Option<String>,
    #[serde(alias = "code")]
    pub source: String,
    #[serde(alias = "previewCode")]
    pub usage_source: String,
    #[serde(default, alias = "globalCss")]
    pub stylesheet: Option<String>,
    #[serde(default)]
    pub dependencies: Option<DependencyMap>,
    #[serde(default)]
    pub registry_dependencies: Option<Vec<String>>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    /// Milliseconds since the epoch at which the record was moved to the trash.
    #[serde(default)]
    pub deleted_at: Option<u64>,
}

impl ComponentRecord {
    /// Slug used to derive the component's file path inside the virtual project.
    pub fn slug(&self) -> &str {
        self.catalog_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(FALLBACK_SLUG)
    }

    /// Registry dependency identifiers, empty when the field is absent.
    pub fn registry_ids(&self) -> &[String] {
        self.registry_dependencies.as_deref().unwrap_or(&[])
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Partial update. `None` fields keep the value already stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPatch {
    pub source: Option<String>,
    pub usage_source: Option<String>,
    pub stylesheet: Option<String>,
    pub dependencies: Option<DependencyMap>,
}

impl ComponentPatch {
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.usage_source.is_none()
            && self.stylesheet.is_none()
            && self.dependencies.is_none()
    }

    /// Applies the patch to a record in place.
    pub fn apply_to(&self, record: &mut ComponentRecord) {
        if let Some(source) = &self.source {
            record.source = source.clone();
        }
        if let Some(usage) = &self.usage_source {
            record.usage_source = usage.clone();
        }
        if let Some(css) = &self.stylesheet {
            record.stylesheet = Some(css.clone());
        }
        if let Some(deps) = &self.dependencies {
            record.dependencies = Some(deps.clone());
        }
    }
}

/// Initial fields for a newly created record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComponent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub catalog_id: Option<String>,
    pub source: String,
    pub usage_source: String,
    pub stylesheet: Option<String>,
    pub dependencies: Option<DependencyMap>,
    pub registry_dependencies: Option<Vec<String>>,
    pub category: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl NewComponent {
    /// Builds the stored record once the store has assigned an id and owner.
    pub fn into_record(self, id: ComponentId, owner: Option<String>) -> ComponentRecord {
        ComponentRecord {
            id,
            name: self.name,
            description: self.description,
            catalog_id: self.catalog_id,
            source: self.source,
            usage_source: self.usage_source,
            stylesheet: self.stylesheet,
            dependencies: self.dependencies,
            registry_dependencies: self.registry_dependencies,
            owner,
            category: self.category,
            is_public: self.is_public,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ComponentRecord {
        NewComponent {
            name: "Button".to_string(),
            source: "export const Button = () => null".to_string(),
            usage_source: "export default () => null".to_string(),
            ..Default::default()
        }
        .into_record("c1".to_string(), None)
    }

    #[test]
    fn test_slug_falls_back_when_missing_or_blank() {
        let mut rec = record();
        assert_eq!(rec.slug(), FALLBACK_SLUG);
        rec.catalog_id = Some("  ".to_string());
        assert_eq!(rec.slug(), FALLBACK_SLUG);
        rec.catalog_id = Some("button".to_string());
        assert_eq!(rec.slug(), "button");
    }

    #[test]
    fn test_patch_keeps_omitted_fields() {
        let mut rec = record();
        let patch = ComponentPatch {
            usage_source: Some("export default () => <b/>".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut rec);
        assert_eq!(rec.source, "export const Button = () => null");
        assert_eq!(rec.usage_source, "export default () => <b/>");
        assert_eq!(rec.stylesheet, None);
    }

    #[test]
    fn test_deserializes_store_field_names() {
        let json = serde_json::json!({
            "id": "k1",
            "name": "Card",
            "componentId": "card",
            "code": "export function Card() {}",
            "previewCode": "export default function P() {}",
            "globalCss": ":root {}",
            "registryDependencies": ["button"]
        });
        let rec: ComponentRecord = serde_json::from_value(json).unwrap();
        assert_eq!(rec.slug(), "card");
        assert_eq!(rec.stylesheet.as_deref(), Some(":root {}"));
        assert_eq!(rec.registry_ids(), ["button".to_string()]);
        assert!(!rec.is_deleted());
    }
}
