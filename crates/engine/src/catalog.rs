//! Reference catalogs - read-only master data fetched once at session start.
//!
//! Rows hold foreign keys into these catalogs, never copies; display
//! names are resolved at render time. Without the catalogs no row can be
//! defaulted, so a failed fetch is fatal to entering the screen.

use serde::{Deserialize, Serialize};

use crate::entry::DEFAULT_DISPLAY_SECS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionType {
    pub id: String,
    pub name: String,
    /// Default notice text applied to rows of this inspection type.
    #[serde(default)]
    pub notice_text: String,
    /// Default display duration; `None` falls back to the fixed constant.
    #[serde(default)]
    pub display_secs: Option<u32>,
    /// Template image bound when the row's poster type is `template`.
    #[serde(default)]
    pub template_image_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateImage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// The full read-only snapshot, one fetch per session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalogs {
    pub properties: Vec<Property>,
    pub vendors: Vec<Vendor>,
    pub inspection_types: Vec<InspectionType>,
    pub categories: Vec<Category>,
    pub template_images: Vec<TemplateImage>,
}

impl Catalogs {
    pub fn property(&self, code: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.code == code)
    }

    pub fn vendor(&self, id: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }

    pub fn inspection_type(&self, id: &str) -> Option<&InspectionType> {
        self.inspection_types.iter().find(|t| t.id == id)
    }

    pub fn template_image(&self, id: &str) -> Option<&TemplateImage> {
        self.template_images.iter().find(|t| t.id == id)
    }

    /// Default display duration for an inspection type, falling back to
    /// the fixed constant when the catalog has none.
    pub fn display_secs_for(&self, inspection_type_id: &str) -> u32 {
        self.inspection_type(inspection_type_id)
            .and_then(|t| t.display_secs)
            .unwrap_or(DEFAULT_DISPLAY_SECS)
    }
}
