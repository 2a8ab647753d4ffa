use serde::{Deserialize, Serialize};

/// Binary classifier used only to group distractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    #[default]
    Regular,
    /// Pseudo-category pulling from every active regular category.
    AllCategories,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: CategoryKind,
    /// Controls inclusion in quiz play (and in the all-categories union).
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Homepage visibility. Not consulted by question generation.
    #[serde(default = "default_true")]
    pub show_on_homepage: bool,
}

fn default_true() -> bool {
    true
}

impl Category {
    pub fn is_all_categories(&self) -> bool {
        self.kind == CategoryKind::AllCategories
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionVariant {
    pub image_url: String,
    /// Colour tag, e.g. "indigo".
    pub tag: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub variants: Vec<QuestionVariant>,
    /// Single image used when the record has no variants.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    pub category_id: String,
    pub gender: Gender,
    #[serde(default)]
    pub fit_category: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl QuestionRecord {
    /// Number of distinct presentations; a record without variants still
    /// counts its fallback image as one.
    pub fn variant_count(&self) -> usize {
        self.variants.len().max(1)
    }

    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn fallback_image(&self) -> String {
        self.image_url
            .clone()
            .or_else(|| {
                self.variants
                    .iter()
                    .find(|v| v.is_primary)
                    .or_else(|| self.variants.first())
                    .map(|v| v.image_url.clone())
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionExplanation {
    pub name: String,
    pub explanation: Option<String>,
}

/// One selectable answer as the client sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub name: String,
    pub image_url: String,
    #[serde(default)]
    pub color: String,
}

/// Client-facing projection of a question. The correct id stays on the
/// session record and is never serialized here.
#[derive(Debug, Clone, Serialize)]
pub struct PresentedQuestion {
    #[serde(skip_serializing)]
    pub correct_id: String,
    pub prompt: String,
    pub image_url: String,
    pub color: String,
    pub options: Vec<QuestionOption>,
    pub time_limit_seconds: u32,
}

/// Seed file accepted by the in-memory store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}
