use rand::seq::IndexedRandom;
use rand::Rng;

use crate::models::question::{QuestionRecord, QuestionVariant};
use crate::models::AskedCombination;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedVariant {
    pub url: String,
    /// Empty when the record has no variants.
    pub tag: String,
}

impl PickedVariant {
    fn from_variant(variant: &QuestionVariant) -> Self {
        Self {
            url: variant.image_url.clone(),
            tag: variant.tag.clone(),
        }
    }

    fn fallback(record: &QuestionRecord) -> Self {
        Self {
            url: record.fallback_image(),
            tag: String::new(),
        }
    }
}

/// Picks a presentation colour, preferring colours not yet shown this
/// session. Once every colour has been used, any colour may repeat.
pub fn pick_variant<R: Rng + ?Sized>(
    record: &QuestionRecord,
    used_tags: &[String],
    rng: &mut R,
) -> PickedVariant {
    let all: Vec<&QuestionVariant> = record.variants.iter().collect();
    pick_preferring_unused(record, &all, used_tags, rng)
}

/// Same as [`pick_variant`], restricted to colours of `record` that have not
/// been asked yet, so the resulting (question, colour) pair is new.
pub fn pick_unasked_variant<R: Rng + ?Sized>(
    record: &QuestionRecord,
    asked: &[AskedCombination],
    used_tags: &[String],
    rng: &mut R,
) -> PickedVariant {
    let unasked: Vec<&QuestionVariant> = record
        .variants
        .iter()
        .filter(|v| {
            !asked
                .iter()
                .any(|a| a.question_id == record.id && a.color == v.tag)
        })
        .collect();

    if unasked.is_empty() {
        return pick_variant(record, used_tags, rng);
    }
    pick_preferring_unused(record, &unasked, used_tags, rng)
}

fn pick_preferring_unused<R: Rng + ?Sized>(
    record: &QuestionRecord,
    variants: &[&QuestionVariant],
    used_tags: &[String],
    rng: &mut R,
) -> PickedVariant {
    let fresh: Vec<&QuestionVariant> = variants
        .iter()
        .copied()
        .filter(|v| !used_tags.contains(&v.tag))
        .collect();

    fresh
        .choose(rng)
        .or_else(|| variants.choose(rng))
        .map(|v| PickedVariant::from_variant(v))
        .unwrap_or_else(|| PickedVariant::fallback(record))
}

/// Appends a newly shown colour to the session's used list.
pub fn remember_tag(used_tags: &mut Vec<String>, tag: &str) {
    if !tag.is_empty() && !used_tags.iter().any(|t| t == tag) {
        used_tags.push(tag.to_string());
    }
}
