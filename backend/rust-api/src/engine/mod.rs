//! Pure game logic: no I/O, randomness injected by the caller.

pub mod assembler;
pub mod distractors;
pub mod pool;
pub mod scoring;
pub mod variant;

/// Options shown per question: one correct answer and two distractors.
pub const OPTIONS_PER_QUESTION: usize = 3;
pub const DISTRACTORS_PER_QUESTION: usize = OPTIONS_PER_QUESTION - 1;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::question::{Gender, QuestionRecord, QuestionVariant};

    pub fn record(id: &str, category: &str, gender: Gender, fit: Option<&str>) -> QuestionRecord {
        QuestionRecord {
            id: id.to_string(),
            name: format!("Product {}", id),
            variants: Vec::new(),
            image_url: Some(format!("https://cdn.test/{}.jpg", id)),
            explanation: Some(format!("{} explained", id)),
            category_id: category.to_string(),
            gender,
            fit_category: fit.map(str::to_string),
            is_active: true,
        }
    }

    pub fn with_colors(mut record: QuestionRecord, colors: &[&str]) -> QuestionRecord {
        record.variants = colors
            .iter()
            .enumerate()
            .map(|(i, c)| QuestionVariant {
                image_url: format!("https://cdn.test/{}-{}.jpg", record.id, c),
                tag: c.to_string(),
                is_primary: i == 0,
            })
            .collect();
        record
    }
}
