use std::collections::HashSet;

use crate::models::question::QuestionRecord;
use crate::models::AskedCombination;

/// Distinct colours of `record` already shown in this session.
pub fn asked_variant_count(record: &QuestionRecord, asked: &[AskedCombination]) -> usize {
    asked
        .iter()
        .filter(|a| a.question_id == record.id)
        .map(|a| a.color.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Records that still have at least one presentation left to ask.
pub fn filter_available<'a>(
    questions: &'a [QuestionRecord],
    asked: &[AskedCombination],
) -> Vec<&'a QuestionRecord> {
    questions
        .iter()
        .filter(|q| q.is_active)
        .filter(|q| asked_variant_count(q, asked) < q.variant_count())
        .collect()
}
