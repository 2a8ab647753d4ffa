use rand::seq::IndexedRandom;
use rand::Rng;

use super::DISTRACTORS_PER_QUESTION;
use crate::error::{GameError, GameResult};
use crate::models::question::QuestionRecord;

type Predicate = fn(&QuestionRecord, &QuestionRecord) -> bool;

/// Candidate pools, tried in order until one holds enough records.
const STRATEGIES: &[(&str, Predicate)] = &[
    ("same_gender_same_category", same_gender_same_category),
    ("same_gender", same_gender),
    ("same_category", same_category),
];

fn same_gender_same_category(correct: &QuestionRecord, q: &QuestionRecord) -> bool {
    same_gender(correct, q) && same_category(correct, q)
}

fn same_gender(correct: &QuestionRecord, q: &QuestionRecord) -> bool {
    q.gender == correct.gender
}

fn same_category(correct: &QuestionRecord, q: &QuestionRecord) -> bool {
    q.category_id == correct.category_id
}

/// Picks two wrong options for `correct` out of `pool`. The first shares the
/// answer's fit when possible, the second has a different fit when possible.
pub fn select_distractors<'a, R: Rng + ?Sized>(
    correct: &QuestionRecord,
    pool: &'a [QuestionRecord],
    rng: &mut R,
) -> GameResult<[&'a QuestionRecord; 2]> {
    let (strategy, candidates) = candidate_pool(correct, pool).ok_or_else(|| {
        GameError::InsufficientContent(format!(
            "fewer than {} distractors available for question {}",
            DISTRACTORS_PER_QUESTION, correct.id
        ))
    })?;
    tracing::debug!(
        question_id = %correct.id,
        strategy,
        candidates = candidates.len(),
        "Selecting distractors"
    );

    let same_fit: Vec<&QuestionRecord> = candidates
        .iter()
        .copied()
        .filter(|q| q.fit_category == correct.fit_category)
        .collect();
    let first = *same_fit
        .choose(rng)
        .or_else(|| candidates.choose(rng))
        .ok_or_else(|| GameError::InsufficientContent("empty distractor pool".to_string()))?;

    let remaining: Vec<&QuestionRecord> = candidates
        .iter()
        .copied()
        .filter(|q| q.id != first.id)
        .collect();
    let other_fit: Vec<&QuestionRecord> = remaining
        .iter()
        .copied()
        .filter(|q| q.fit_category != correct.fit_category)
        .collect();
    let second = *other_fit
        .choose(rng)
        .or_else(|| remaining.choose(rng))
        .ok_or_else(|| GameError::InsufficientContent("empty distractor pool".to_string()))?;

    Ok([first, second])
}

/// First strategy yielding at least two candidates, with its name.
fn candidate_pool<'a>(
    correct: &QuestionRecord,
    pool: &'a [QuestionRecord],
) -> Option<(&'static str, Vec<&'a QuestionRecord>)> {
    STRATEGIES.iter().find_map(|(name, matches)| {
        let candidates: Vec<&QuestionRecord> = pool
            .iter()
            .filter(|q| q.is_active && q.id != correct.id)
            .filter(|q| matches(correct, q))
            .collect();
        (candidates.len() >= DISTRACTORS_PER_QUESTION).then_some((*name, candidates))
    })
}
