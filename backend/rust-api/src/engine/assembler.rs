use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::distractors::select_distractors;
use super::pool::filter_available;
use super::variant::{pick_unasked_variant, pick_variant, remember_tag};
use crate::error::{GameError, GameResult};
use crate::models::question::{PresentedQuestion, QuestionOption, QuestionRecord};
use crate::models::AskedCombination;

/// Inputs for building one question.
pub struct QuestionContext<'a> {
    /// Active questions of the session's category set.
    pub scope: &'a [QuestionRecord],
    /// Every active question, used to relax distractor selection.
    pub distractor_pool: &'a [QuestionRecord],
    pub asked: &'a [AskedCombination],
    pub used_colors: &'a [String],
    pub prompt: &'a str,
    pub time_limit_seconds: u32,
}

/// A built question plus the session history it implies.
#[derive(Debug, Clone)]
pub struct AssembledQuestion {
    pub question: PresentedQuestion,
    pub asked: Vec<AskedCombination>,
    pub used_colors: Vec<String>,
}

pub fn assemble_question<R: Rng + ?Sized>(
    ctx: &QuestionContext<'_>,
    rng: &mut R,
) -> GameResult<AssembledQuestion> {
    let eligible = filter_available(ctx.scope, ctx.asked);
    let correct = *eligible.choose(rng).ok_or_else(|| {
        GameError::InsufficientContent("every question in this category has been asked".into())
    })?;

    let mut used_colors = ctx.used_colors.to_vec();
    let shown = pick_unasked_variant(correct, ctx.asked, &used_colors, rng);
    remember_tag(&mut used_colors, &shown.tag);

    let distractors = select_distractors(correct, ctx.distractor_pool, rng)?;

    let mut options = vec![QuestionOption {
        id: correct.id.clone(),
        name: correct.name.clone(),
        image_url: shown.url.clone(),
        color: shown.tag.clone(),
    }];
    for distractor in distractors {
        let variant = pick_variant(distractor, &used_colors, rng);
        remember_tag(&mut used_colors, &variant.tag);
        options.push(QuestionOption {
            id: distractor.id.clone(),
            name: distractor.name.clone(),
            image_url: variant.url,
            color: variant.tag,
        });
    }
    options.shuffle(rng);

    let mut asked = ctx.asked.to_vec();
    asked.push(AskedCombination {
        question_id: correct.id.clone(),
        color: shown.tag.clone(),
    });

    Ok(AssembledQuestion {
        question: PresentedQuestion {
            correct_id: correct.id.clone(),
            prompt: ctx.prompt.to_string(),
            image_url: shown.url,
            color: shown.tag,
            options,
            time_limit_seconds: ctx.time_limit_seconds,
        },
        asked,
        used_colors,
    })
}
