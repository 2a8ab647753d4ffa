use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::question_service::QuestionService;
use super::session_service::{close_session, ensure_active, load_owned};
use crate::config::GameConfig;
use crate::engine::scoring::{multiplier, score_answer, StreakLevel, StreakState};
use crate::error::{GameError, GameResult};
use crate::metrics::ANSWERS_SUBMITTED_TOTAL;
use crate::models::answer::{AnswerEvent, AnswerFeedback, SubmitAnswerRequest, SubmitAnswerResponse};
use crate::models::question::QuestionExplanation;
use crate::models::{CurrentQuestion, EndReason, SessionUpdate};
use crate::store::GameStore;

pub struct AnswerService {
    store: Arc<dyn GameStore>,
    game: GameConfig,
}

impl AnswerService {
    pub fn new(store: Arc<dyn GameStore>, game: GameConfig) -> Self {
        Self { store, game }
    }

    pub async fn submit_answer(
        &self,
        user_id: &str,
        session_id: &str,
        req: &SubmitAnswerRequest,
    ) -> GameResult<SubmitAnswerResponse> {
        req.validate()?;

        let mut session = load_owned(self.store.as_ref(), session_id, user_id).await?;
        ensure_active(&session)?;
        let current = session.current_question.clone().ok_or_else(|| {
            GameError::InvalidTransition(format!("session {} has no pending question", session_id))
        })?;

        if let Some(selected) = &req.selected_id {
            if !current.has_option(selected) {
                return Err(GameError::InvalidOption(format!(
                    "{} is not an option of the current question",
                    selected
                )));
            }
        }

        let correct = req.selected_id.as_deref() == Some(current.correct_id.as_str());
        let outcome = match (&req.selected_id, correct) {
            (None, _) => "timeout",
            (Some(_), true) => "correct",
            (Some(_), false) => "incorrect",
        };

        let now = Utc::now();
        let response_time_ms = req.response_time_ms.unwrap_or_else(|| {
            u64::try_from((now - current.presented_at).num_milliseconds()).unwrap_or(0)
        });

        let scored = score_answer(
            StreakState {
                score: session.score,
                current_streak: session.current_streak,
                highest_streak: session.highest_streak,
                total_correct: session.total_questions,
            },
            correct,
        );

        let event = AnswerEvent {
            id: Uuid::new_v4().to_string(),
            session_id: session.id.clone(),
            user_id: user_id.to_string(),
            question_id: current.correct_id.clone(),
            selected_id: req.selected_id.clone(),
            correct,
            response_time_ms,
            lifelines_used: current.lifelines_used.clone(),
            points_awarded: scored.points_awarded,
            streak_after: scored.state.current_streak,
            created_at: now,
        };
        self.store.record_answer_event(&event).await?;
        ANSWERS_SUBMITTED_TOTAL.with_label_values(&[outcome]).inc();

        let state = scored.state;
        let scoring_update = SessionUpdate {
            score: Some(state.score),
            total_questions: Some(state.total_correct),
            current_streak: Some(state.current_streak),
            highest_streak: Some(state.highest_streak),
            ..Default::default()
        };
        scoring_update.clone().apply(&mut session);

        tracing::info!(
            %session_id,
            %user_id,
            outcome,
            points = scored.points_awarded,
            streak = state.current_streak,
            score = state.score,
            "Answer scored"
        );

        let mut response = SubmitAnswerResponse {
            correct,
            points_awarded: scored.points_awarded,
            score: state.score,
            current_streak: state.current_streak,
            highest_streak: state.highest_streak,
            multiplier: multiplier(state.current_streak),
            streak_level: StreakLevel::for_streak(state.current_streak).label(),
            game_over: false,
            end_reason: None,
            next_question: None,
            feedback: None,
            summary: None,
        };

        if !correct {
            let reason = if req.selected_id.is_none() {
                EndReason::Timeout
            } else {
                EndReason::WrongAnswer
            };
            // The missed question is cleared with the score so it cannot be answered again.
            let ending = SessionUpdate {
                current_question: Some(None),
                ..scoring_update
            };
            self.store.update_session(&session.id, ending).await?;
            let summary = close_session(self.store.as_ref(), &session, reason).await?;
            let feedback = self.feedback(&current, req.selected_id.as_deref()).await;

            response.game_over = true;
            response.end_reason = Some(reason);
            response.feedback = Some(feedback);
            response.summary = Some(summary);
            return Ok(response);
        }

        let questions = QuestionService::new(self.store.clone(), self.game.clone());
        match questions.generate(&session, "next").await {
            Ok(next) => {
                let update = SessionUpdate {
                    asked_questions: next.update.asked_questions,
                    used_colors: next.update.used_colors,
                    current_question: next.update.current_question,
                    ..scoring_update
                };
                self.store.update_session(&session.id, update).await?;
                response.next_question = Some(next.question);
            }
            Err(GameError::InsufficientContent(_)) => {
                self.store
                    .update_session(&session.id, scoring_update)
                    .await?;
                let summary =
                    close_session(self.store.as_ref(), &session, EndReason::PoolExhausted).await?;

                response.game_over = true;
                response.end_reason = Some(EndReason::PoolExhausted);
                response.summary = Some(summary);
            }
            Err(e) => return Err(e),
        }

        Ok(response)
    }

    /// Names and explanations for the answer and the player's pick. Falls back
    /// to the option names when the explanation lookup fails.
    async fn feedback(&self, current: &CurrentQuestion, selected_id: Option<&str>) -> AnswerFeedback {
        let option_name = |id: &str| {
            current
                .options
                .iter()
                .find(|o| o.id == id)
                .map(|o| o.name.clone())
        };

        let correct = self.explanation(&current.correct_id).await;
        let correct_name = correct
            .as_ref()
            .map(|c| c.name.clone())
            .or_else(|| option_name(&current.correct_id))
            .unwrap_or_default();

        let (selected_name, selected_explanation) = match selected_id {
            Some(id) => {
                let selected = self.explanation(id).await;
                (
                    selected.as_ref().map(|s| s.name.clone()).or_else(|| option_name(id)),
                    selected.and_then(|s| s.explanation),
                )
            }
            None => (None, None),
        };

        AnswerFeedback {
            correct_name,
            correct_explanation: correct.and_then(|c| c.explanation),
            selected_name,
            selected_explanation,
        }
    }

    async fn explanation(&self, question_id: &str) -> Option<QuestionExplanation> {
        match self.store.get_question_explanation(question_id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(%question_id, error = %e, "Explanation lookup failed");
                None
            }
        }
    }
}
