use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::engine::assembler::{assemble_question, QuestionContext};
use crate::error::{GameError, GameResult};
use crate::metrics::QUESTION_GENERATION_FAILURES_TOTAL;
use crate::models::question::{Category, CategoryKind, PresentedQuestion, QuestionRecord};
use crate::models::{CurrentQuestion, GameSession, SessionUpdate};
use crate::store::GameStore;

/// Active questions a session draws from.
pub struct QuestionContent {
    /// Records of the session's category set.
    pub scope: Vec<QuestionRecord>,
    /// Every active record of every active regular category, plus the scope.
    pub pool: Vec<QuestionRecord>,
}

/// A presented question plus the session fields it changes.
pub struct GeneratedQuestion {
    pub question: PresentedQuestion,
    pub update: SessionUpdate,
}

pub struct QuestionService {
    store: Arc<dyn GameStore>,
    game: GameConfig,
}

impl QuestionService {
    pub fn new(store: Arc<dyn GameStore>, game: GameConfig) -> Self {
        Self { store, game }
    }

    /// Loads scope and distractor pool for `category` in one store query.
    pub async fn load_content(&self, category: &Category) -> GameResult<QuestionContent> {
        let regular_ids: Vec<String> = self
            .store
            .list_categories()
            .await?
            .into_iter()
            .filter(|c| c.is_active && c.kind == CategoryKind::Regular)
            .map(|c| c.id)
            .collect();

        let scope_ids = if category.is_all_categories() {
            regular_ids.clone()
        } else {
            vec![category.id.clone()]
        };

        let mut wanted = regular_ids;
        for id in &scope_ids {
            if !wanted.contains(id) {
                wanted.push(id.clone());
            }
        }

        let pool = self.store.list_active_questions(&wanted).await?;
        let scope = pool
            .iter()
            .filter(|q| scope_ids.contains(&q.category_id))
            .cloned()
            .collect();

        Ok(QuestionContent { scope, pool })
    }

    /// Builds the next question for `session` from already loaded content.
    /// `stage` labels the failure metric (start, next, skip).
    pub fn assemble(
        &self,
        content: &QuestionContent,
        session: &GameSession,
        stage: &str,
    ) -> GameResult<GeneratedQuestion> {
        let ctx = QuestionContext {
            scope: &content.scope,
            distractor_pool: &content.pool,
            asked: &session.asked_questions,
            used_colors: &session.used_colors,
            prompt: &self.game.question_prompt,
            time_limit_seconds: self.game.time_limit_seconds,
        };

        let mut rng = StdRng::from_os_rng();
        let built = match assemble_question(&ctx, &mut rng) {
            Ok(built) => built,
            Err(e) => {
                if matches!(e, GameError::InsufficientContent(_)) {
                    QUESTION_GENERATION_FAILURES_TOTAL
                        .with_label_values(&[stage])
                        .inc();
                }
                tracing::info!(session_id = %session.id, stage, "Question generation failed: {}", e);
                return Err(e);
            }
        };

        tracing::debug!(
            session_id = %session.id,
            asked = built.asked.len(),
            color = %built.question.color,
            "Question assembled"
        );

        let current = CurrentQuestion::from_presented(&built.question, Utc::now());
        Ok(GeneratedQuestion {
            question: built.question,
            update: SessionUpdate {
                asked_questions: Some(built.asked),
                used_colors: Some(built.used_colors),
                current_question: Some(Some(current)),
                ..Default::default()
            },
        })
    }

    /// Loads the session's category and builds its next question.
    pub async fn generate(&self, session: &GameSession, stage: &str) -> GameResult<GeneratedQuestion> {
        let category = self
            .store
            .get_category(&session.category_id)
            .await?
            .ok_or_else(|| GameError::CategoryNotFound(session.category_id.clone()))?;
        let content = self.load_content(&category).await?;
        self.assemble(&content, session, stage)
    }
}
