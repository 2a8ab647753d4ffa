use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use super::question_service::QuestionService;
use crate::config::GameConfig;
use crate::engine::OPTIONS_PER_QUESTION;
use crate::error::{GameError, GameResult};
use crate::metrics::{record_session_ended, record_session_started};
use crate::models::{
    EndReason, GameSession, SessionSummary, SessionView, StartSessionRequest,
    StartSessionResponse,
};
use crate::store::GameStore;

/// Loads a session and checks that `user_id` owns it.
pub(crate) async fn load_owned(
    store: &dyn GameStore,
    session_id: &str,
    user_id: &str,
) -> GameResult<GameSession> {
    let session = store
        .get_session(session_id)
        .await?
        .ok_or_else(|| GameError::SessionNotFound(session_id.to_string()))?;

    if session.user_id != user_id {
        tracing::warn!(%session_id, %user_id, "Session accessed by non-owner");
        return Err(GameError::Forbidden);
    }
    Ok(session)
}

pub(crate) fn ensure_active(session: &GameSession) -> GameResult<()> {
    if session.is_active() {
        Ok(())
    } else {
        Err(GameError::InvalidTransition(format!(
            "session {} has already ended",
            session.id
        )))
    }
}

/// Ends `session` with `reason`. The summary reflects the in-memory session,
/// so callers pass the copy that already carries the latest score.
pub(crate) async fn close_session(
    store: &dyn GameStore,
    session: &GameSession,
    reason: EndReason,
) -> GameResult<SessionSummary> {
    let ended_at = Utc::now();
    let summary = SessionSummary::from_closed(session, ended_at, reason);
    store
        .close_session(&session.id, ended_at, summary.duration_seconds, reason)
        .await?;
    record_session_ended(reason.as_str());

    tracing::info!(
        session_id = %session.id,
        user_id = %session.user_id,
        score = summary.score,
        highest_streak = summary.highest_streak,
        reason = reason.as_str(),
        "Session ended"
    );
    Ok(summary)
}

pub struct SessionService {
    store: Arc<dyn GameStore>,
    game: GameConfig,
}

impl SessionService {
    pub fn new(store: Arc<dyn GameStore>, game: GameConfig) -> Self {
        Self { store, game }
    }

    pub async fn start(
        &self,
        user_id: &str,
        req: &StartSessionRequest,
    ) -> GameResult<StartSessionResponse> {
        req.validate()?;

        let category = self
            .store
            .get_category(&req.category_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| GameError::CategoryNotFound(req.category_id.clone()))?;

        let questions = QuestionService::new(self.store.clone(), self.game.clone());
        let content = questions.load_content(&category).await?;

        let eligible = content.scope.len();
        if eligible < OPTIONS_PER_QUESTION {
            tracing::warn!(
                category_id = %category.id,
                eligible,
                "Category has too few active questions to start"
            );
            return Err(GameError::InsufficientContent(format!(
                "category {} has {} active questions, at least {} are required",
                category.id, eligible, OPTIONS_PER_QUESTION
            )));
        }

        let mut session = self
            .store
            .create_session(user_id, &category.id, eligible as u32)
            .await?;
        record_session_started();

        let generated = match questions.assemble(&content, &session, "start") {
            Ok(generated) => generated,
            Err(e) => {
                close_session(self.store.as_ref(), &session, EndReason::PoolExhausted).await?;
                return Err(e);
            }
        };

        self.store
            .update_session(&session.id, generated.update.clone())
            .await?;
        generated.update.apply(&mut session);

        tracing::info!(
            session_id = %session.id,
            %user_id,
            category_id = %category.id,
            eligible,
            "Session started"
        );

        Ok(StartSessionResponse {
            session: SessionView::from(&session),
            question: generated.question,
        })
    }

    pub async fn get(&self, user_id: &str, session_id: &str) -> GameResult<SessionView> {
        let session = load_owned(self.store.as_ref(), session_id, user_id).await?;
        Ok(SessionView::from(&session))
    }

    /// Player-initiated end.
    pub async fn complete(&self, user_id: &str, session_id: &str) -> GameResult<SessionSummary> {
        let session = load_owned(self.store.as_ref(), session_id, user_id).await?;
        ensure_active(&session)?;
        close_session(self.store.as_ref(), &session, EndReason::PlayerQuit).await
    }
}
