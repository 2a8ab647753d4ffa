//! Persistence boundary. Services only talk to [`GameStore`]; the backend is
//! chosen at startup from configuration.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::answer::AnswerEvent;
use crate::models::question::{Category, QuestionExplanation, QuestionRecord};
use crate::models::{EndReason, GameSession, SessionUpdate};

pub mod memory;
pub mod mongo;

pub use memory::InMemoryStore;
pub use mongo::MongoStore;

#[async_trait]
pub trait GameStore: Send + Sync {
    async fn ping(&self) -> Result<()>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>>;

    /// Active questions belonging to any of `category_ids`.
    async fn list_active_questions(&self, category_ids: &[String]) -> Result<Vec<QuestionRecord>>;

    async fn get_session(&self, session_id: &str) -> Result<Option<GameSession>>;

    async fn create_session(
        &self,
        user_id: &str,
        category_id: &str,
        total_available: u32,
    ) -> Result<GameSession>;

    async fn update_session(&self, session_id: &str, update: SessionUpdate) -> Result<()>;

    async fn close_session(
        &self,
        session_id: &str,
        ended_at: DateTime<Utc>,
        duration_seconds: i64,
        reason: EndReason,
    ) -> Result<()>;

    async fn record_answer_event(&self, event: &AnswerEvent) -> Result<()>;

    async fn get_question_explanation(
        &self,
        question_id: &str,
    ) -> Result<Option<QuestionExplanation>>;

    /// Ended sessions, optionally restricted to one category.
    async fn list_ended_sessions(&self, category_id: Option<&str>) -> Result<Vec<GameSession>>;

    async fn list_user_sessions(&self, user_id: &str) -> Result<Vec<GameSession>>;

    async fn list_answer_events(&self, user_id: &str) -> Result<Vec<AnswerEvent>>;
}
