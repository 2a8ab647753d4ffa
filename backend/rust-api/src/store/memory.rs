use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::GameStore;
use crate::models::answer::AnswerEvent;
use crate::models::question::{Category, QuestionExplanation, QuestionRecord, SeedData};
use crate::models::{EndReason, GameSession, SessionUpdate};

/// Process-local store for development and tests. Content comes from a
/// JSON seed; sessions and answer events live only as long as the process.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    categories: Arc<RwLock<Vec<Category>>>,
    questions: Arc<RwLock<HashMap<String, QuestionRecord>>>,
    sessions: Arc<RwLock<HashMap<String, GameSession>>>,
    answer_events: Arc<RwLock<Vec<AnswerEvent>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: SeedData) -> Self {
        let questions = seed
            .questions
            .into_iter()
            .map(|q| (q.id.clone(), q))
            .collect();
        Self {
            categories: Arc::new(RwLock::new(seed.categories)),
            questions: Arc::new(RwLock::new(questions)),
            ..Self::default()
        }
    }

    pub fn from_seed_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path))?;
        let seed: SeedData = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse seed file {}", path))?;
        tracing::info!(
            %path,
            categories = seed.categories.len(),
            questions = seed.questions.len(),
            "Loaded in-memory seed"
        );
        Ok(Self::with_seed(seed))
    }

    pub async fn upsert_question(&self, question: QuestionRecord) {
        self.questions
            .write()
            .await
            .insert(question.id.clone(), question);
    }

    pub async fn upsert_category(&self, category: Category) {
        let mut categories = self.categories.write().await;
        categories.retain(|c| c.id != category.id);
        categories.push(category);
    }

    pub async fn answer_events_for_session(&self, session_id: &str) -> Vec<AnswerEvent> {
        self.answer_events
            .read()
            .await
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GameStore for InMemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.read().await.clone())
    }

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>> {
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .find(|c| c.id == category_id)
            .cloned())
    }

    async fn list_active_questions(&self, category_ids: &[String]) -> Result<Vec<QuestionRecord>> {
        let questions = self.questions.read().await;
        let mut found: Vec<QuestionRecord> = questions
            .values()
            .filter(|q| q.is_active && category_ids.contains(&q.category_id))
            .cloned()
            .collect();
        // HashMap order is arbitrary; keep listings stable.
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<GameSession>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn create_session(
        &self,
        user_id: &str,
        category_id: &str,
        total_available: u32,
    ) -> Result<GameSession> {
        let session = GameSession::new(user_id, category_id, total_available);
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn update_session(&self, session_id: &str, update: SessionUpdate) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .with_context(|| format!("Session {} vanished during update", session_id))?;
        update.apply(session);
        Ok(())
    }

    async fn close_session(
        &self,
        session_id: &str,
        ended_at: DateTime<Utc>,
        duration_seconds: i64,
        reason: EndReason,
    ) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .with_context(|| format!("Session {} vanished during close", session_id))?;
        session.ended_at = Some(ended_at);
        session.duration_seconds = Some(duration_seconds);
        session.end_reason = Some(reason);
        session.current_question = None;
        Ok(())
    }

    async fn record_answer_event(&self, event: &AnswerEvent) -> Result<()> {
        self.answer_events.write().await.push(event.clone());
        Ok(())
    }

    async fn get_question_explanation(
        &self,
        question_id: &str,
    ) -> Result<Option<QuestionExplanation>> {
        Ok(self
            .questions
            .read()
            .await
            .get(question_id)
            .map(|q| QuestionExplanation {
                name: q.name.clone(),
                explanation: q.explanation.clone(),
            }))
    }

    async fn list_ended_sessions(&self, category_id: Option<&str>) -> Result<Vec<GameSession>> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| !s.is_active())
            .filter(|s| category_id.map_or(true, |c| s.category_id == c))
            .cloned()
            .collect())
    }

    async fn list_user_sessions(&self, user_id: &str) -> Result<Vec<GameSession>> {
        let mut sessions: Vec<GameSession> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(sessions)
    }

    async fn list_answer_events(&self, user_id: &str) -> Result<Vec<AnswerEvent>> {
        Ok(self
            .answer_events
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }
}
