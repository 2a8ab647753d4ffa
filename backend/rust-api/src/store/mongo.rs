use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use serde::Serialize;

use super::GameStore;
use crate::metrics::track_db_operation;
use crate::models::answer::AnswerEvent;
use crate::models::question::{Category, QuestionExplanation, QuestionRecord};
use crate::models::{EndReason, GameSession, SessionUpdate};

const CATEGORIES: &str = "categories";
const QUESTIONS: &str = "questions";
const SESSIONS: &str = "game_sessions";
const ANSWER_EVENTS: &str = "answer_events";

pub struct MongoStore {
    mongo: Database,
}

impl MongoStore {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    fn categories(&self) -> Collection<Category> {
        self.mongo.collection(CATEGORIES)
    }

    fn questions(&self) -> Collection<QuestionRecord> {
        self.mongo.collection(QUESTIONS)
    }

    fn sessions(&self) -> Collection<GameSession> {
        self.mongo.collection(SESSIONS)
    }

    fn answer_events(&self) -> Collection<AnswerEvent> {
        self.mongo.collection(ANSWER_EVENTS)
    }

    /// Creates the indexes the game queries rely on. Safe to call on every boot.
    pub async fn ensure_indexes(&self) -> Result<()> {
        self.questions()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "category_id": 1, "is_active": 1 })
                    .build(),
            )
            .await
            .context("Failed to create questions index")?;

        self.sessions()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "user_id": 1, "started_at": -1 })
                    .build(),
            )
            .await
            .context("Failed to create game_sessions user index")?;

        self.sessions()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "ended_at": 1, "category_id": 1 })
                    .options(IndexOptions::builder().sparse(true).build())
                    .build(),
            )
            .await
            .context("Failed to create game_sessions ended index")?;

        self.answer_events()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "user_id": 1, "created_at": -1 })
                    .build(),
            )
            .await
            .context("Failed to create answer_events index")?;

        tracing::info!("MongoDB indexes ensured");
        Ok(())
    }
}

fn bson_of<T: Serialize>(field: &str, value: &T) -> Result<Bson> {
    to_bson(value).with_context(|| format!("Failed to serialize session field {}", field))
}

/// Builds the `$set` body for a partial session write.
pub(crate) fn session_update_document(update: &SessionUpdate) -> Result<Document> {
    let mut set = Document::new();
    if let Some(v) = update.score {
        set.insert("score", i64::from(v));
    }
    if let Some(v) = update.total_questions {
        set.insert("total_questions", i64::from(v));
    }
    if let Some(v) = update.current_streak {
        set.insert("current_streak", i64::from(v));
    }
    if let Some(v) = update.highest_streak {
        set.insert("highest_streak", i64::from(v));
    }
    if let Some(v) = update.lifeline_50_used {
        set.insert("lifeline_50_used", v);
    }
    if let Some(v) = update.lifeline_skip_used {
        set.insert("lifeline_skip_used", v);
    }
    if let Some(v) = &update.asked_questions {
        set.insert("asked_questions", bson_of("asked_questions", v)?);
    }
    if let Some(v) = &update.used_colors {
        set.insert("used_colors", bson_of("used_colors", v)?);
    }
    if let Some(v) = &update.current_question {
        set.insert("current_question", bson_of("current_question", v)?);
    }
    Ok(set)
}

#[async_trait]
impl GameStore for MongoStore {
    async fn ping(&self) -> Result<()> {
        self.mongo
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        track_db_operation("find", CATEGORIES, async {
            let cursor = self
                .categories()
                .find(doc! {})
                .sort(doc! { "name": 1 })
                .await
                .context("Failed to query categories")?;
            cursor
                .try_collect()
                .await
                .context("Failed to collect categories")
        })
        .await
    }

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>> {
        track_db_operation("find_one", CATEGORIES, async {
            self.categories()
                .find_one(doc! { "_id": category_id })
                .await
                .context("Failed to query category")
        })
        .await
    }

    async fn list_active_questions(&self, category_ids: &[String]) -> Result<Vec<QuestionRecord>> {
        let filter = doc! {
            "category_id": { "$in": category_ids.to_vec() },
            "is_active": true,
        };
        track_db_operation("find", QUESTIONS, async {
            let cursor = self
                .questions()
                .find(filter)
                .sort(doc! { "_id": 1 })
                .await
                .context("Failed to query questions")?;
            cursor
                .try_collect()
                .await
                .context("Failed to collect questions")
        })
        .await
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<GameSession>> {
        track_db_operation("find_one", SESSIONS, async {
            self.sessions()
                .find_one(doc! { "_id": session_id })
                .await
                .context("Failed to query game session")
        })
        .await
    }

    async fn create_session(
        &self,
        user_id: &str,
        category_id: &str,
        total_available: u32,
    ) -> Result<GameSession> {
        let session = GameSession::new(user_id, category_id, total_available);
        track_db_operation("insert_one", SESSIONS, async {
            self.sessions()
                .insert_one(&session)
                .await
                .context("Failed to insert game session")
        })
        .await?;
        Ok(session)
    }

    async fn update_session(&self, session_id: &str, update: SessionUpdate) -> Result<()> {
        let set = session_update_document(&update)?;
        if set.is_empty() {
            return Ok(());
        }
        track_db_operation("update_one", SESSIONS, async {
            self.sessions()
                .update_one(doc! { "_id": session_id }, doc! { "$set": set })
                .await
                .context("Failed to update game session")
        })
        .await?;
        Ok(())
    }

    async fn close_session(
        &self,
        session_id: &str,
        ended_at: DateTime<Utc>,
        duration_seconds: i64,
        reason: EndReason,
    ) -> Result<()> {
        let update = doc! {
            "$set": {
                "ended_at": bson_of("ended_at", &ended_at)?,
                "duration_seconds": duration_seconds,
                "end_reason": reason.as_str(),
                "current_question": Bson::Null,
            }
        };
        track_db_operation("update_one", SESSIONS, async {
            self.sessions()
                .update_one(doc! { "_id": session_id }, update)
                .await
                .context("Failed to close game session")
        })
        .await?;
        Ok(())
    }

    async fn record_answer_event(&self, event: &AnswerEvent) -> Result<()> {
        track_db_operation("insert_one", ANSWER_EVENTS, async {
            self.answer_events()
                .insert_one(event)
                .await
                .context("Failed to insert answer event")
        })
        .await?;
        Ok(())
    }

    async fn get_question_explanation(
        &self,
        question_id: &str,
    ) -> Result<Option<QuestionExplanation>> {
        let question = track_db_operation("find_one", QUESTIONS, async {
            self.questions()
                .find_one(doc! { "_id": question_id })
                .await
                .context("Failed to query question")
        })
        .await?;

        Ok(question.map(|q| QuestionExplanation {
            name: q.name,
            explanation: q.explanation,
        }))
    }

    async fn list_ended_sessions(&self, category_id: Option<&str>) -> Result<Vec<GameSession>> {
        let mut filter = doc! { "ended_at": { "$ne": Bson::Null } };
        if let Some(category_id) = category_id {
            filter.insert("category_id", category_id);
        }
        track_db_operation("find", SESSIONS, async {
            let cursor = self
                .sessions()
                .find(filter)
                .await
                .context("Failed to query ended sessions")?;
            cursor
                .try_collect()
                .await
                .context("Failed to collect ended sessions")
        })
        .await
    }

    async fn list_user_sessions(&self, user_id: &str) -> Result<Vec<GameSession>> {
        track_db_operation("find", SESSIONS, async {
            let cursor = self
                .sessions()
                .find(doc! { "user_id": user_id })
                .sort(doc! { "started_at": -1 })
                .await
                .context("Failed to query user sessions")?;
            cursor
                .try_collect()
                .await
                .context("Failed to collect user sessions")
        })
        .await
    }

    async fn list_answer_events(&self, user_id: &str) -> Result<Vec<AnswerEvent>> {
        track_db_operation("find", ANSWER_EVENTS, async {
            let cursor = self
                .answer_events()
                .find(doc! { "user_id": user_id })
                .await
                .context("Failed to query answer events")?;
            cursor
                .try_collect()
                .await
                .context("Failed to collect answer events")
        })
        .await
    }
}
