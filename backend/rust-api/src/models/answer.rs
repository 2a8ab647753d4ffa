use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::lifeline::Lifeline;
use super::question::PresentedQuestion;
use super::{EndReason, SessionSummary};

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    /// `None` means the client-side countdown expired.
    #[validate(length(min = 1, max = 128))]
    pub selected_id: Option<String>,
    #[validate(range(max = 600_000))]
    pub response_time_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct AnswerFeedback {
    pub correct_name: String,
    pub correct_explanation: Option<String>,
    pub selected_name: Option<String>,
    pub selected_explanation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
    pub points_awarded: u32,
    pub score: u32,
    pub current_streak: u32,
    pub highest_streak: u32,
    pub multiplier: f64,
    pub streak_level: &'static str,
    pub game_over: bool,
    pub end_reason: Option<EndReason>,
    pub next_question: Option<PresentedQuestion>,
    pub feedback: Option<AnswerFeedback>,
    pub summary: Option<SessionSummary>,
}

/// Analytics row written for every answer, persisted in `answer_events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEvent {
    #[serde(rename = "_id")]
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    pub question_id: String,
    pub selected_id: Option<String>,
    pub correct: bool,
    pub response_time_ms: u64,
    #[serde(default)]
    pub lifelines_used: Vec<Lifeline>,
    pub points_awarded: u32,
    pub streak_after: u32,
    pub created_at: DateTime<Utc>,
}
