use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use self::lifeline::Lifeline;
use self::question::{PresentedQuestion, QuestionOption};

pub mod answer;
pub mod lifeline;
pub mod question;
pub mod reporting;

/// A (question, colour) pair already shown in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskedCombination {
    pub question_id: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    WrongAnswer,
    Timeout,
    PoolExhausted,
    PlayerQuit,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::WrongAnswer => "wrong_answer",
            EndReason::Timeout => "timeout",
            EndReason::PoolExhausted => "pool_exhausted",
            EndReason::PlayerQuit => "player_quit",
        }
    }
}

/// What is currently on the player's screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentQuestion {
    pub correct_id: String,
    pub prompt: String,
    pub image_url: String,
    pub color: String,
    pub options: Vec<QuestionOption>,
    pub time_limit_seconds: u32,
    pub presented_at: DateTime<Utc>,
    /// Lifelines applied while this question was on screen, in order.
    #[serde(default)]
    pub lifelines_used: Vec<Lifeline>,
}

impl CurrentQuestion {
    pub fn from_presented(question: &PresentedQuestion, presented_at: DateTime<Utc>) -> Self {
        Self {
            correct_id: question.correct_id.clone(),
            prompt: question.prompt.clone(),
            image_url: question.image_url.clone(),
            color: question.color.clone(),
            options: question.options.clone(),
            time_limit_seconds: question.time_limit_seconds,
            presented_at,
            lifelines_used: Vec::new(),
        }
    }

    pub fn to_presented(&self) -> PresentedQuestion {
        PresentedQuestion {
            correct_id: self.correct_id.clone(),
            prompt: self.prompt.clone(),
            image_url: self.image_url.clone(),
            color: self.color.clone(),
            options: self.options.clone(),
            time_limit_seconds: self.time_limit_seconds,
        }
    }

    pub fn has_option(&self, id: &str) -> bool {
        self.options.iter().any(|o| o.id == id)
    }
}

/// One play-through, persisted in `game_sessions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub score: u32,
    /// Cumulative correct answers.
    pub total_questions: u32,
    pub total_available_questions: u32,
    pub current_streak: u32,
    pub highest_streak: u32,
    pub lifeline_50_used: bool,
    pub lifeline_skip_used: bool,
    #[serde(default)]
    pub asked_questions: Vec<AskedCombination>,
    #[serde(default)]
    pub used_colors: Vec<String>,
    #[serde(default)]
    pub current_question: Option<CurrentQuestion>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub end_reason: Option<EndReason>,
}

impl GameSession {
    pub fn new(user_id: &str, category_id: &str, total_available_questions: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            category_id: category_id.to_string(),
            score: 0,
            total_questions: 0,
            total_available_questions,
            current_streak: 0,
            highest_streak: 0,
            lifeline_50_used: false,
            lifeline_skip_used: false,
            asked_questions: Vec::new(),
            used_colors: Vec::new(),
            current_question: None,
            started_at: Utc::now(),
            ended_at: None,
            duration_seconds: None,
            end_reason: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.ended_at.is_some() {
            SessionStatus::Ended
        } else {
            SessionStatus::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == SessionStatus::Active
    }

    /// Ended sessions that count as a game. Rows closed because the first
    /// question could not be built are left out.
    pub fn is_finished_game(&self) -> bool {
        !self.is_active()
            && !(self.total_questions == 0 && self.end_reason == Some(EndReason::PoolExhausted))
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.started_at).num_seconds().max(0)
    }
}

/// Partial write against a session row. `None` leaves the field untouched;
/// `current_question: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub score: Option<u32>,
    pub total_questions: Option<u32>,
    pub current_streak: Option<u32>,
    pub highest_streak: Option<u32>,
    pub lifeline_50_used: Option<bool>,
    pub lifeline_skip_used: Option<bool>,
    pub asked_questions: Option<Vec<AskedCombination>>,
    pub used_colors: Option<Vec<String>>,
    pub current_question: Option<Option<CurrentQuestion>>,
}

impl SessionUpdate {
    pub fn apply(self, session: &mut GameSession) {
        if let Some(v) = self.score {
            session.score = v;
        }
        if let Some(v) = self.total_questions {
            session.total_questions = v;
        }
        if let Some(v) = self.current_streak {
            session.current_streak = v;
        }
        if let Some(v) = self.highest_streak {
            session.highest_streak = v;
        }
        if let Some(v) = self.lifeline_50_used {
            session.lifeline_50_used = v;
        }
        if let Some(v) = self.lifeline_skip_used {
            session.lifeline_skip_used = v;
        }
        if let Some(v) = self.asked_questions {
            session.asked_questions = v;
        }
        if let Some(v) = self.used_colors {
            session.used_colors = v;
        }
        if let Some(v) = self.current_question {
            session.current_question = v;
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct StartSessionRequest {
    #[validate(length(min = 1, max = 128, message = "category_id must not be empty"))]
    pub category_id: String,
}

/// Session as returned to the owning player.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    pub category_id: String,
    pub status: SessionStatus,
    pub score: u32,
    pub total_questions: u32,
    pub total_available_questions: u32,
    pub current_streak: u32,
    pub highest_streak: u32,
    pub multiplier: f64,
    pub streak_level: &'static str,
    pub lifeline_50_used: bool,
    pub lifeline_skip_used: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub end_reason: Option<EndReason>,
    pub question: Option<PresentedQuestion>,
}

impl From<&GameSession> for SessionView {
    fn from(session: &GameSession) -> Self {
        let question = if session.is_active() {
            session.current_question.as_ref().map(|q| q.to_presented())
        } else {
            None
        };
        Self {
            id: session.id.clone(),
            category_id: session.category_id.clone(),
            status: session.status(),
            score: session.score,
            total_questions: session.total_questions,
            total_available_questions: session.total_available_questions,
            current_streak: session.current_streak,
            highest_streak: session.highest_streak,
            multiplier: crate::engine::scoring::multiplier(session.current_streak),
            streak_level: crate::engine::scoring::StreakLevel::for_streak(session.current_streak)
                .label(),
            lifeline_50_used: session.lifeline_50_used,
            lifeline_skip_used: session.lifeline_skip_used,
            started_at: session.started_at,
            ended_at: session.ended_at,
            end_reason: session.end_reason,
            question,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session: SessionView,
    pub question: PresentedQuestion,
}

/// Final aggregates handed to downstream badge evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub user_id: String,
    pub category_id: String,
    pub score: u32,
    pub highest_streak: u32,
    pub total_questions: u32,
    pub duration_seconds: i64,
    pub end_reason: EndReason,
    pub ended_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn from_closed(session: &GameSession, ended_at: DateTime<Utc>, reason: EndReason) -> Self {
        Self {
            session_id: session.id.clone(),
            user_id: session.user_id.clone(),
            category_id: session.category_id.clone(),
            score: session.score,
            highest_streak: session.highest_streak,
            total_questions: session.total_questions,
            duration_seconds: session.elapsed_seconds(ended_at),
            end_reason: reason,
            ended_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    pub all_categories: bool,
    pub show_on_homepage: bool,
}
