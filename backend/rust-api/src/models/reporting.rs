use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LeaderboardQuery {
    pub category_id: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub best_score: u32,
    pub highest_streak: u32,
    pub games_played: u32,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub category_id: Option<String>,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserStats {
    pub user_id: String,
    pub games_played: u32,
    pub total_score: u64,
    pub best_score: u32,
    pub highest_streak: u32,
    pub answers_total: u32,
    pub correct_answers: u32,
    pub accuracy: f64,
    pub avg_response_time_ms: Option<u64>,
}
