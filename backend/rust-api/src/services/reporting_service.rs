use std::collections::HashMap;
use std::sync::Arc;

use validator::Validate;

use crate::error::GameResult;
use crate::models::reporting::{LeaderboardEntry, LeaderboardQuery, LeaderboardResponse, UserStats};
use crate::store::GameStore;

const MAX_LEADERBOARD_LIMIT: usize = 100;

pub struct ReportingService {
    store: Arc<dyn GameStore>,
}

impl ReportingService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    /// Best ended-session score per player, ranked by score then streak.
    pub async fn load_leaderboard(
        &self,
        query: &LeaderboardQuery,
        default_limit: usize,
    ) -> GameResult<LeaderboardResponse> {
        query.validate()?;
        let limit = query
            .limit
            .unwrap_or(default_limit)
            .clamp(1, MAX_LEADERBOARD_LIMIT);

        let sessions = self
            .store
            .list_ended_sessions(query.category_id.as_deref())
            .await?;

        let mut by_user: HashMap<String, LeaderboardEntry> = HashMap::new();
        for session in sessions.into_iter().filter(|s| s.is_finished_game()) {
            let entry = by_user
                .entry(session.user_id.clone())
                .or_insert_with(|| LeaderboardEntry {
                    rank: 0,
                    user_id: session.user_id.clone(),
                    best_score: 0,
                    highest_streak: 0,
                    games_played: 0,
                });
            entry.games_played += 1;
            entry.best_score = entry.best_score.max(session.score);
            entry.highest_streak = entry.highest_streak.max(session.highest_streak);
        }

        let mut entries: Vec<LeaderboardEntry> = by_user.into_values().collect();
        entries.sort_by(|a, b| {
            b.best_score
                .cmp(&a.best_score)
                .then(b.highest_streak.cmp(&a.highest_streak))
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        entries.truncate(limit);
        for (idx, entry) in entries.iter_mut().enumerate() {
            entry.rank = idx + 1;
        }

        Ok(LeaderboardResponse {
            category_id: query.category_id.clone(),
            entries,
        })
    }

    pub async fn load_user_stats(&self, user_id: &str) -> GameResult<UserStats> {
        let sessions = self.store.list_user_sessions(user_id).await?;
        let events = self.store.list_answer_events(user_id).await?;

        let ended: Vec<_> = sessions.iter().filter(|s| s.is_finished_game()).collect();
        let answers_total = events.len() as u32;
        let correct_answers = events.iter().filter(|e| e.correct).count() as u32;
        let accuracy = if answers_total == 0 {
            0.0
        } else {
            f64::from(correct_answers) / f64::from(answers_total)
        };
        let avg_response_time_ms = if events.is_empty() {
            None
        } else {
            let total: u64 = events.iter().map(|e| e.response_time_ms).sum();
            Some(total / events.len() as u64)
        };

        Ok(UserStats {
            user_id: user_id.to_string(),
            games_played: ended.len() as u32,
            total_score: ended.iter().map(|s| u64::from(s.score)).sum(),
            best_score: ended.iter().map(|s| s.score).max().unwrap_or(0),
            highest_streak: sessions.iter().map(|s| s.highest_streak).max().unwrap_or(0),
            answers_total,
            correct_answers,
            accuracy,
            avg_response_time_ms,
        })
    }
}
