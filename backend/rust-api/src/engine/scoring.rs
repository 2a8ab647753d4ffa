use serde::Serialize;

/// Points for a correct answer before the streak multiplier.
pub const BASE_POINTS: u32 = 10;

/// Multiplier in tenths, keyed by the lowest streak of each bucket.
const MULTIPLIER_TENTHS: &[(u32, u32)] = &[
    (41, 50),
    (31, 30),
    (21, 20),
    (16, 15),
    (11, 13),
    (6, 12),
    (0, 10),
];

fn multiplier_tenths(streak: u32) -> u32 {
    MULTIPLIER_TENTHS
        .iter()
        .find(|(min, _)| streak >= *min)
        .map(|(_, tenths)| *tenths)
        .unwrap_or(10)
}

pub fn multiplier(streak: u32) -> f64 {
    f64::from(multiplier_tenths(streak)) / 10.0
}

/// `floor(10 * multiplier(streak))`, computed on integer tenths.
pub fn points(streak: u32) -> u32 {
    BASE_POINTS * multiplier_tenths(streak) / 10
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakLevel {
    Beginner,
    WarmingUp,
    OnARoll,
    Heated,
    Unstoppable,
    Legendary,
    OnFire,
}

impl StreakLevel {
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            41.. => StreakLevel::OnFire,
            31..=40 => StreakLevel::Legendary,
            21..=30 => StreakLevel::Unstoppable,
            16..=20 => StreakLevel::Heated,
            11..=15 => StreakLevel::OnARoll,
            6..=10 => StreakLevel::WarmingUp,
            _ => StreakLevel::Beginner,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StreakLevel::Beginner => "Başlangıç",
            StreakLevel::WarmingUp => "Isınıyor",
            StreakLevel::OnARoll => "Seri Yakaladın",
            StreakLevel::Heated => "Ateşlendin",
            StreakLevel::Unstoppable => "Durdurulamaz",
            StreakLevel::Legendary => "Efsane",
            StreakLevel::OnFire => "Alev Aldın",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    pub score: u32,
    pub current_streak: u32,
    pub highest_streak: u32,
    pub total_correct: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredAnswer {
    pub state: StreakState,
    pub points_awarded: u32,
}

/// Applies one answer to the running totals. A miss resets the streak and
/// awards nothing; ending the session is the caller's job.
pub fn score_answer(state: StreakState, correct: bool) -> ScoredAnswer {
    if !correct {
        return ScoredAnswer {
            state: StreakState {
                current_streak: 0,
                ..state
            },
            points_awarded: 0,
        };
    }

    let streak = state.current_streak + 1;
    let awarded = points(streak);
    ScoredAnswer {
        state: StreakState {
            score: state.score + awarded,
            current_streak: streak,
            highest_streak: state.highest_streak.max(streak),
            total_correct: state.total_correct + 1,
        },
        points_awarded: awarded,
    }
}
