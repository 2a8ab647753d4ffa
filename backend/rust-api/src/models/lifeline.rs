use serde::{Deserialize, Serialize};

use super::question::{PresentedQuestion, QuestionOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifeline {
    FiftyFifty,
    Skip,
}

impl Lifeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifeline::FiftyFifty => "fifty_fifty",
            Lifeline::Skip => "skip",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FiftyFiftyResponse {
    pub removed_option_id: String,
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Serialize)]
pub struct SkipResponse {
    pub question: PresentedQuestion,
}

#[derive(Debug, Serialize)]
#[serde(tag = "lifeline", rename_all = "snake_case")]
pub enum LifelineResponse {
    FiftyFifty(FiftyFiftyResponse),
    Skip(SkipResponse),
}
