use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One authoritative answer entry in a quiz's answer key.
///
/// The set is always cleared and rebuilt wholesale (when answers are set or
/// when the quiz changes type), never patched entry-by-entry. Order indices
/// within one quiz are unique and contiguous starting at 0.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAnswer {
    pub id: String,
    pub text: String,
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub order_index: i32,
}

impl QuizAnswer {
    pub fn new(text: &str, correct: bool, order_index: i32) -> Self {
        QuizAnswer {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            correct,
            explanation: None,
            order_index,
        }
    }
}

/// Geofenced answer for location quizzes. Mutually exclusive with
/// [`QuizAnswer`] for a given quiz.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizLocationAnswer {
    pub longitude: f64,
    pub latitude: f64,
    /// Acceptance radius in meters.
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointType {
    NoPoints,
    Standard,
    DoublePoints,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub question: String,
    pub time_limit_seconds: i32,
    pub point_type: PointType,
    pub answers: Vec<QuizAnswer>,
    pub location_answers: Vec<QuizLocationAnswer>,
}

impl Quiz {
    pub fn with_answers(question: &str, answers: Vec<QuizAnswer>) -> Self {
        Quiz {
            question: question.to_string(),
            time_limit_seconds: 30,
            point_type: PointType::Standard,
            answers,
            location_answers: vec![],
        }
    }

    pub fn with_location_answers(question: &str, locations: Vec<QuizLocationAnswer>) -> Self {
        Quiz {
            question: question.to_string(),
            time_limit_seconds: 30,
            point_type: PointType::Standard,
            answers: vec![],
            location_answers: locations,
        }
    }

    /// Answers flagged correct, in stored order.
    pub fn correct_answers(&self) -> Vec<&QuizAnswer> {
        self.answers.iter().filter(|a| a.correct).collect()
    }
}
