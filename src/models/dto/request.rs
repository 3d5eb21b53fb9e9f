use serde::Deserialize;
use validator::Validate;

use crate::models::domain::activity::ActivityType;
use crate::models::domain::quiz::PointType;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCollectionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub owner_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCollectionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateActivityRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub activity_type: ActivityType,

    #[validate(length(max = 500))]
    pub question: Option<String>,

    #[validate(range(min = 5, max = 600))]
    pub time_limit_seconds: Option<i32>,

    pub point_type: Option<PointType>,

    /// Body text for info slides; ignored for quiz types.
    #[validate(length(max = 2000))]
    pub slide_body: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateActivityRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 500))]
    pub question: Option<String>,

    #[validate(range(min = 5, max = 600))]
    pub time_limit_seconds: Option<i32>,

    pub point_type: Option<PointType>,

    #[validate(length(max = 2000))]
    pub slide_body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeActivityTypeRequest {
    pub new_type: ActivityType,
}

/// Quiz-type-specific answer payloads as a closed sum type, matched
/// exhaustively where answers are set. The `kind` tag mirrors the activity
/// type families on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerSetPayload {
    /// Buttons and checkboxes: a list of options with correctness flags.
    Choice { answers: Vec<AnswerEntryInput> },
    /// Reorder: steps in canonical order; all are correct by construction.
    Reorder { steps: Vec<StepInput> },
    /// Type-answer: the single accepted free-text answer.
    TypeAnswer { answer: AnswerEntryInput },
    /// True-or-false: which of the fixed pair is correct.
    TrueFalse { true_is_correct: bool },
    /// Location: geofenced answers.
    Location { locations: Vec<LocationAnswerInput> },
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnswerEntryInput {
    #[validate(length(min = 1, max = 500))]
    pub text: String,

    #[serde(default)]
    pub correct: bool,

    #[validate(length(max = 1000))]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StepInput {
    #[validate(length(min = 1, max = 500))]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocationAnswerInput {
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = 1.0, max = 1_000_000.0))]
    pub radius: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, max = 100))]
    pub collection_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JoinSessionRequest {
    #[validate(length(min = 6, max = 6))]
    pub join_code: String,

    #[validate(length(min = 1, max = 30))]
    pub nickname: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, max = 100))]
    pub participant_id: String,

    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).min(100)
    }
}
