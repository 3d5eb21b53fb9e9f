use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One participant's answer to one activity within one session.
///
/// Created once per (participant, activity) pair. The score is mutated
/// exactly once after insert by the latency-rank pass and never again.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Submission {
    pub id: String,
    pub session_id: String,
    pub activity_id: String,
    pub participant_id: String,
    /// Raw answer payload; format depends on the activity type: a single
    /// answer id, comma-separated ids, free text, or "longitude,latitude".
    pub content: String,
    pub is_correct: bool,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(
        session_id: &str,
        activity_id: &str,
        participant_id: &str,
        content: &str,
        is_correct: bool,
        score: i32,
    ) -> Self {
        Submission {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            activity_id: activity_id.to_string(),
            participant_id: participant_id.to_string(),
            content: content.to_string(),
            is_correct,
            score,
            created_at: Utc::now(),
        }
    }
}
