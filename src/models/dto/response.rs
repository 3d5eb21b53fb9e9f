use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Activity, Collection, Participant, Session, Submission};

#[derive(Debug, Clone, Serialize)]
pub struct CollectionSummaryDto {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub activity_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Collection> for CollectionSummaryDto {
    fn from(collection: Collection) -> Self {
        CollectionSummaryDto {
            id: collection.id,
            name: collection.name,
            description: collection.description,
            activity_count: collection.activities.len(),
            created_at: collection.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
}

/// An activity together with the conversion warnings its type change
/// produced.
#[derive(Debug, Serialize)]
pub struct ActivityConversionDto {
    pub activity: Activity,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionDto {
    pub id: String,
    pub activity_id: String,
    pub participant_id: String,
    pub is_correct: bool,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionDto {
    fn from(submission: Submission) -> Self {
        SubmissionDto {
            id: submission.id,
            activity_id: submission.activity_id,
            participant_id: submission.participant_id,
            is_correct: submission.is_correct,
            score: submission.score,
            created_at: submission.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JoinSessionDto {
    pub session_id: String,
    pub collection_id: String,
    pub participant: Participant,
}

impl JoinSessionDto {
    pub fn new(session: &Session, participant: Participant) -> Self {
        JoinSessionDto {
            session_id: session.id.clone(),
            collection_id: session.collection_id.clone(),
            participant,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeaderboardEntryDto {
    pub participant_id: String,
    pub nickname: String,
    pub total_score: i32,
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: String,
}
