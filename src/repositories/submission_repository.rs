use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Submission};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, submission: Submission) -> AppResult<Submission>;
    async fn find_by_participant_and_activity(
        &self,
        session_id: &str,
        participant_id: &str,
        activity_id: &str,
    ) -> AppResult<Option<Submission>>;
    /// All correct submissions for (session, activity), ordered ascending
    /// by creation time. The grader's rank adjustment depends on this
    /// ordering.
    async fn find_correct_by_session_and_activity(
        &self,
        session_id: &str,
        activity_id: &str,
    ) -> AppResult<Vec<Submission>>;
    async fn find_by_session(&self, session_id: &str) -> AppResult<Vec<Submission>>;
    /// One-shot score overwrite applied by the latency-rank pass.
    async fn update_score(&self, id: &str, score: i32) -> AppResult<()>;
}

pub struct MongoSubmissionRepository {
    collection: Collection<Submission>,
}

impl MongoSubmissionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("submissions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for submissions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let session_activity_index = IndexModel::builder()
            .keys(doc! { "session_id": 1, "activity_id": 1, "created_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("session_activity_time".to_string())
                    .build(),
            )
            .build();

        let unique_submission_index = IndexModel::builder()
            .keys(doc! { "session_id": 1, "activity_id": 1, "participant_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("one_submission_per_participant".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(session_activity_index).await?;
        self.collection.create_index(unique_submission_index).await?;

        Ok(())
    }
}

#[async_trait]
impl SubmissionRepository for MongoSubmissionRepository {
    async fn create(&self, submission: Submission) -> AppResult<Submission> {
        self.collection.insert_one(&submission).await?;
        Ok(submission)
    }

    async fn find_by_participant_and_activity(
        &self,
        session_id: &str,
        participant_id: &str,
        activity_id: &str,
    ) -> AppResult<Option<Submission>> {
        let submission = self
            .collection
            .find_one(doc! {
                "session_id": session_id,
                "participant_id": participant_id,
                "activity_id": activity_id
            })
            .await?;
        Ok(submission)
    }

    async fn find_correct_by_session_and_activity(
        &self,
        session_id: &str,
        activity_id: &str,
    ) -> AppResult<Vec<Submission>> {
        let submissions = self
            .collection
            .find(doc! {
                "session_id": session_id,
                "activity_id": activity_id,
                "is_correct": true
            })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(submissions)
    }

    async fn find_by_session(&self, session_id: &str) -> AppResult<Vec<Submission>> {
        let submissions = self
            .collection
            .find(doc! { "session_id": session_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(submissions)
    }

    async fn update_score(&self, id: &str, score: i32) -> AppResult<()> {
        self.collection
            .update_one(doc! { "id": id }, doc! { "$set": { "score": score } })
            .await?;
        Ok(())
    }
}
