use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quizcast_server::{
    config::{ConversionDefaults, ScoringConfig},
    errors::{AppError, AppResult},
    models::domain::{Collection, Session, Submission},
    models::dto::request::{
        AnswerEntryInput, AnswerSetPayload, CreateActivityRequest, CreateCollectionRequest,
        CreateSessionRequest, JoinSessionRequest, SubmitAnswerRequest,
    },
    repositories::{CollectionRepository, SessionRepository, SubmissionRepository},
    services::{CollectionService, SessionService},
};

use quizcast_server::models::domain::ActivityType;

struct InMemoryCollectionRepository {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryCollectionRepository {
    fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl CollectionRepository for InMemoryCollectionRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Collection>> {
        let collections = self.collections.read().await;
        Ok(collections.get(id).cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Collection>, i64)> {
        let collections = self.collections.read().await;
        let mut items: Vec<_> = collections.values().cloned().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));

        let total = items.len() as i64;
        let start = (offset.max(0) as usize).min(items.len());
        let end = (start + limit.max(0) as usize).min(items.len());

        Ok((items[start..end].to_vec(), total))
    }

    async fn create(&self, collection: Collection) -> AppResult<Collection> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(&collection.id) {
            return Err(AppError::AlreadyExists(format!(
                "Collection with id '{}' already exists",
                collection.id
            )));
        }
        collections.insert(collection.id.clone(), collection.clone());
        Ok(collection)
    }

    async fn update(&self, collection: Collection) -> AppResult<Collection> {
        let mut collections = self.collections.write().await;
        collections.insert(collection.id.clone(), collection.clone());
        Ok(collection)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections.remove(id).is_some())
    }
}

struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionRepository {
    fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn find_by_join_code(&self, join_code: &str) -> AppResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.values().find(|s| s.join_code == join_code).cloned())
    }

    async fn create(&self, session: Session) -> AppResult<Session> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn update(&self, session: Session) -> AppResult<Session> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }
}

/// Keeps submissions in insertion order so creation-time ties resolve the
/// way the production query does (first inserted wins).
struct InMemorySubmissionRepository {
    submissions: Arc<RwLock<Vec<Submission>>>,
}

impl InMemorySubmissionRepository {
    fn new() -> Self {
        Self {
            submissions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    async fn stored_score(&self, id: &str) -> Option<i32> {
        let submissions = self.submissions.read().await;
        submissions.iter().find(|s| s.id == id).map(|s| s.score)
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn create(&self, submission: Submission) -> AppResult<Submission> {
        let mut submissions = self.submissions.write().await;
        submissions.push(submission.clone());
        Ok(submission)
    }

    async fn find_by_participant_and_activity(
        &self,
        session_id: &str,
        participant_id: &str,
        activity_id: &str,
    ) -> AppResult<Option<Submission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .iter()
            .find(|s| {
                s.session_id == session_id
                    && s.participant_id == participant_id
                    && s.activity_id == activity_id
            })
            .cloned())
    }

    async fn find_correct_by_session_and_activity(
        &self,
        session_id: &str,
        activity_id: &str,
    ) -> AppResult<Vec<Submission>> {
        let submissions = self.submissions.read().await;
        let mut correct: Vec<Submission> = submissions
            .iter()
            .filter(|s| {
                s.session_id == session_id && s.activity_id == activity_id && s.is_correct
            })
            .cloned()
            .collect();
        // Stable sort: equal timestamps keep insertion order.
        correct.sort_by_key(|s| s.created_at);
        Ok(correct)
    }

    async fn find_by_session(&self, session_id: &str) -> AppResult<Vec<Submission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .iter()
            .filter(|s| s.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn update_score(&self, id: &str, score: i32) -> AppResult<()> {
        let mut submissions = self.submissions.write().await;
        if let Some(submission) = submissions.iter_mut().find(|s| s.id == id) {
            submission.score = score;
        }
        Ok(())
    }
}

fn defaults() -> ConversionDefaults {
    ConversionDefaults {
        question_text: "Untitled question".to_string(),
        correct_option_text: "Option 1".to_string(),
        wrong_option_text: "Option 2".to_string(),
        first_step_text: "Step 1".to_string(),
        second_step_text: "Step 2".to_string(),
        text_answer: "Answer".to_string(),
        true_label: "True".to_string(),
        false_label: "False".to_string(),
    }
}

struct Harness {
    collection_service: CollectionService,
    session_service: SessionService,
    submission_repository: Arc<InMemorySubmissionRepository>,
}

fn harness() -> Harness {
    let collection_repository = Arc::new(InMemoryCollectionRepository::new());
    let session_repository = Arc::new(InMemorySessionRepository::new());
    let submission_repository = Arc::new(InMemorySubmissionRepository::new());

    let collection_service = CollectionService::new(collection_repository.clone(), defaults());
    let session_service = SessionService::new(
        session_repository,
        submission_repository.clone(),
        collection_repository,
        ScoringConfig {
            base_score: 100,
            time_decrement: 10,
        },
    );

    Harness {
        collection_service,
        session_service,
        submission_repository,
    }
}

struct LiveQuiz {
    session_id: String,
    activity_id: String,
    correct_answer_id: String,
    wrong_answer_id: String,
    participants: Vec<String>,
}

/// Create a collection with one buttons quiz, start a session and join the
/// given nicknames.
async fn live_buttons_quiz(h: &Harness, nicknames: &[&str]) -> LiveQuiz {
    let collection = h
        .collection_service
        .create_collection(CreateCollectionRequest {
            name: "Geography".to_string(),
            description: None,
            owner_id: "owner-1".to_string(),
        })
        .await
        .unwrap();

    let activity = h
        .collection_service
        .add_activity(
            &collection.id,
            CreateActivityRequest {
                title: "Q1".to_string(),
                activity_type: ActivityType::QuizButtons,
                question: Some("Capital of France?".to_string()),
                time_limit_seconds: None,
                point_type: None,
                slide_body: None,
            },
        )
        .await
        .unwrap();

    let entry = |text: &str, correct: bool| AnswerEntryInput {
        text: text.to_string(),
        correct,
        explanation: None,
    };
    let activity = h
        .collection_service
        .set_answers(
            &collection.id,
            &activity.id,
            AnswerSetPayload::Choice {
                answers: vec![entry("Paris", true), entry("Lyon", false)],
            },
        )
        .await
        .unwrap();

    let quiz = activity.quiz.as_ref().unwrap();
    let correct_answer_id = quiz.answers.iter().find(|a| a.correct).unwrap().id.clone();
    let wrong_answer_id = quiz.answers.iter().find(|a| !a.correct).unwrap().id.clone();

    let session = h
        .session_service
        .create_session(CreateSessionRequest {
            collection_id: collection.id.clone(),
        })
        .await
        .unwrap();

    let mut participants = Vec::new();
    for nickname in nicknames {
        let (_, participant) = h
            .session_service
            .join_session(JoinSessionRequest {
                join_code: session.join_code.clone(),
                nickname: nickname.to_string(),
            })
            .await
            .unwrap();
        participants.push(participant.id);
    }

    h.session_service.start_session(&session.id).await.unwrap();

    LiveQuiz {
        session_id: session.id,
        activity_id: activity.id,
        correct_answer_id,
        wrong_answer_id,
        participants,
    }
}

async fn submit(h: &Harness, live: &LiveQuiz, participant: &str, content: &str) -> AppResult<Submission> {
    h.session_service
        .submit_answer(
            &live.session_id,
            &live.activity_id,
            SubmitAnswerRequest {
                participant_id: participant.to_string(),
                content: content.to_string(),
            },
        )
        .await
}

#[tokio::test]
async fn correct_submissions_are_scored_by_arrival_order() {
    let h = harness();
    let live = live_buttons_quiz(&h, &["Ada", "Grace", "Brian"]).await;

    let first = submit(&h, &live, &live.participants[0], &live.correct_answer_id)
        .await
        .unwrap();
    let second = submit(&h, &live, &live.participants[1], &live.correct_answer_id)
        .await
        .unwrap();
    let wrong = submit(&h, &live, &live.participants[2], &live.wrong_answer_id)
        .await
        .unwrap();

    assert_eq!(first.score, 100);
    assert_eq!(second.score, 90);
    assert!(!wrong.is_correct);
    assert_eq!(wrong.score, 0);
}

#[tokio::test]
async fn earlier_finalized_scores_are_never_re_ranked() {
    let h = harness();
    let live = live_buttons_quiz(&h, &["Ada", "Grace"]).await;

    let first = submit(&h, &live, &live.participants[0], &live.correct_answer_id)
        .await
        .unwrap();
    let second = submit(&h, &live, &live.participants[1], &live.correct_answer_id)
        .await
        .unwrap();

    // The first submission was finalized before the second arrived; its
    // stored score must be untouched by the second rank pass.
    assert_eq!(
        h.submission_repository.stored_score(&first.id).await,
        Some(100)
    );
    assert_eq!(
        h.submission_repository.stored_score(&second.id).await,
        Some(90)
    );
}

#[tokio::test]
async fn duplicate_submissions_are_rejected() {
    let h = harness();
    let live = live_buttons_quiz(&h, &["Ada"]).await;

    submit(&h, &live, &live.participants[0], &live.correct_answer_id)
        .await
        .unwrap();
    let err = submit(&h, &live, &live.participants[0], &live.wrong_answer_id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AlreadyExists(_)));
}

#[tokio::test]
async fn unknown_answer_id_fails_the_submission() {
    let h = harness();
    let live = live_buttons_quiz(&h, &["Ada"]).await;

    let err = submit(&h, &live, &live.participants[0], "no-such-answer")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn leaderboard_reflects_adjusted_scores() {
    let h = harness();
    let live = live_buttons_quiz(&h, &["Ada", "Grace", "Brian"]).await;

    submit(&h, &live, &live.participants[1], &live.correct_answer_id)
        .await
        .unwrap();
    submit(&h, &live, &live.participants[0], &live.correct_answer_id)
        .await
        .unwrap();
    submit(&h, &live, &live.participants[2], &live.wrong_answer_id)
        .await
        .unwrap();

    let entries = h
        .session_service
        .leaderboard(&live.session_id)
        .await
        .unwrap();

    assert_eq!(entries[0].nickname, "Grace");
    assert_eq!(entries[0].total_score, 100);
    assert_eq!(entries[1].nickname, "Ada");
    assert_eq!(entries[1].total_score, 90);
    assert_eq!(entries[2].nickname, "Brian");
    assert_eq!(entries[2].total_score, 0);
}

#[tokio::test]
async fn submissions_to_non_current_activities_are_rejected() {
    let h = harness();
    let live = live_buttons_quiz(&h, &["Ada"]).await;

    // A second activity that is not the one currently being played.
    let session = h
        .session_service
        .get_session(&live.session_id)
        .await
        .unwrap();
    let later = h
        .collection_service
        .add_activity(
            &session.collection_id,
            CreateActivityRequest {
                title: "Q2".to_string(),
                activity_type: ActivityType::QuizTypeAnswer,
                question: Some("6 times 7?".to_string()),
                time_limit_seconds: None,
                point_type: None,
                slide_body: None,
            },
        )
        .await
        .unwrap();

    let err = h
        .session_service
        .submit_answer(
            &live.session_id,
            &later.id,
            SubmitAnswerRequest {
                participant_id: live.participants[0].clone(),
                content: "42".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn joining_a_started_session_is_rejected() {
    let h = harness();
    let live = live_buttons_quiz(&h, &["Ada"]).await;

    let session = h
        .session_service
        .get_session(&live.session_id)
        .await
        .unwrap();
    let err = h
        .session_service
        .join_session(JoinSessionRequest {
            join_code: session.join_code,
            nickname: "Late".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn advancing_past_the_last_activity_finishes_the_session() {
    let h = harness();
    let live = live_buttons_quiz(&h, &["Ada"]).await;

    let session = h
        .session_service
        .advance_session(&live.session_id)
        .await
        .unwrap();

    assert_eq!(
        session.status,
        quizcast_server::models::domain::SessionStatus::Finished
    );

    // A finished session no longer accepts submissions.
    let err = submit(&h, &live, &live.participants[0], &live.correct_answer_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}
