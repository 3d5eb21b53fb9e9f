use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    config::ScoringConfig,
    errors::{AppError, AppResult},
    models::domain::{
        Activity, Collection, Participant, PointType, Session, SessionStatus, Submission,
    },
    models::dto::request::{CreateSessionRequest, JoinSessionRequest, SubmitAnswerRequest},
    models::dto::response::LeaderboardEntryDto,
    repositories::{CollectionRepository, SessionRepository, SubmissionRepository},
    services::grading_service::GradingService,
};

const JOIN_CODE_ATTEMPTS: usize = 5;

pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    collections: Arc<dyn CollectionRepository>,
    grader: GradingService,
}

impl SessionService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        collections: Arc<dyn CollectionRepository>,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            sessions,
            submissions,
            collections,
            grader: GradingService::new(scoring),
        }
    }

    pub async fn create_session(&self, request: CreateSessionRequest) -> AppResult<Session> {
        request.validate()?;

        // The session must point at a collection that actually exists.
        self.collections
            .find_by_id(&request.collection_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Collection with id '{}' not found",
                    request.collection_id
                ))
            })?;

        for _ in 0..JOIN_CODE_ATTEMPTS {
            let session = Session::new(&request.collection_id);
            if self
                .sessions
                .find_by_join_code(&session.join_code)
                .await?
                .is_none()
            {
                return self.sessions.create(session).await;
            }
        }

        Err(AppError::InternalError(
            "Could not allocate a unique join code".to_string(),
        ))
    }

    pub async fn get_session(&self, id: &str) -> AppResult<Session> {
        self.sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", id)))
    }

    pub async fn join_session(
        &self,
        request: JoinSessionRequest,
    ) -> AppResult<(Session, Participant)> {
        request.validate()?;

        let mut session = self
            .sessions
            .find_by_join_code(&request.join_code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No session with join code '{}'",
                    request.join_code
                ))
            })?;

        if session.status != SessionStatus::Lobby {
            return Err(AppError::ValidationError(
                "Session has already started".to_string(),
            ));
        }
        if session.has_nickname(&request.nickname) {
            return Err(AppError::AlreadyExists(format!(
                "Nickname '{}' is already taken",
                request.nickname
            )));
        }

        let participant = Participant::new(&request.nickname);
        session.participants.push(participant.clone());
        session.modified_at = Some(Utc::now());

        let session = self.sessions.update(session).await?;
        Ok((session, participant))
    }

    pub async fn start_session(&self, id: &str) -> AppResult<Session> {
        let mut session = self.get_session(id).await?;
        if session.status != SessionStatus::Lobby {
            return Err(AppError::ValidationError(
                "Only a lobby session can be started".to_string(),
            ));
        }

        let collection = self.collection_for(&session).await?;
        if collection.activities.is_empty() {
            return Err(AppError::ValidationError(
                "Cannot start a session for an empty collection".to_string(),
            ));
        }

        session.status = SessionStatus::InProgress;
        session.current_activity_index = 0;
        session.modified_at = Some(Utc::now());
        self.sessions.update(session).await
    }

    /// Move to the next activity; the session finishes after the last one.
    pub async fn advance_session(&self, id: &str) -> AppResult<Session> {
        let mut session = self.get_session(id).await?;
        if session.status != SessionStatus::InProgress {
            return Err(AppError::ValidationError(
                "Only a running session can be advanced".to_string(),
            ));
        }

        let collection = self.collection_for(&session).await?;
        let next = session.current_activity_index + 1;
        if next >= collection.activities.len() as i32 {
            session.status = SessionStatus::Finished;
        } else {
            session.current_activity_index = next;
        }
        session.modified_at = Some(Utc::now());
        self.sessions.update(session).await
    }

    pub async fn finish_session(&self, id: &str) -> AppResult<Session> {
        let mut session = self.get_session(id).await?;
        if session.status == SessionStatus::Finished {
            return Err(AppError::ValidationError(
                "Session is already finished".to_string(),
            ));
        }

        session.status = SessionStatus::Finished;
        session.modified_at = Some(Utc::now());
        self.sessions.update(session).await
    }

    /// Grade and persist one participant's answer to the current activity,
    /// then apply the latency-rank adjustment.
    ///
    /// The adjustment re-reads the correct submissions after the insert and
    /// never touches previously finalized scores, so results depend on
    /// arrival order under concurrent submissions. That is the accepted
    /// behavior, not a defect to compensate for here.
    pub async fn submit_answer(
        &self,
        session_id: &str,
        activity_id: &str,
        request: SubmitAnswerRequest,
    ) -> AppResult<Submission> {
        request.validate()?;

        let session = self.get_session(session_id).await?;
        if session.status != SessionStatus::InProgress {
            return Err(AppError::ValidationError(
                "Session is not accepting submissions".to_string(),
            ));
        }
        if session.participant(&request.participant_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Participant with id '{}' not found in session",
                request.participant_id
            )));
        }

        let collection = self.collection_for(&session).await?;
        let activity = collection.activity(activity_id).ok_or_else(|| {
            AppError::NotFound(format!("Activity with id '{}' not found", activity_id))
        })?;
        if !self.is_current_activity(&session, &collection, activity) {
            return Err(AppError::ValidationError(
                "Activity is not currently being played".to_string(),
            ));
        }

        let quiz = activity.quiz.as_ref().ok_or_else(|| {
            AppError::ValidationError("Info slides do not accept submissions".to_string())
        })?;

        if self
            .submissions
            .find_by_participant_and_activity(session_id, &request.participant_id, activity_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(
                "Participant has already answered this activity".to_string(),
            ));
        }

        let (is_correct, base_score) =
            self.grader
                .grade_submission(quiz, activity.activity_type, &request.content)?;

        let mut submission = self
            .submissions
            .create(Submission::new(
                session_id,
                activity_id,
                &request.participant_id,
                &request.content,
                is_correct,
                base_score,
            ))
            .await?;

        if is_correct && quiz.point_type != PointType::NoPoints {
            let correct = self
                .submissions
                .find_correct_by_session_and_activity(session_id, activity_id)
                .await?;
            let rank = correct
                .iter()
                .position(|s| s.id == submission.id)
                .ok_or_else(|| {
                    AppError::IllegalState(
                        "Submission missing from correct-submission re-read".to_string(),
                    )
                })?;

            let final_score = self.grader.rank_adjusted_score(base_score, rank);
            self.submissions
                .update_score(&submission.id, final_score)
                .await?;
            submission.score = final_score;
        }

        Ok(submission)
    }

    /// Total rank-adjusted score per participant, highest first, ties
    /// broken by nickname.
    pub async fn leaderboard(&self, session_id: &str) -> AppResult<Vec<LeaderboardEntryDto>> {
        let session = self.get_session(session_id).await?;
        let submissions = self.submissions.find_by_session(session_id).await?;

        let mut totals: HashMap<&str, i32> = HashMap::new();
        for submission in &submissions {
            *totals.entry(submission.participant_id.as_str()).or_insert(0) +=
                submission.score;
        }

        let mut entries: Vec<LeaderboardEntryDto> = session
            .participants
            .iter()
            .map(|p| LeaderboardEntryDto {
                participant_id: p.id.clone(),
                nickname: p.nickname.clone(),
                total_score: totals.get(p.id.as_str()).copied().unwrap_or(0),
            })
            .collect();

        entries.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then_with(|| a.nickname.cmp(&b.nickname))
        });

        Ok(entries)
    }

    async fn collection_for(&self, session: &Session) -> AppResult<Collection> {
        self.collections
            .find_by_id(&session.collection_id)
            .await?
            .ok_or_else(|| {
                AppError::IllegalState(format!(
                    "Session '{}' references missing collection '{}'",
                    session.id, session.collection_id
                ))
            })
    }

    fn is_current_activity(
        &self,
        session: &Session,
        collection: &Collection,
        activity: &Activity,
    ) -> bool {
        collection
            .activities
            .get(session.current_activity_index as usize)
            .map(|current| current.id == activity.id)
            .unwrap_or(false)
    }
}
