use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    config::ConversionDefaults,
    errors::{AppError, AppResult},
    models::domain::{
        Activity, ActivityType, Collection, PointType, Quiz, QuizAnswer, QuizLocationAnswer, Slide,
    },
    models::dto::request::{
        AnswerSetPayload, CreateActivityRequest, CreateCollectionRequest, UpdateActivityRequest,
        UpdateCollectionRequest,
    },
    repositories::CollectionRepository,
    services::conversion_service::ConversionService,
};

const DEFAULT_TIME_LIMIT_SECONDS: i32 = 30;

pub struct CollectionService {
    repository: Arc<dyn CollectionRepository>,
    converter: ConversionService,
    defaults: ConversionDefaults,
}

impl CollectionService {
    pub fn new(repository: Arc<dyn CollectionRepository>, defaults: ConversionDefaults) -> Self {
        Self {
            repository,
            converter: ConversionService::new(defaults.clone()),
            defaults,
        }
    }

    pub async fn create_collection(
        &self,
        request: CreateCollectionRequest,
    ) -> AppResult<Collection> {
        request.validate()?;

        let collection =
            Collection::new(&request.name, request.description.clone(), &request.owner_id);
        self.repository.create(collection).await
    }

    pub async fn get_collection(&self, id: &str) -> AppResult<Collection> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Collection with id '{}' not found", id)))
    }

    pub async fn list_collections(
        &self,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Collection>, i64)> {
        self.repository.list(offset, limit).await
    }

    pub async fn update_collection(
        &self,
        id: &str,
        request: UpdateCollectionRequest,
    ) -> AppResult<Collection> {
        request.validate()?;

        let mut collection = self.get_collection(id).await?;
        if let Some(name) = request.name {
            collection.name = name;
        }
        if let Some(description) = request.description {
            collection.description = Some(description);
        }
        collection.modified_at = Some(Utc::now());

        self.repository.update(collection).await
    }

    pub async fn delete_collection(&self, id: &str) -> AppResult<()> {
        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "Collection with id '{}' not found",
                id
            )));
        }
        Ok(())
    }

    pub async fn add_activity(
        &self,
        collection_id: &str,
        request: CreateActivityRequest,
    ) -> AppResult<Activity> {
        request.validate()?;

        let mut collection = self.get_collection(collection_id).await?;
        let order = collection.activities.len() as i32;

        let activity = if request.activity_type.is_quiz() {
            let question = request
                .question
                .clone()
                .filter(|q| !q.trim().is_empty())
                .unwrap_or_else(|| self.defaults.question_text.clone());
            let quiz = Quiz {
                question,
                time_limit_seconds: request
                    .time_limit_seconds
                    .unwrap_or(DEFAULT_TIME_LIMIT_SECONDS),
                point_type: request.point_type.unwrap_or(PointType::Standard),
                answers: vec![],
                location_answers: vec![],
            };
            Activity::new_quiz(&request.title, request.activity_type, quiz, order)
        } else {
            let slide = Slide {
                title: request.title.clone(),
                body: request.slide_body.clone().unwrap_or_default(),
            };
            Activity::new_slide(&request.title, slide, order)
        };

        collection.activities.push(activity.clone());
        collection.modified_at = Some(Utc::now());
        self.repository.update(collection).await?;

        Ok(activity)
    }

    pub async fn update_activity(
        &self,
        collection_id: &str,
        activity_id: &str,
        request: UpdateActivityRequest,
    ) -> AppResult<Activity> {
        request.validate()?;

        let mut collection = self.get_collection(collection_id).await?;
        let activity = collection
            .activity_mut(activity_id)
            .ok_or_else(|| activity_not_found(activity_id))?;

        if let Some(title) = &request.title {
            activity.title = title.clone();
        }
        match (&mut activity.quiz, &mut activity.slide) {
            (Some(quiz), None) => {
                if let Some(question) = &request.question {
                    quiz.question = question.clone();
                }
                if let Some(limit) = request.time_limit_seconds {
                    quiz.time_limit_seconds = limit;
                }
                if let Some(point_type) = request.point_type {
                    quiz.point_type = point_type;
                }
            }
            (None, Some(slide)) => {
                if let Some(title) = &request.title {
                    slide.title = title.clone();
                }
                if let Some(body) = &request.slide_body {
                    slide.body = body.clone();
                }
            }
            _ => {
                return Err(AppError::IllegalState(format!(
                    "Activity '{}' has inconsistent quiz/slide shape",
                    activity_id
                )))
            }
        }

        let updated = activity.clone();
        collection.modified_at = Some(Utc::now());
        self.repository.update(collection).await?;

        Ok(updated)
    }

    pub async fn remove_activity(
        &self,
        collection_id: &str,
        activity_id: &str,
    ) -> AppResult<Collection> {
        let mut collection = self.get_collection(collection_id).await?;

        let before = collection.activities.len();
        collection.activities.retain(|a| a.id != activity_id);
        if collection.activities.len() == before {
            return Err(activity_not_found(activity_id));
        }

        collection.reindex_activities();
        collection.modified_at = Some(Utc::now());
        self.repository.update(collection).await
    }

    /// Replace a quiz's answer set wholesale from a type-specific payload.
    /// The payload variant must agree with the activity's current type.
    pub async fn set_answers(
        &self,
        collection_id: &str,
        activity_id: &str,
        payload: AnswerSetPayload,
    ) -> AppResult<Activity> {
        let mut collection = self.get_collection(collection_id).await?;
        let activity = collection
            .activity_mut(activity_id)
            .ok_or_else(|| activity_not_found(activity_id))?;

        let quiz = match activity.quiz.as_mut() {
            Some(quiz) => quiz,
            None => {
                return Err(AppError::ValidationError(
                    "Info slides have no answer key".to_string(),
                ))
            }
        };

        let (answers, locations) =
            self.build_answer_set(activity.activity_type, &payload)?;
        quiz.answers = answers;
        quiz.location_answers = locations;

        let updated = activity.clone();
        collection.modified_at = Some(Utc::now());
        self.repository.update(collection).await?;

        Ok(updated)
    }

    fn build_answer_set(
        &self,
        activity_type: ActivityType,
        payload: &AnswerSetPayload,
    ) -> AppResult<(Vec<QuizAnswer>, Vec<QuizLocationAnswer>)> {
        match payload {
            AnswerSetPayload::Choice { answers } => {
                if !matches!(
                    activity_type,
                    ActivityType::QuizButtons | ActivityType::QuizCheckboxes
                ) {
                    return Err(payload_mismatch(activity_type));
                }
                if answers.is_empty() {
                    return Err(AppError::ValidationError(
                        "A choice quiz needs at least one answer".to_string(),
                    ));
                }
                let correct_count = answers.iter().filter(|a| a.correct).count();
                if activity_type == ActivityType::QuizButtons && correct_count != 1 {
                    return Err(AppError::ValidationError(
                        "A buttons quiz must have exactly one correct answer".to_string(),
                    ));
                }
                if activity_type == ActivityType::QuizCheckboxes && correct_count == 0 {
                    return Err(AppError::ValidationError(
                        "A checkboxes quiz must have at least one correct answer".to_string(),
                    ));
                }

                let mut built = Vec::with_capacity(answers.len());
                for (index, entry) in answers.iter().enumerate() {
                    entry.validate()?;
                    let mut answer = QuizAnswer::new(&entry.text, entry.correct, index as i32);
                    answer.explanation = entry.explanation.clone();
                    built.push(answer);
                }
                Ok((built, vec![]))
            }

            AnswerSetPayload::Reorder { steps } => {
                if activity_type != ActivityType::QuizReorder {
                    return Err(payload_mismatch(activity_type));
                }
                if steps.len() < 2 {
                    return Err(AppError::ValidationError(
                        "A reorder quiz needs at least two steps".to_string(),
                    ));
                }

                let mut built = Vec::with_capacity(steps.len());
                for (index, step) in steps.iter().enumerate() {
                    step.validate()?;
                    // Order is the data: every step is correct by construction.
                    built.push(QuizAnswer::new(&step.text, true, index as i32));
                }
                Ok((built, vec![]))
            }

            AnswerSetPayload::TypeAnswer { answer } => {
                if activity_type != ActivityType::QuizTypeAnswer {
                    return Err(payload_mismatch(activity_type));
                }
                answer.validate()?;

                let mut built = QuizAnswer::new(&answer.text, true, 0);
                built.explanation = answer.explanation.clone();
                Ok((vec![built], vec![]))
            }

            AnswerSetPayload::TrueFalse { true_is_correct } => {
                if activity_type != ActivityType::QuizTrueOrFalse {
                    return Err(payload_mismatch(activity_type));
                }

                Ok((
                    vec![
                        QuizAnswer::new(&self.defaults.true_label, *true_is_correct, 0),
                        QuizAnswer::new(&self.defaults.false_label, !*true_is_correct, 1),
                    ],
                    vec![],
                ))
            }

            AnswerSetPayload::Location { locations } => {
                if activity_type != ActivityType::QuizLocation {
                    return Err(payload_mismatch(activity_type));
                }
                if locations.is_empty() {
                    return Err(AppError::ValidationError(
                        "A location quiz needs at least one location".to_string(),
                    ));
                }

                let mut built = Vec::with_capacity(locations.len());
                for location in locations {
                    location.validate()?;
                    built.push(QuizLocationAnswer {
                        longitude: location.longitude,
                        latitude: location.latitude,
                        radius: location.radius,
                    });
                }
                Ok((vec![], built))
            }
        }
    }

    /// Change an activity's quiz type, reshaping its answers through the
    /// conversion matrix. Returns the updated activity and the conversion
    /// warnings.
    pub async fn change_activity_type(
        &self,
        collection_id: &str,
        activity_id: &str,
        new_type: ActivityType,
    ) -> AppResult<(Activity, Vec<String>)> {
        let mut collection = self.get_collection(collection_id).await?;
        let activity = collection
            .activity_mut(activity_id)
            .ok_or_else(|| activity_not_found(activity_id))?;

        let old_type = activity.activity_type;
        if old_type == new_type {
            return Err(AppError::ValidationError(format!(
                "Activity already has type {:?}",
                new_type
            )));
        }

        let (current_answers, question) = match &activity.quiz {
            Some(quiz) => (quiz.answers.clone(), quiz.question.clone()),
            None => (vec![], String::new()),
        };

        let outcome =
            self.converter
                .convert_quiz_type(&current_answers, &question, old_type, new_type)?;

        if new_type == ActivityType::InfoSlide {
            activity.quiz = None;
            activity.slide = Some(Slide {
                title: activity.title.clone(),
                body: outcome.question,
            });
        } else {
            let (time_limit_seconds, point_type) = match &activity.quiz {
                Some(quiz) => (quiz.time_limit_seconds, quiz.point_type),
                None => (DEFAULT_TIME_LIMIT_SECONDS, PointType::Standard),
            };
            activity.quiz = Some(Quiz {
                question: outcome.question,
                time_limit_seconds,
                point_type,
                answers: outcome.answers,
                location_answers: vec![],
            });
            activity.slide = None;
        }
        activity.activity_type = new_type;

        if !activity.shape_agrees() {
            return Err(AppError::IllegalState(format!(
                "Activity '{}' shape does not agree with type {:?} after conversion",
                activity_id, new_type
            )));
        }

        let updated = activity.clone();
        collection.modified_at = Some(Utc::now());
        self.repository.update(collection).await?;

        Ok((updated, outcome.warnings))
    }
}

fn activity_not_found(activity_id: &str) -> AppError {
    AppError::NotFound(format!("Activity with id '{}' not found", activity_id))
}

fn payload_mismatch(activity_type: ActivityType) -> AppError {
    AppError::ValidationError(format!(
        "Answer payload does not match activity type {:?}",
        activity_type
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::dto::request::AnswerEntryInput;
    use crate::repositories::collection_repository::MockCollectionRepository;

    fn service_with(repository: MockCollectionRepository) -> CollectionService {
        CollectionService::new(
            Arc::new(repository),
            Config::test_config().conversion_defaults(),
        )
    }

    fn stored_collection_with(activity: Activity) -> Collection {
        let mut collection = Collection::new("Geography", None, "owner-1");
        collection.activities.push(activity);
        collection
    }

    fn buttons_activity() -> Activity {
        let quiz = Quiz::with_answers(
            "Capital of France?",
            vec![
                QuizAnswer::new("Paris", true, 0),
                QuizAnswer::new("Lyon", false, 1),
            ],
        );
        Activity::new_quiz("Q1", ActivityType::QuizButtons, quiz, 0)
    }

    fn expect_find_and_update(
        repository: &mut MockCollectionRepository,
        collection: Collection,
    ) {
        let found = collection.clone();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        repository
            .expect_update()
            .returning(|collection| Ok(collection));
    }

    #[tokio::test]
    async fn create_collection_rejects_empty_name() {
        let service = service_with(MockCollectionRepository::new());

        let err = service
            .create_collection(CreateCollectionRequest {
                name: "".to_string(),
                description: None,
                owner_id: "owner-1".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn get_collection_maps_missing_to_not_found() {
        let mut repository = MockCollectionRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let err = service_with(repository)
            .get_collection("missing")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn change_activity_type_rejects_identity() {
        let activity = buttons_activity();
        let activity_id = activity.id.clone();
        let mut repository = MockCollectionRepository::new();
        expect_find_and_update(&mut repository, stored_collection_with(activity));

        let err = service_with(repository)
            .change_activity_type("c-1", &activity_id, ActivityType::QuizButtons)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn change_activity_type_to_checkboxes_passes_answers_through() {
        let activity = buttons_activity();
        let activity_id = activity.id.clone();
        let mut repository = MockCollectionRepository::new();
        expect_find_and_update(&mut repository, stored_collection_with(activity));

        let (updated, warnings) = service_with(repository)
            .change_activity_type("c-1", &activity_id, ActivityType::QuizCheckboxes)
            .await
            .unwrap();

        assert_eq!(updated.activity_type, ActivityType::QuizCheckboxes);
        assert!(updated.shape_agrees());
        assert_eq!(updated.quiz.unwrap().answers.len(), 2);
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn change_activity_type_to_slide_preserves_question_as_body() {
        let activity = buttons_activity();
        let activity_id = activity.id.clone();
        let mut repository = MockCollectionRepository::new();
        expect_find_and_update(&mut repository, stored_collection_with(activity));

        let (updated, warnings) = service_with(repository)
            .change_activity_type("c-1", &activity_id, ActivityType::InfoSlide)
            .await
            .unwrap();

        assert_eq!(updated.activity_type, ActivityType::InfoSlide);
        assert!(updated.quiz.is_none());
        assert_eq!(updated.slide.unwrap().body, "Capital of France?");
        assert_eq!(warnings.len(), 1);
    }

    #[tokio::test]
    async fn set_answers_rejects_mismatched_payload() {
        let activity = buttons_activity();
        let activity_id = activity.id.clone();
        let mut repository = MockCollectionRepository::new();
        expect_find_and_update(&mut repository, stored_collection_with(activity));

        let err = service_with(repository)
            .set_answers(
                "c-1",
                &activity_id,
                AnswerSetPayload::TrueFalse {
                    true_is_correct: true,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn set_answers_buttons_requires_exactly_one_correct() {
        let activity = buttons_activity();
        let activity_id = activity.id.clone();
        let mut repository = MockCollectionRepository::new();
        expect_find_and_update(&mut repository, stored_collection_with(activity));

        let entry = |text: &str, correct: bool| AnswerEntryInput {
            text: text.to_string(),
            correct,
            explanation: None,
        };

        let err = service_with(repository)
            .set_answers(
                "c-1",
                &activity_id,
                AnswerSetPayload::Choice {
                    answers: vec![entry("Paris", true), entry("Lyon", true)],
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn set_answers_replaces_key_and_reindexes() {
        let activity = buttons_activity();
        let activity_id = activity.id.clone();
        let mut repository = MockCollectionRepository::new();
        expect_find_and_update(&mut repository, stored_collection_with(activity));

        let entry = |text: &str, correct: bool| AnswerEntryInput {
            text: text.to_string(),
            correct,
            explanation: None,
        };

        let updated = service_with(repository)
            .set_answers(
                "c-1",
                &activity_id,
                AnswerSetPayload::Choice {
                    answers: vec![
                        entry("Berlin", false),
                        entry("Paris", true),
                        entry("Madrid", false),
                    ],
                },
            )
            .await
            .unwrap();

        let quiz = updated.quiz.unwrap();
        assert_eq!(quiz.answers.len(), 3);
        assert_eq!(
            quiz.answers.iter().map(|a| a.order_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(quiz.answers[1].correct);
    }
}
