use std::collections::HashSet;

use crate::config::ScoringConfig;
use crate::errors::{AppError, AppResult};
use crate::models::domain::activity::ActivityType;
use crate::models::domain::quiz::{PointType, Quiz, QuizAnswer, QuizLocationAnswer};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Grades raw submission content against a quiz's answer key.
///
/// Grading is pure: the caller loads the quiz, invokes [`grade_submission`]
/// for the base result, persists the submission, and only then applies the
/// latency-rank adjustment via [`rank_adjusted_score`] against the re-read
/// list of correct submissions.
///
/// [`grade_submission`]: GradingService::grade_submission
/// [`rank_adjusted_score`]: GradingService::rank_adjusted_score
pub struct GradingService {
    scoring: ScoringConfig,
}

impl GradingService {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self { scoring }
    }

    /// Determine correctness and the base score for one submission.
    ///
    /// Content format depends on the activity type: a single answer id for
    /// buttons/true-or-false, comma-separated ids for checkboxes and
    /// reorder, free text for type-answer, "longitude,latitude" for
    /// location quizzes.
    pub fn grade_submission(
        &self,
        quiz: &Quiz,
        activity_type: ActivityType,
        content: &str,
    ) -> AppResult<(bool, i32)> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::ValidationError(
                "Answer content must not be empty".to_string(),
            ));
        }

        let is_correct = match activity_type {
            ActivityType::QuizButtons | ActivityType::QuizTrueOrFalse => {
                Self::check_single_choice(&quiz.answers, content)?
            }
            ActivityType::QuizCheckboxes => Self::check_multi_choice(&quiz.answers, content)?,
            ActivityType::QuizTypeAnswer => Self::check_text_answer(&quiz.answers, content)?,
            ActivityType::QuizReorder => Self::check_order(&quiz.answers, content)?,
            ActivityType::QuizLocation => {
                Self::check_location(&quiz.location_answers, content)?
            }
            ActivityType::InfoSlide => {
                return Err(AppError::ValidationError(
                    "Info slides do not accept submissions".to_string(),
                ))
            }
        };

        Ok((is_correct, self.base_score(is_correct, quiz.point_type)))
    }

    /// Apply the speed bonus: `max(0, base - rank * time_decrement)` where
    /// `rank` is the zero-based position among all correct submissions for
    /// the same (session, activity), ordered by creation time.
    pub fn rank_adjusted_score(&self, base_score: i32, rank: usize) -> i32 {
        (base_score - rank as i32 * self.scoring.time_decrement).max(0)
    }

    fn base_score(&self, is_correct: bool, point_type: PointType) -> i32 {
        if !is_correct {
            return 0;
        }
        match point_type {
            PointType::NoPoints => 0,
            PointType::Standard => self.scoring.base_score,
            PointType::DoublePoints => self.scoring.base_score * 2,
        }
    }

    fn find_answer<'a>(answers: &'a [QuizAnswer], id: &str) -> AppResult<&'a QuizAnswer> {
        answers
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Answer with id '{}' not found", id)))
    }

    fn split_ids(content: &str) -> Vec<&str> {
        content
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn check_single_choice(answers: &[QuizAnswer], content: &str) -> AppResult<bool> {
        let answer = Self::find_answer(answers, content)?;
        Ok(answer.correct)
    }

    /// Correct iff the submitted id set exactly equals the set of ids
    /// flagged correct. Order of submitted ids does not matter.
    fn check_multi_choice(answers: &[QuizAnswer], content: &str) -> AppResult<bool> {
        let submitted = Self::split_ids(content);
        let mut submitted_set = HashSet::new();
        for id in submitted {
            Self::find_answer(answers, id)?;
            submitted_set.insert(id);
        }

        let correct_set: HashSet<&str> = answers
            .iter()
            .filter(|a| a.correct)
            .map(|a| a.id.as_str())
            .collect();

        Ok(submitted_set == correct_set)
    }

    fn check_text_answer(answers: &[QuizAnswer], content: &str) -> AppResult<bool> {
        let expected = answers.iter().find(|a| a.correct).ok_or_else(|| {
            AppError::IllegalState("Type-answer quiz has no correct answer defined".to_string())
        })?;

        Ok(expected.text.trim().to_lowercase() == content.to_lowercase())
    }

    /// Correct iff every submitted id sits at the position matching its
    /// stored order index, i.e. the submission spells out the canonical
    /// ascending order.
    fn check_order(answers: &[QuizAnswer], content: &str) -> AppResult<bool> {
        let submitted = Self::split_ids(content);
        if submitted.len() != answers.len() {
            return Err(AppError::ValidationError(format!(
                "Reorder submission must contain {} ids, got {}",
                answers.len(),
                submitted.len()
            )));
        }

        for (position, id) in submitted.iter().enumerate() {
            let answer = Self::find_answer(answers, id)?;
            if answer.order_index != position as i32 {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn check_location(locations: &[QuizLocationAnswer], content: &str) -> AppResult<bool> {
        let parts: Vec<&str> = content.split(',').map(str::trim).collect();
        let (longitude, latitude) = match parts.as_slice() {
            [lon, lat] => match (lon.parse::<f64>(), lat.parse::<f64>()) {
                (Ok(lon), Ok(lat)) => (lon, lat),
                _ => {
                    return Err(AppError::ValidationError(
                        "Location submission must be 'longitude,latitude'".to_string(),
                    ))
                }
            },
            _ => {
                return Err(AppError::ValidationError(
                    "Location submission must be 'longitude,latitude'".to_string(),
                ))
            }
        };

        if locations.is_empty() {
            return Err(AppError::IllegalState(
                "Location quiz has no location answers defined".to_string(),
            ));
        }

        Ok(locations
            .iter()
            .any(|loc| haversine_meters(longitude, latitude, loc.longitude, loc.latitude) <= loc.radius))
    }
}

fn haversine_meters(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> f64 {
    let d_lat = (lat_b - lat_a).to_radians();
    let d_lon = (lon_b - lon_a).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * a.sqrt().asin() * EARTH_RADIUS_METERS
}
