use crate::config::ConversionDefaults;
use crate::errors::{AppError, AppResult};
use crate::models::domain::activity::ActivityType;
use crate::models::domain::quiz::QuizAnswer;

/// Result of reshaping an answer set for a new quiz type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionOutcome {
    /// Question text, defaulted when the source had none.
    pub question: String,
    pub answers: Vec<QuizAnswer>,
    /// Human-readable notes about defaulting and data loss, in the order
    /// they occurred.
    pub warnings: Vec<String>,
}

/// One reshaping rule of the transition matrix. Every (old, new) pair maps
/// to exactly one strategy; each strategy is implemented and tested on its
/// own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    /// Same answer shape, copied unchanged.
    PassThrough,
    /// Into reorder: every answer becomes a step, order is list position.
    PromoteAllCorrect,
    /// Into type-answer: a single representative answer survives.
    CollapseToOne,
    /// Into true-or-false: derive a boolean, emit exactly two answers.
    CollapseToTwoBool,
    /// Into buttons: first correct answer stays, the rest are demoted.
    ReduceToSingleCorrect,
    /// Type-answer into a choice shape: synthesize a wrong option.
    SeedComplementaryOption,
    /// Type-answer into reorder: synthesize a second step.
    SeedSecondStep,
    /// Info slide into a quiz: synthesize a full default set.
    FromSlide,
    /// Quiz into an info slide: drop the answer set.
    ToSlide,
}

/// Converts a quiz's answer set when its activity type changes.
///
/// The caller rejects identity transitions before invoking; conversions
/// involving location quizzes are not part of the matrix.
pub struct ConversionService {
    defaults: ConversionDefaults,
}

impl ConversionService {
    pub fn new(defaults: ConversionDefaults) -> Self {
        Self { defaults }
    }

    pub fn convert_quiz_type(
        &self,
        answers: &[QuizAnswer],
        question: &str,
        old_type: ActivityType,
        new_type: ActivityType,
    ) -> AppResult<ConversionOutcome> {
        let strategy = Self::strategy_for(old_type, new_type)?;
        let mut warnings = Vec::new();

        let mut new_answers = match strategy {
            Strategy::PassThrough => answers.to_vec(),
            Strategy::PromoteAllCorrect => self.promote_all_correct(answers, &mut warnings),
            Strategy::CollapseToOne => self.collapse_to_one(answers, &mut warnings),
            Strategy::CollapseToTwoBool => self.collapse_to_two_bool(answers, &mut warnings),
            Strategy::ReduceToSingleCorrect => {
                Self::reduce_to_single_correct(answers, &mut warnings)
            }
            Strategy::SeedComplementaryOption => {
                self.seed_complementary_option(answers, &mut warnings)
            }
            Strategy::SeedSecondStep => self.seed_second_step(answers, &mut warnings),
            Strategy::FromSlide => self.from_slide(new_type, &mut warnings),
            Strategy::ToSlide => Self::to_slide(answers, &mut warnings),
        };

        reindex(&mut new_answers);

        let question = question.trim();
        let question = if question.is_empty() {
            self.defaults.question_text.clone()
        } else {
            question.to_string()
        };

        Ok(ConversionOutcome {
            question,
            answers: new_answers,
            warnings,
        })
    }

    /// The transition matrix: six convertible types (five quiz shapes plus
    /// INFO_SLIDE as a pseudo-type with empty answers), thirty meaningful
    /// cells. Location quizzes are outside the matrix: requesting one as
    /// target is a bad request, while finding one as the previous type
    /// means stored state the upstream type validation can never produce.
    fn strategy_for(old_type: ActivityType, new_type: ActivityType) -> AppResult<Strategy> {
        use ActivityType::*;

        if new_type == QuizLocation {
            return Err(AppError::ValidationError(
                "Conversion into location quizzes is not supported".to_string(),
            ));
        }
        if old_type == QuizLocation {
            return Err(AppError::IllegalState(
                "Illegal previous activity type: QUIZ_LOCATION".to_string(),
            ));
        }

        let strategy = match (old_type, new_type) {
            (InfoSlide, QuizButtons)
            | (InfoSlide, QuizCheckboxes)
            | (InfoSlide, QuizReorder)
            | (InfoSlide, QuizTypeAnswer)
            | (InfoSlide, QuizTrueOrFalse) => Strategy::FromSlide,

            (QuizButtons, InfoSlide)
            | (QuizCheckboxes, InfoSlide)
            | (QuizReorder, InfoSlide)
            | (QuizTypeAnswer, InfoSlide)
            | (QuizTrueOrFalse, InfoSlide) => Strategy::ToSlide,

            (QuizButtons, QuizCheckboxes)
            | (QuizReorder, QuizCheckboxes)
            | (QuizTrueOrFalse, QuizButtons)
            | (QuizTrueOrFalse, QuizCheckboxes) => Strategy::PassThrough,

            (QuizCheckboxes, QuizButtons) | (QuizReorder, QuizButtons) => {
                Strategy::ReduceToSingleCorrect
            }

            (QuizButtons, QuizReorder)
            | (QuizCheckboxes, QuizReorder)
            | (QuizTrueOrFalse, QuizReorder) => Strategy::PromoteAllCorrect,

            (QuizButtons, QuizTypeAnswer)
            | (QuizCheckboxes, QuizTypeAnswer)
            | (QuizReorder, QuizTypeAnswer)
            | (QuizTrueOrFalse, QuizTypeAnswer) => Strategy::CollapseToOne,

            (QuizButtons, QuizTrueOrFalse)
            | (QuizCheckboxes, QuizTrueOrFalse)
            | (QuizReorder, QuizTrueOrFalse)
            | (QuizTypeAnswer, QuizTrueOrFalse) => Strategy::CollapseToTwoBool,

            (QuizTypeAnswer, QuizButtons) | (QuizTypeAnswer, QuizCheckboxes) => {
                Strategy::SeedComplementaryOption
            }

            (QuizTypeAnswer, QuizReorder) => Strategy::SeedSecondStep,

            // Identity cells; callers reject these before dispatch.
            (old, new) => {
                return Err(AppError::IllegalState(format!(
                    "No conversion strategy for {:?} -> {:?}",
                    old, new
                )))
            }
        };

        Ok(strategy)
    }

    fn promote_all_correct(
        &self,
        answers: &[QuizAnswer],
        warnings: &mut Vec<String>,
    ) -> Vec<QuizAnswer> {
        if answers.is_empty() {
            warnings.push("No answers to carry over; created two default steps".to_string());
            return vec![
                QuizAnswer::new(&self.defaults.first_step_text, true, 0),
                QuizAnswer::new(&self.defaults.second_step_text, true, 1),
            ];
        }

        answers
            .iter()
            .map(|a| QuizAnswer {
                correct: true,
                ..a.clone()
            })
            .collect()
    }

    fn collapse_to_one(
        &self,
        answers: &[QuizAnswer],
        warnings: &mut Vec<String>,
    ) -> Vec<QuizAnswer> {
        let representative = answers
            .iter()
            .find(|a| a.correct)
            .or_else(|| answers.first());

        match representative {
            Some(answer) => vec![QuizAnswer {
                correct: true,
                ..answer.clone()
            }],
            None => {
                warnings.push("No answers to carry over; created a default answer".to_string());
                vec![QuizAnswer::new(&self.defaults.text_answer, true, 0)]
            }
        }
    }

    fn collapse_to_two_bool(
        &self,
        answers: &[QuizAnswer],
        warnings: &mut Vec<String>,
    ) -> Vec<QuizAnswer> {
        let representative = answers
            .iter()
            .find(|a| a.correct)
            .or_else(|| answers.first());

        let truth = match representative {
            Some(answer) => {
                let text = answer.text.trim();
                let literal_bool =
                    text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false");
                if !literal_bool {
                    warnings.push(format!(
                        "Derived a True/False value from answer '{}'",
                        answer.text
                    ));
                }
                text.to_lowercase().contains("true")
            }
            None => {
                warnings
                    .push("No answers to derive a True/False value from; defaulted to False"
                        .to_string());
                false
            }
        };

        vec![
            QuizAnswer::new(&self.defaults.true_label, truth, 0),
            QuizAnswer::new(&self.defaults.false_label, !truth, 1),
        ]
    }

    fn reduce_to_single_correct(
        answers: &[QuizAnswer],
        warnings: &mut Vec<String>,
    ) -> Vec<QuizAnswer> {
        let correct_count = answers.iter().filter(|a| a.correct).count();
        if correct_count > 1 {
            warnings.push(format!(
                "{} answers were marked correct; only the first was kept",
                correct_count
            ));
        }

        let mut kept_one = false;
        answers
            .iter()
            .map(|a| {
                let correct = a.correct && !kept_one;
                if correct {
                    kept_one = true;
                }
                QuizAnswer {
                    correct,
                    ..a.clone()
                }
            })
            .collect()
    }

    fn seed_complementary_option(
        &self,
        answers: &[QuizAnswer],
        warnings: &mut Vec<String>,
    ) -> Vec<QuizAnswer> {
        let retained = match answers.first() {
            Some(answer) => QuizAnswer {
                correct: true,
                ..answer.clone()
            },
            None => QuizAnswer::new(&self.defaults.correct_option_text, true, 0),
        };

        warnings.push("Added a default wrong option".to_string());
        vec![
            retained,
            QuizAnswer::new(&self.defaults.wrong_option_text, false, 1),
        ]
    }

    fn seed_second_step(
        &self,
        answers: &[QuizAnswer],
        warnings: &mut Vec<String>,
    ) -> Vec<QuizAnswer> {
        let first = match answers.first() {
            Some(answer) => QuizAnswer {
                correct: true,
                ..answer.clone()
            },
            None => QuizAnswer::new(&self.defaults.first_step_text, true, 0),
        };

        warnings.push("Added a default second step".to_string());
        vec![
            first,
            QuizAnswer::new(&self.defaults.second_step_text, true, 1),
        ]
    }

    fn from_slide(&self, new_type: ActivityType, warnings: &mut Vec<String>) -> Vec<QuizAnswer> {
        warnings.push("No source answers existed; created a default answer set".to_string());

        match new_type {
            ActivityType::QuizButtons | ActivityType::QuizCheckboxes => vec![
                QuizAnswer::new(&self.defaults.correct_option_text, true, 0),
                QuizAnswer::new(&self.defaults.wrong_option_text, false, 1),
            ],
            ActivityType::QuizReorder => vec![
                QuizAnswer::new(&self.defaults.first_step_text, true, 0),
                QuizAnswer::new(&self.defaults.second_step_text, true, 1),
            ],
            ActivityType::QuizTypeAnswer => {
                vec![QuizAnswer::new(&self.defaults.text_answer, true, 0)]
            }
            ActivityType::QuizTrueOrFalse => vec![
                QuizAnswer::new(&self.defaults.true_label, true, 0),
                QuizAnswer::new(&self.defaults.false_label, false, 1),
            ],
            // strategy_for never routes these here
            ActivityType::QuizLocation | ActivityType::InfoSlide => vec![],
        }
    }

    fn to_slide(answers: &[QuizAnswer], warnings: &mut Vec<String>) -> Vec<QuizAnswer> {
        if !answers.is_empty() {
            warnings.push("Existing answers were discarded".to_string());
        }
        vec![]
    }
}

/// Re-establish the order-index invariant: sequential from 0 in list order.
fn reindex(answers: &mut [QuizAnswer]) {
    for (position, answer) in answers.iter_mut().enumerate() {
        answer.order_index = position as i32;
    }
}
