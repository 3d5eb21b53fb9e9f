use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz::Quiz;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    QuizButtons,     // single correct option
    QuizCheckboxes,  // multiple correct options
    QuizReorder,     // ordered sequence, order is the data
    QuizTypeAnswer,  // single free-text answer
    QuizTrueOrFalse, // exactly two answers
    QuizLocation,    // geofenced answers
    InfoSlide,       // non-quiz, no answer key
}

impl ActivityType {
    pub fn is_quiz(&self) -> bool {
        !matches!(self, ActivityType::InfoSlide)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Slide {
    pub title: String,
    pub body: String,
}

/// One step of a collection: either a quiz or an info slide.
///
/// Invariant: `activity_type` and the presence of `quiz` vs `slide` always
/// agree. Every mutation path re-checks this through [`Activity::shape_agrees`].
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub activity_type: ActivityType,
    /// Position within the owning collection.
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide: Option<Slide>,
}

impl Activity {
    pub fn new_quiz(title: &str, activity_type: ActivityType, quiz: Quiz, order: i32) -> Self {
        Activity {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            activity_type,
            order,
            quiz: Some(quiz),
            slide: None,
        }
    }

    pub fn new_slide(title: &str, slide: Slide, order: i32) -> Self {
        Activity {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            activity_type: ActivityType::InfoSlide,
            order,
            quiz: None,
            slide: Some(slide),
        }
    }

    /// Whether the activity type and the stored shape agree.
    pub fn shape_agrees(&self) -> bool {
        match self.activity_type {
            ActivityType::InfoSlide => self.quiz.is_none() && self.slide.is_some(),
            _ => self.quiz.is_some() && self.slide.is_none(),
        }
    }
}
