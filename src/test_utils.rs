use crate::models::domain::{Activity, ActivityType, Quiz, QuizAnswer};
